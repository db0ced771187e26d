//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Timer phase and countdown state
//! - The user-picked duration with per-field bounds

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for the hours picker.
pub const MAX_HOURS: u32 = 24;

/// Upper bound (exclusive) for the minutes and seconds pickers.
pub const MAX_MINUTES: u32 = 60;

/// Upper bound (exclusive) for the seconds picker.
pub const MAX_SECONDS: u32 = 60;

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Nothing is counting down
    #[default]
    Idle,
    /// Counting down once per tick
    Running,
    /// Countdown frozen at the current remaining value
    Paused,
    /// Countdown reached zero; the alert is ringing
    Finished,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }

    /// Returns true if the duration pickers may be edited in this phase.
    pub fn allows_editing(&self) -> bool {
        matches!(self, TimerPhase::Idle | TimerPhase::Paused)
    }
}

// ============================================================================
// PickedDuration
// ============================================================================

/// One of the three duration picker columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Hours,
    Minutes,
    Seconds,
}

impl DurationField {
    /// Exclusive upper bound of the field.
    pub fn bound(&self) -> u32 {
        match self {
            DurationField::Hours => MAX_HOURS,
            DurationField::Minutes => MAX_MINUTES,
            DurationField::Seconds => MAX_SECONDS,
        }
    }

    /// The field to the right, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            DurationField::Hours => DurationField::Minutes,
            DurationField::Minutes => DurationField::Seconds,
            DurationField::Seconds => DurationField::Hours,
        }
    }

    /// The field to the left, wrapping around.
    pub fn previous(&self) -> Self {
        match self {
            DurationField::Hours => DurationField::Seconds,
            DurationField::Minutes => DurationField::Hours,
            DurationField::Seconds => DurationField::Minutes,
        }
    }
}

/// A user-chosen duration split into picker columns.
///
/// Every field is kept inside its bound: hours in `[0, 24)`, minutes and
/// seconds in `[0, 60)`. Deserialization enforces the same bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PickedFields")]
pub struct PickedDuration {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

#[derive(Deserialize)]
struct PickedFields {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TryFrom<PickedFields> for PickedDuration {
    type Error = String;

    fn try_from(fields: PickedFields) -> Result<Self, Self::Error> {
        Self::new(fields.hours, fields.minutes, fields.seconds)
    }
}

impl PickedDuration {
    /// Creates a duration, validating each field against its bound.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self, String> {
        if hours >= MAX_HOURS {
            return Err("時間は0-23の範囲で指定してください".to_string());
        }
        if minutes >= MAX_MINUTES {
            return Err("分は0-59の範囲で指定してください".to_string());
        }
        if seconds >= MAX_SECONDS {
            return Err("秒は0-59の範囲で指定してください".to_string());
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Splits a total number of seconds into picker fields.
    ///
    /// Values of a day or more are clamped to 23:59:59.
    pub fn from_total_seconds(total: u32) -> Self {
        let total = total.min(MAX_HOURS * 3600 - 1);
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Returns the value of a single field.
    pub fn get(&self, field: DurationField) -> u32 {
        match field {
            DurationField::Hours => self.hours,
            DurationField::Minutes => self.minutes,
            DurationField::Seconds => self.seconds,
        }
    }

    /// Steps one field up or down, wrapping inside the field's bound.
    pub fn adjust(&mut self, field: DurationField, delta: i32) {
        let bound = field.bound() as i64;
        let current = self.get(field) as i64;
        let next = (current + delta as i64).rem_euclid(bound) as u32;
        match field {
            DurationField::Hours => self.hours = next,
            DurationField::Minutes => self.minutes = next,
            DurationField::Seconds => self.seconds = next,
        }
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Returns true if the duration is zero (Start is inert).
    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for PickedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_hms(self.total_seconds()))
    }
}

/// Formats seconds as `HH:MM:SS`.
pub fn format_hms(total_seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown.
///
/// Mutators here only move data; the side effects of each transition live in
/// [`crate::timer::TimerEngine`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: TimerPhase,
    /// Remaining seconds of the current session
    pub remaining_seconds: u32,
    /// Duration shown in the pickers
    pub picked: PickedDuration,
    /// Whether the end alert is ringing
    pub ringing: bool,
}

impl TimerState {
    /// Creates an idle state with the given picked duration.
    pub fn new(picked: PickedDuration) -> Self {
        Self {
            picked,
            ..Self::default()
        }
    }

    /// Begins a session from the picked duration.
    pub fn start(&mut self) {
        self.phase = TimerPhase::Running;
        self.remaining_seconds = self.picked.total_seconds();
        self.ringing = false;
    }

    /// Freezes the countdown.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Continues a frozen countdown from where it stopped.
    pub fn resume(&mut self) {
        if self.phase == TimerPhase::Paused {
            self.phase = TimerPhase::Running;
        }
    }

    /// Marks the session as finished and ringing.
    pub fn finish(&mut self) {
        self.phase = TimerPhase::Finished;
        self.remaining_seconds = 0;
        self.ringing = true;
    }

    /// Hard reset back to idle. The picked duration is kept.
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = 0;
        self.ringing = false;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached 0.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Returns true if the countdown is actively running.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod timer_phase_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(TimerPhase::default(), TimerPhase::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(TimerPhase::Idle.as_str(), "idle");
            assert_eq!(TimerPhase::Running.as_str(), "running");
            assert_eq!(TimerPhase::Paused.as_str(), "paused");
            assert_eq!(TimerPhase::Finished.as_str(), "finished");
        }

        #[test]
        fn test_allows_editing() {
            assert!(TimerPhase::Idle.allows_editing());
            assert!(TimerPhase::Paused.allows_editing());
            assert!(!TimerPhase::Running.allows_editing());
            assert!(!TimerPhase::Finished.allows_editing());
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&TimerPhase::Finished).unwrap();
            assert_eq!(json, "\"finished\"");
        }
    }

    mod picked_duration_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let d = PickedDuration::new(1, 30, 15).unwrap();
            assert_eq!(d.total_seconds(), 3600 + 30 * 60 + 15);
        }

        #[test]
        fn test_new_rejects_out_of_range() {
            assert!(PickedDuration::new(24, 0, 0).is_err());
            assert!(PickedDuration::new(0, 60, 0).is_err());
            assert!(PickedDuration::new(0, 0, 60).is_err());
            assert!(PickedDuration::new(23, 59, 59).is_ok());
        }

        #[test]
        fn test_is_zero() {
            assert!(PickedDuration::default().is_zero());
            assert!(!PickedDuration::new(0, 0, 1).unwrap().is_zero());
        }

        #[test]
        fn test_from_total_seconds() {
            let d = PickedDuration::from_total_seconds(3725);
            assert_eq!((d.hours(), d.minutes(), d.seconds()), (1, 2, 5));
        }

        #[test]
        fn test_from_total_seconds_clamps_to_a_day() {
            let d = PickedDuration::from_total_seconds(100_000);
            assert_eq!((d.hours(), d.minutes(), d.seconds()), (23, 59, 59));
        }

        #[test]
        fn test_adjust_wraps_up() {
            let mut d = PickedDuration::new(23, 59, 59).unwrap();
            d.adjust(DurationField::Seconds, 1);
            d.adjust(DurationField::Minutes, 1);
            d.adjust(DurationField::Hours, 1);
            assert!(d.is_zero());
        }

        #[test]
        fn test_adjust_wraps_down() {
            let mut d = PickedDuration::default();
            d.adjust(DurationField::Hours, -1);
            d.adjust(DurationField::Minutes, -1);
            assert_eq!(d.hours(), 23);
            assert_eq!(d.minutes(), 59);
            assert_eq!(d.seconds(), 0);
        }

        #[test]
        fn test_display() {
            let d = PickedDuration::new(0, 1, 5).unwrap();
            assert_eq!(d.to_string(), "00:01:05");
        }

        #[test]
        fn test_field_navigation_wraps() {
            assert_eq!(DurationField::Seconds.next(), DurationField::Hours);
            assert_eq!(DurationField::Hours.previous(), DurationField::Seconds);
        }

        #[test]
        fn test_deserialize_checks_bounds() {
            let d: PickedDuration =
                serde_json::from_str(r#"{"hours":1,"minutes":2,"seconds":3}"#).unwrap();
            assert_eq!(d, PickedDuration::new(1, 2, 3).unwrap());

            for json in [
                r#"{"hours":24,"minutes":0,"seconds":0}"#,
                r#"{"hours":0,"minutes":60,"seconds":0}"#,
                r#"{"hours":0,"minutes":0,"seconds":75}"#,
            ] {
                assert!(serde_json::from_str::<PickedDuration>(json).is_err());
            }
        }
    }

    mod timer_state_tests {
        use super::*;

        fn five_seconds() -> TimerState {
            TimerState::new(PickedDuration::new(0, 0, 5).unwrap())
        }

        #[test]
        fn test_new_is_idle() {
            let state = five_seconds();
            assert_eq!(state.phase, TimerPhase::Idle);
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.ringing);
        }

        #[test]
        fn test_start_sets_remaining() {
            let mut state = five_seconds();
            state.start();
            assert!(state.is_running());
            assert_eq!(state.remaining_seconds, 5);
        }

        #[test]
        fn test_tick_reports_completion() {
            let mut state = five_seconds();
            state.start();
            for _ in 0..4 {
                assert!(!state.tick());
            }
            assert!(state.tick());
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_pause_only_from_running() {
            let mut state = five_seconds();
            state.pause();
            assert_eq!(state.phase, TimerPhase::Idle);

            state.start();
            state.pause();
            assert_eq!(state.phase, TimerPhase::Paused);
        }

        #[test]
        fn test_finish_and_reset() {
            let mut state = five_seconds();
            state.start();
            state.finish();
            assert_eq!(state.phase, TimerPhase::Finished);
            assert!(state.ringing);

            state.reset();
            assert_eq!(state.phase, TimerPhase::Idle);
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.ringing);
            assert_eq!(state.picked.total_seconds(), 5);
        }

        #[test]
        fn test_format_hms() {
            assert_eq!(format_hms(0), "00:00:00");
            assert_eq!(format_hms(59), "00:00:59");
            assert_eq!(format_hms(3600 + 61), "01:01:01");
        }
    }
}
