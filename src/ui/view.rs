//! Pure projection of timer state into display values.

use crate::types::{format_hms, TimerPhase, TimerState};

/// Everything the timer screen shows, derived from [`TimerState`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub phase: TimerPhase,
    /// Seconds shown in the countdown display
    pub remaining_to_display: u32,
    /// `remaining_to_display` as `HH:MM:SS`
    pub display: String,
    /// Elapsed fraction in `[0, 1]`
    pub progress: f64,
    pub pickers_visible: bool,
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub resume_enabled: bool,
    pub stop_enabled: bool,
    pub show_stop_ringing: bool,
}

impl TimerView {
    /// Projects the state. Called on every redraw.
    #[must_use]
    pub fn project(state: &TimerState) -> Self {
        let remaining_to_display = match state.phase {
            TimerPhase::Idle => state.picked.total_seconds(),
            TimerPhase::Running | TimerPhase::Paused => state.remaining_seconds,
            TimerPhase::Finished => 0,
        };

        Self {
            phase: state.phase,
            remaining_to_display,
            display: format_hms(remaining_to_display),
            progress: progress(state),
            pickers_visible: state.phase.allows_editing(),
            start_enabled: state.phase == TimerPhase::Idle && !state.picked.is_zero(),
            pause_enabled: state.phase == TimerPhase::Running,
            resume_enabled: state.phase == TimerPhase::Paused,
            stop_enabled: state.phase != TimerPhase::Idle,
            show_stop_ringing: state.ringing,
        }
    }
}

fn progress(state: &TimerState) -> f64 {
    let (total, remaining) = match state.phase {
        TimerPhase::Idle => return 0.0,
        TimerPhase::Finished => return 1.0,
        TimerPhase::Running | TimerPhase::Paused => {
            (state.picked.total_seconds(), state.remaining_seconds)
        }
    };

    let total = f64::from(total.max(1));
    ((total - f64::from(remaining)) / total).clamp(0.0, 1.0)
}
