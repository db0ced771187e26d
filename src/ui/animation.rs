//! Ringing pulse animation.
//!
//! The animation is an explicit handle owned by the app: it is started when
//! the countdown finishes and cancelled on hard reset. Each start bumps a
//! generation counter, so frames computed for an earlier session can be told
//! apart from the current one.

use std::time::{Duration, Instant};

/// Length of one bright/dim cycle.
pub const PULSE_PERIOD: Duration = Duration::from_millis(800);

/// Redraw cadence while the animation is active.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// A cancellable repeating pulse.
#[derive(Debug, Default)]
pub struct PulseAnimation {
    generation: u64,
    started_at: Option<Instant>,
}

impl PulseAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new pulse session, replacing any running one.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    fn start_at(&mut self, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        self.started_at = Some(now);
    }

    /// Stops the pulse. Idempotent.
    pub fn cancel(&mut self) {
        if self.started_at.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pulse intensity in `[0, 1]`, or `None` when inactive.
    #[must_use]
    pub fn intensity(&self) -> Option<f64> {
        self.intensity_at(Instant::now())
    }

    /// Triangle wave over [`PULSE_PERIOD`].
    fn intensity_at(&self, now: Instant) -> Option<f64> {
        let started_at = self.started_at?;
        let period = PULSE_PERIOD.as_secs_f64();
        let t = now.saturating_duration_since(started_at).as_secs_f64() % period / period;
        Some(1.0 - (2.0 * t - 1.0).abs())
    }

    /// True during the bright half of the cycle.
    #[must_use]
    pub fn is_bright(&self) -> bool {
        self.intensity().is_some_and(|i| i >= 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_by_default() {
        let animation = PulseAnimation::new();
        assert!(!animation.is_active());
        assert_eq!(animation.intensity(), None);
        assert!(!animation.is_bright());
    }

    #[test]
    fn test_start_and_cancel_bump_generation() {
        let mut animation = PulseAnimation::new();
        animation.start();
        let first = animation.generation();
        assert!(animation.is_active());

        animation.cancel();
        assert!(!animation.is_active());
        assert!(animation.generation() > first);

        let cancelled = animation.generation();
        animation.cancel();
        assert_eq!(animation.generation(), cancelled);
    }

    #[test]
    fn test_restart_is_new_session() {
        let mut animation = PulseAnimation::new();
        animation.start();
        let first = animation.generation();
        animation.start();
        assert_ne!(animation.generation(), first);
    }

    #[test]
    fn test_intensity_triangle() {
        let mut animation = PulseAnimation::new();
        let t0 = Instant::now();
        animation.start_at(t0);

        let at = |d: Duration| animation.intensity_at(t0 + d).unwrap();
        assert!(at(Duration::ZERO) < 0.01);
        assert!((at(PULSE_PERIOD / 2) - 1.0).abs() < 0.01);
        assert!(at(PULSE_PERIOD) < 0.01);
    }
}
