//! Countdown timer.
//!
//! This module contains the core timer functionality:
//! - `engine`: state machine with transitions and side effects
//! - `error`: inert-action and channel errors

pub mod engine;
pub mod error;

use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

pub use engine::{AlertProfile, TimerEngine, TimerEvent};
pub use error::TimerError;

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Creates the once-per-second ticker driving [`TimerEngine::tick`].
///
/// Late ticks are skipped rather than bursted, so a stalled loop never
/// decrements several seconds at once. Must be called inside a runtime.
pub fn tick_interval() -> Interval {
    let mut ticker = interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tick_interval_period() {
        let ticker = tick_interval();
        assert_eq!(ticker.period(), TICK_PERIOD);
        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Skip);
    }
}
