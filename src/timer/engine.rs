//! Countdown state machine.
//!
//! The engine owns the timer state and calls out to the notification
//! scheduler and alert player at transition boundaries:
//!
//! ```text
//! Idle ──start──▶ Running ──pause/tap──▶ Paused
//!  ▲               │  ▲                   │
//!  │               │  └────resume/tap─────┘
//!  │            tick→0
//!  │               ▼
//!  └──stop/dismiss─ Finished   (stop also from Running / Paused)
//! ```
//!
//! Ticking is driven from outside; `tick` is a no-op unless running.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::TimerError;
use crate::notification::NotificationScheduler;
use crate::preferences::Preferences;
use crate::sound::{AlertPlayer, Ringtone};
use crate::types::{DurationField, PickedDuration, TimerPhase, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the presentation layer and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A session started
    Started {
        /// Session length
        total_seconds: u32,
    },
    /// Countdown frozen
    Paused {
        /// Remaining seconds at the moment of pausing
        remaining_seconds: u32,
    },
    /// Countdown continued
    Resumed {
        /// Remaining seconds at the moment of resuming
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown reached zero and the alert started ringing
    Finished,
    /// Hard reset back to idle
    Reset,
}

// ============================================================================
// AlertProfile
// ============================================================================

/// What to play when the countdown ends, read from preferences at the moment
/// of the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertProfile {
    pub ringtone: &'static Ringtone,
    pub vibrate: bool,
}

impl AlertProfile {
    #[must_use]
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            ringtone: preferences.selected_ringtone(),
            vibrate: preferences.vibration_enabled,
        }
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the countdown state and its side effects.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Pending "timer done" notification
    notifier: Arc<dyn NotificationScheduler>,
    /// End alert and preview playback
    player: Arc<dyn AlertPlayer>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates an idle engine with the given picked duration.
    pub fn new(
        picked: PickedDuration,
        notifier: Arc<dyn NotificationScheduler>,
        player: Arc<dyn AlertPlayer>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(picked),
            notifier,
            player,
            event_tx,
        }
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    // ── Control availability ─────────────────────────────────────────

    pub fn can_start(&self) -> bool {
        self.state.phase == TimerPhase::Idle && !self.state.picked.is_zero()
    }

    pub fn can_pause(&self) -> bool {
        self.state.phase == TimerPhase::Running
    }

    pub fn can_resume(&self) -> bool {
        self.state.phase == TimerPhase::Paused
    }

    pub fn can_stop(&self) -> bool {
        self.state.phase != TimerPhase::Idle
    }

    // ── Duration editing ─────────────────────────────────────────────

    /// Steps one picker field up or down.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless idle or paused.
    pub fn adjust_picked(&mut self, field: DurationField, delta: i32) -> Result<(), TimerError> {
        self.ensure_editable()?;
        self.state.picked.adjust(field, delta);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), TimerError> {
        if self.state.phase.allows_editing() {
            Ok(())
        } else {
            Err(TimerError::NotEditable(self.state.phase))
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Starts a session from the picked duration.
    ///
    /// # Errors
    ///
    /// Returns an error if not idle or if the picked duration is zero.
    pub fn start(&mut self, alert: &AlertProfile) -> Result<(), TimerError> {
        self.ensure_phase("開始", TimerPhase::Idle)?;
        if self.state.picked.is_zero() {
            return Err(TimerError::ZeroDuration);
        }

        self.state.start();
        let total_seconds = self.state.remaining_seconds;
        self.schedule_notification(alert);

        info!("Timer started: {}s", total_seconds);
        self.emit(TimerEvent::Started { total_seconds })
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is not running.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        self.ensure_phase("一時停止", TimerPhase::Running)?;

        self.state.pause();
        self.notifier.cancel_pending_notification();
        self.player.stop_all();

        debug!("Timer paused at {}s", self.state.remaining_seconds);
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        })
    }

    /// Resumes a paused countdown from its remaining value.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is not paused.
    pub fn resume(&mut self, alert: &AlertProfile) -> Result<(), TimerError> {
        self.ensure_phase("再開", TimerPhase::Paused)?;

        self.state.resume();
        self.schedule_notification(alert);

        debug!("Timer resumed at {}s", self.state.remaining_seconds);
        self.emit(TimerEvent::Resumed {
            remaining_seconds: self.state.remaining_seconds,
        })
    }

    /// Tapping the countdown display: toggles running and paused.
    ///
    /// # Errors
    ///
    /// Returns an error when neither running nor paused.
    pub fn toggle(&mut self, alert: &AlertProfile) -> Result<(), TimerError> {
        match self.state.phase {
            TimerPhase::Running => self.pause(),
            TimerPhase::Paused => self.resume(alert),
            phase => Err(TimerError::InvalidTransition {
                action: "切り替え",
                phase,
            }),
        }
    }

    /// Stops the session from any non-idle phase.
    ///
    /// # Errors
    ///
    /// Returns an error if already idle.
    pub fn stop(&mut self) -> Result<(), TimerError> {
        if !self.can_stop() {
            return Err(TimerError::InvalidTransition {
                action: "停止",
                phase: self.state.phase,
            });
        }
        self.hard_reset()
    }

    /// Dismisses the ringing alert.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is ringing.
    pub fn dismiss(&mut self) -> Result<(), TimerError> {
        if !self.state.ringing {
            return Err(TimerError::InvalidTransition {
                action: "アラーム停止",
                phase: self.state.phase,
            });
        }
        self.hard_reset()
    }

    /// Unconditionally returns to idle, cancelling the notification and
    /// silencing the player. Safe from any phase.
    ///
    /// # Errors
    ///
    /// Returns an error only if the event channel is closed.
    pub fn hard_reset(&mut self) -> Result<(), TimerError> {
        self.notifier.cancel_pending_notification();
        self.player.stop_all();
        self.state.reset();

        info!("Timer reset");
        self.emit(TimerEvent::Reset)
    }

    /// Advances the countdown by one second.
    ///
    /// Returns true if this tick finished the session.
    ///
    /// # Errors
    ///
    /// Returns an error only if the event channel is closed.
    pub fn tick(&mut self, alert: &AlertProfile) -> Result<bool, TimerError> {
        if !self.state.is_running() {
            return Ok(false);
        }

        let completed = self.state.tick();
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        })?;

        if completed {
            self.handle_timer_complete(alert)?;
        }
        Ok(completed)
    }

    /// Handles the transition into the finished phase.
    fn handle_timer_complete(&mut self, alert: &AlertProfile) -> Result<(), TimerError> {
        self.notifier.cancel_pending_notification();
        self.state.finish();

        if let Err(e) = self.player.play_end_alert(alert.ringtone, alert.vibrate) {
            warn!("⚠️  {} ({})", e, e.suggestion());
        }

        info!("Timer finished, ringing '{}'", alert.ringtone.title);
        self.emit(TimerEvent::Finished)
    }

    fn schedule_notification(&self, alert: &AlertProfile) {
        if let Err(e) = self
            .notifier
            .schedule_end_notification(self.state.remaining_seconds, alert.ringtone.asset)
        {
            warn!("⚠️  {} ({})", e, e.suggestion());
        }
    }

    fn ensure_phase(&self, action: &'static str, expected: TimerPhase) -> Result<(), TimerError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(TimerError::InvalidTransition {
                action,
                phase: self.state.phase,
            })
        }
    }

    fn emit(&self, event: TimerEvent) -> Result<(), TimerError> {
        self.event_tx
            .send(event)
            .map_err(|_| TimerError::ChannelClosed)
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MockNotificationScheduler;
    use crate::sound::{default_ringtone, ringtone, AlertCall, MockAlertPlayer};

    struct Harness {
        engine: TimerEngine,
        rx: mpsc::UnboundedReceiver<TimerEvent>,
        notifier: Arc<MockNotificationScheduler>,
        player: Arc<MockAlertPlayer>,
    }

    fn create_engine(h: u32, m: u32, s: u32) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Arc::new(MockNotificationScheduler::new());
        let player = Arc::new(MockAlertPlayer::new());
        let engine = TimerEngine::new(
            PickedDuration::new(h, m, s).unwrap(),
            notifier.clone(),
            player.clone(),
            tx,
        );
        Harness {
            engine,
            rx,
            notifier,
            player,
        }
    }

    fn alert(vibrate: bool) -> AlertProfile {
        AlertProfile {
            ringtone: default_ringtone(),
            vibrate,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_idle() {
            let h = create_engine(0, 0, 5);
            let state = h.engine.get_state();
            assert_eq!(state.phase, TimerPhase::Idle);
            assert_eq!(state.remaining_seconds, 0);
            assert!(h.engine.can_start());
            assert!(!h.engine.can_stop());
        }

        #[test]
        fn test_start_schedules_notification() {
            let mut h = create_engine(0, 1, 30);
            h.engine.start(&alert(true)).unwrap();

            assert_eq!(h.engine.phase(), TimerPhase::Running);
            assert_eq!(h.engine.get_state().remaining_seconds, 90);
            assert_eq!(h.notifier.pending().unwrap().after_seconds, 90);
            assert_eq!(
                drain(&mut h.rx),
                vec![TimerEvent::Started { total_seconds: 90 }]
            );
        }

        #[test]
        fn test_start_with_zero_duration_is_inert() {
            let mut h = create_engine(0, 0, 0);
            assert!(!h.engine.can_start());
            assert_eq!(h.engine.start(&alert(true)), Err(TimerError::ZeroDuration));
            assert_eq!(h.engine.phase(), TimerPhase::Idle);
            assert!(h.notifier.get_schedule_calls().is_empty());
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_start_twice_is_rejected() {
            let mut h = create_engine(0, 0, 5);
            h.engine.start(&alert(true)).unwrap();
            let result = h.engine.start(&alert(true));
            assert!(matches!(
                result,
                Err(TimerError::InvalidTransition {
                    phase: TimerPhase::Running,
                    ..
                })
            ));
            assert_eq!(h.notifier.get_schedule_calls().len(), 1);
        }

        #[test]
        fn test_pause_cancels_notification_and_sound() {
            let mut h = create_engine(0, 0, 10);
            h.engine.start(&alert(true)).unwrap();
            h.engine.get_state_mut().remaining_seconds = 7;

            h.engine.pause().unwrap();

            assert_eq!(h.engine.phase(), TimerPhase::Paused);
            assert_eq!(h.engine.get_state().remaining_seconds, 7);
            assert!(h.notifier.pending().is_none());
            assert_eq!(h.player.get_calls(), vec![AlertCall::StopAll]);
        }

        #[test]
        fn test_resume_reschedules_for_remaining() {
            let mut h = create_engine(0, 0, 10);
            h.engine.start(&alert(true)).unwrap();
            h.engine.tick(&alert(true)).unwrap();
            h.engine.tick(&alert(true)).unwrap();
            h.engine.pause().unwrap();

            h.engine.resume(&alert(true)).unwrap();

            assert_eq!(h.engine.phase(), TimerPhase::Running);
            assert_eq!(h.engine.get_state().remaining_seconds, 8);
            assert_eq!(h.notifier.pending().unwrap().after_seconds, 8);
        }

        #[test]
        fn test_pause_and_resume_outside_source_states() {
            let mut h = create_engine(0, 0, 10);
            assert!(h.engine.pause().is_err());
            assert!(h.engine.resume(&alert(true)).is_err());
            assert!(h.engine.stop().is_err());
            assert!(h.engine.dismiss().is_err());
            assert_eq!(h.engine.phase(), TimerPhase::Idle);
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_toggle() {
            let mut h = create_engine(0, 0, 10);
            assert!(h.engine.toggle(&alert(true)).is_err());

            h.engine.start(&alert(true)).unwrap();
            h.engine.toggle(&alert(true)).unwrap();
            assert_eq!(h.engine.phase(), TimerPhase::Paused);
            h.engine.toggle(&alert(true)).unwrap();
            assert_eq!(h.engine.phase(), TimerPhase::Running);
        }

        #[test]
        fn test_stop_from_running_and_paused() {
            for pause_first in [false, true] {
                let mut h = create_engine(0, 0, 10);
                h.engine.start(&alert(true)).unwrap();
                if pause_first {
                    h.engine.pause().unwrap();
                }

                h.engine.stop().unwrap();

                let state = h.engine.get_state();
                assert_eq!(state.phase, TimerPhase::Idle);
                assert_eq!(state.remaining_seconds, 0);
                assert!(!state.ringing);
                assert!(h.notifier.pending().is_none());
                assert!(!h.player.is_playing());
                assert_eq!(drain(&mut h.rx).last(), Some(&TimerEvent::Reset));
            }
        }
    }

    mod editing_tests {
        use super::*;

        #[test]
        fn test_edit_while_idle_and_paused() {
            let mut h = create_engine(0, 0, 10);
            h.engine
                .adjust_picked(DurationField::Minutes, 1)
                .unwrap();
            assert_eq!(h.engine.get_state().picked.total_seconds(), 70);

            h.engine.start(&alert(true)).unwrap();
            h.engine.pause().unwrap();
            h.engine
                .adjust_picked(DurationField::Minutes, 4)
                .unwrap();
            assert_eq!(h.engine.get_state().picked.total_seconds(), 310);

            // Remaining is not affected by editing while paused
            assert_eq!(h.engine.get_state().remaining_seconds, 70);
        }

        #[test]
        fn test_edit_rejected_while_running() {
            let mut h = create_engine(0, 0, 10);
            h.engine.start(&alert(true)).unwrap();
            assert_eq!(
                h.engine.adjust_picked(DurationField::Seconds, 1),
                Err(TimerError::NotEditable(TimerPhase::Running))
            );
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_is_noop_unless_running() {
            let mut h = create_engine(0, 0, 3);
            assert!(!h.engine.tick(&alert(true)).unwrap());

            h.engine.start(&alert(true)).unwrap();
            h.engine.pause().unwrap();
            drain(&mut h.rx);

            assert!(!h.engine.tick(&alert(true)).unwrap());
            assert_eq!(h.engine.get_state().remaining_seconds, 3);
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_five_seconds_finishes_after_five_ticks() {
            let mut h = create_engine(0, 0, 5);
            h.engine.start(&alert(true)).unwrap();

            for _ in 0..4 {
                assert!(!h.engine.tick(&alert(true)).unwrap());
            }
            assert!(h.engine.tick(&alert(true)).unwrap());

            let state = h.engine.get_state();
            assert_eq!(state.phase, TimerPhase::Finished);
            assert_eq!(state.remaining_seconds, 0);
            assert!(state.ringing);
            assert_eq!(h.player.end_alert_count(), 1);
            assert!(h.notifier.pending().is_none());

            let events = drain(&mut h.rx);
            assert_eq!(events.last(), Some(&TimerEvent::Finished));
            assert_eq!(
                events
                    .iter()
                    .filter(|e| matches!(e, TimerEvent::Tick { .. }))
                    .count(),
                5
            );
        }

        #[test]
        fn test_finish_passes_ringtone_and_vibration() {
            let mut h = create_engine(0, 0, 1);
            let bell = ringtone::find_by_title("Bell").unwrap();
            let profile = AlertProfile {
                ringtone: bell,
                vibrate: false,
            };

            h.engine.start(&profile).unwrap();
            h.engine.tick(&profile).unwrap();

            assert_eq!(
                h.player.get_calls().last(),
                Some(&AlertCall::EndAlert {
                    ringtone_id: "bell",
                    vibrate: false
                })
            );
            assert!(!h.player.is_vibrating());
        }

        #[test]
        fn test_ticks_after_finish_do_nothing() {
            let mut h = create_engine(0, 0, 1);
            h.engine.start(&alert(true)).unwrap();
            h.engine.tick(&alert(true)).unwrap();
            assert!(!h.engine.tick(&alert(true)).unwrap());
            assert_eq!(h.player.end_alert_count(), 1);
        }

        #[test]
        fn test_dismiss_ringing_alert() {
            let mut h = create_engine(0, 0, 1);
            h.engine.start(&alert(true)).unwrap();
            h.engine.tick(&alert(true)).unwrap();
            assert!(h.player.is_vibrating());

            h.engine.dismiss().unwrap();

            let state = h.engine.get_state();
            assert_eq!(state.phase, TimerPhase::Idle);
            assert!(!state.ringing);
            assert!(!h.player.is_playing());
            assert!(!h.player.is_vibrating());
        }

        #[test]
        fn test_player_failure_does_not_block_finish() {
            let mut h = create_engine(0, 0, 1);
            h.player.set_should_fail(true);
            h.engine.start(&alert(true)).unwrap();
            assert!(h.engine.tick(&alert(true)).unwrap());
            assert_eq!(h.engine.phase(), TimerPhase::Finished);
        }

        #[test]
        fn test_notifier_failure_does_not_block_start() {
            let mut h = create_engine(0, 0, 2);
            h.notifier.set_should_fail(true);
            h.engine.start(&alert(true)).unwrap();
            assert_eq!(h.engine.phase(), TimerPhase::Running);
        }

        #[test]
        fn test_closed_channel_is_reported() {
            let mut h = create_engine(0, 0, 2);
            drop(h.rx);
            assert_eq!(h.engine.start(&alert(true)), Err(TimerError::ChannelClosed));
        }
    }

    mod integration_tests {
        use super::*;
        use tokio::time::{interval, Duration, MissedTickBehavior};

        #[tokio::test]
        async fn test_interval_driven_countdown() {
            let mut h = create_engine(0, 0, 3);
            h.engine.start(&alert(false)).unwrap();

            let mut ticker = interval(Duration::from_millis(10));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            let mut ticks = 0;
            while h.engine.phase() == TimerPhase::Running {
                ticker.tick().await;
                h.engine.tick(&alert(false)).unwrap();
                ticks += 1;
            }

            assert_eq!(ticks, 3);
            assert_eq!(h.engine.phase(), TimerPhase::Finished);
        }
    }
}
