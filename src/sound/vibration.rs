//! Repeating vibration pulse.
//!
//! A [`VibrationLoop`] drives a [`Haptics`] backend on a fixed interval from a
//! task on the current tokio runtime until it is stopped.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

/// Interval between vibration pulses while the alert rings.
pub const VIBRATION_INTERVAL: Duration = Duration::from_millis(1500);

/// A device able to emit a single haptic pulse.
pub trait Haptics: Send + Sync {
    fn pulse(&self);
}

/// Haptics backend that rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse(&self) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

/// Haptics backend that counts pulses, for tests.
#[derive(Debug, Default)]
pub struct MockHaptics {
    pulses: AtomicUsize,
}

impl MockHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pulse_count(&self) -> usize {
        self.pulses.load(Ordering::SeqCst)
    }
}

impl Haptics for MockHaptics {
    fn pulse(&self) {
        self.pulses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Owns the repeating pulse task.
pub struct VibrationLoop {
    haptics: Arc<dyn Haptics>,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl VibrationLoop {
    /// Creates a loop pulsing every [`VIBRATION_INTERVAL`].
    #[must_use]
    pub fn new(haptics: Arc<dyn Haptics>) -> Self {
        Self::with_period(haptics, VIBRATION_INTERVAL)
    }

    /// Creates a loop with a custom pulse period.
    #[must_use]
    pub fn with_period(haptics: Arc<dyn Haptics>, period: Duration) -> Self {
        Self {
            haptics,
            period,
            task: Mutex::new(None),
        }
    }

    /// Starts pulsing, replacing any loop already running.
    ///
    /// The first pulse fires immediately. Outside a tokio runtime only that
    /// single pulse is emitted.
    pub fn start(&self) {
        self.stop();

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("No runtime for repeating vibration, pulsing once: {}", e);
                self.haptics.pulse();
                return;
            }
        };

        let haptics = Arc::clone(&self.haptics);
        let period = self.period;
        let task = handle.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                haptics.pulse();
            }
        });

        debug!("Vibration loop started ({:?} period)", period);
        *self.lock_task() = Some(task);
    }

    /// Stops pulsing. Safe to call when nothing is running.
    pub fn stop(&self) {
        if let Some(task) = self.lock_task().take() {
            task.abort();
            debug!("Vibration loop stopped");
        }
    }

    /// Returns true while the pulse task is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock_task()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for VibrationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for VibrationLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VibrationLoop")
            .field("period", &self.period)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
