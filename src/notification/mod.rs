//! Local "timer done" notification scheduling.
//!
//! This module provides:
//!
//! - The [`NotificationScheduler`] contract consumed by the timer engine
//! - A tokio-backed scheduler holding at most one delayed notification
//! - Desktop delivery through `notify-rust`, off the runtime thread
//! - Foreground sound suppression (the alert player owns in-app sound)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use countdown::notification::{
//!     DesktopNotificationCenter, LocalNotificationScheduler, NotificationScheduler,
//! };
//! use countdown::sound::AssetLibrary;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let center = DesktopNotificationCenter::new(AssetLibrary::default());
//!     let scheduler = LocalNotificationScheduler::new(Arc::new(center));
//!     let _ = scheduler.schedule_end_notification(300, Some("bell.wav"));
//!     scheduler.cancel_pending_notification();
//! }
//! ```

mod center;
mod content;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, warn};

pub use self::center::{
    DeliveredSound, Delivery, DesktopNotificationCenter, NotificationCenter,
    RecordingNotificationCenter,
};
pub use self::content::{
    NotificationContent, NotificationContentBuilder, NotificationSound, APP_NAME, TIMER_DONE_BODY,
    TIMER_DONE_ID, TIMER_DONE_TITLE,
};
pub use self::error::NotificationError;

/// Description of the scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    /// Content to deliver, including the fixed identifier
    pub content: NotificationContent,
    /// Delay requested when scheduling
    pub after_seconds: u32,
}

/// Schedules the single end-of-timer notification.
pub trait NotificationScheduler {
    /// Replaces any pending notification with one firing `after_seconds` from
    /// now, carrying the named bundled sound or the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification cannot be scheduled at all.
    fn schedule_end_notification(
        &self,
        after_seconds: u32,
        sound_asset: Option<&str>,
    ) -> Result<(), NotificationError>;

    /// Removes the pending notification, if any. Idempotent.
    fn cancel_pending_notification(&self);

    /// The notification still waiting to fire, if any.
    fn pending(&self) -> Option<PendingNotification>;

    /// Records whether the app is in the foreground. Notifications delivered
    /// while foregrounded do not play their own sound.
    fn set_foreground(&self, foreground: bool);
}

struct Scheduled {
    info: PendingNotification,
    task: JoinHandle<()>,
}

/// Scheduler that holds the delayed notification as a task on the current
/// tokio runtime.
pub struct LocalNotificationScheduler {
    center: Arc<dyn NotificationCenter>,
    foreground: Arc<AtomicBool>,
    scheduled: Mutex<Option<Scheduled>>,
}

impl LocalNotificationScheduler {
    /// Creates a scheduler delivering through `center`. Starts foregrounded.
    #[must_use]
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self {
            center,
            foreground: Arc::new(AtomicBool::new(true)),
            scheduled: Mutex::new(None),
        }
    }

    /// Returns true if the app is considered foregrounded.
    #[must_use]
    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    fn lock_scheduled(&self) -> MutexGuard<'_, Option<Scheduled>> {
        self.scheduled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationScheduler for LocalNotificationScheduler {
    fn schedule_end_notification(
        &self,
        after_seconds: u32,
        sound_asset: Option<&str>,
    ) -> Result<(), NotificationError> {
        self.cancel_pending_notification();

        let handle = Handle::try_current()
            .map_err(|e| NotificationError::SchedulerUnavailable(e.to_string()))?;

        let content = NotificationContent::timer_done(sound_asset);
        let center = Arc::clone(&self.center);
        let foreground = Arc::clone(&self.foreground);
        let delivered = content.clone();

        let task = handle.spawn(async move {
            tokio::time::sleep(Duration::from_secs(u64::from(after_seconds))).await;
            let suppress_sound = foreground.load(Ordering::SeqCst);
            let delivery = tokio::task::spawn_blocking(move || {
                center.deliver(&delivered, suppress_sound)
            });
            match delivery.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("⚠️  {} ({})", e, e.suggestion()),
                Err(e) => warn!("⚠️  Notification delivery did not complete: {}", e),
            }
        });

        debug!(
            "Scheduled '{}' in {}s",
            content.identifier, after_seconds
        );

        *self.lock_scheduled() = Some(Scheduled {
            info: PendingNotification {
                content,
                after_seconds,
            },
            task,
        });
        Ok(())
    }

    fn cancel_pending_notification(&self) {
        if let Some(scheduled) = self.lock_scheduled().take() {
            scheduled.task.abort();
            debug!("Cancelled '{}'", scheduled.info.content.identifier);
        }
    }

    fn pending(&self) -> Option<PendingNotification> {
        self.lock_scheduled()
            .as_ref()
            .filter(|scheduled| !scheduled.task.is_finished())
            .map(|scheduled| scheduled.info.clone())
    }

    fn set_foreground(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::SeqCst);
    }
}

impl Drop for LocalNotificationScheduler {
    fn drop(&mut self) {
        self.cancel_pending_notification();
    }
}

impl std::fmt::Debug for LocalNotificationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalNotificationScheduler")
            .field("foreground", &self.is_foreground())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Mock scheduler for testing.
#[derive(Debug, Default)]
pub struct MockNotificationScheduler {
    pending: Mutex<Option<PendingNotification>>,
    schedule_calls: Mutex<Vec<PendingNotification>>,
    cancel_count: AtomicUsize,
    background: AtomicBool,
    should_fail: AtomicBool,
}

impl MockNotificationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Every notification ever scheduled, in order.
    #[must_use]
    pub fn get_schedule_calls(&self) -> Vec<PendingNotification> {
        self.schedule_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_foreground(&self) -> bool {
        !self.background.load(Ordering::SeqCst)
    }
}

impl NotificationScheduler for MockNotificationScheduler {
    fn schedule_end_notification(
        &self,
        after_seconds: u32,
        sound_asset: Option<&str>,
    ) -> Result<(), NotificationError> {
        *self.pending.lock().unwrap() = None;
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::NotAvailable);
        }
        let info = PendingNotification {
            content: NotificationContent::timer_done(sound_asset),
            after_seconds,
        };
        self.schedule_calls.lock().unwrap().push(info.clone());
        *self.pending.lock().unwrap() = Some(info);
        Ok(())
    }

    fn cancel_pending_notification(&self) {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        *self.pending.lock().unwrap() = None;
    }

    fn pending(&self) -> Option<PendingNotification> {
        self.pending.lock().unwrap().clone()
    }

    fn set_foreground(&self, foreground: bool) {
        self.background.store(!foreground, Ordering::SeqCst);
    }
}
