//! Desktop notification delivery.

use std::path::PathBuf;
use std::sync::Mutex;

use notify_rust::Notification;
use tracing::debug;

use super::content::{NotificationContent, NotificationSound, APP_NAME};
use super::error::NotificationError;
use crate::sound::{AssetLibrary, SoundSource};

/// Something that can put a notification on screen right now.
///
/// Delivery may block; the scheduler calls it off the runtime thread.
pub trait NotificationCenter: Send + Sync {
    /// Shows `content`. With `suppress_sound` set the banner appears silently.
    ///
    /// # Errors
    ///
    /// Returns an error if the desktop refused or could not show it.
    fn deliver(
        &self,
        content: &NotificationContent,
        suppress_sound: bool,
    ) -> Result<(), NotificationError>;
}

/// The sound a delivered notification asks the desktop to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveredSound {
    Silent,
    /// A bundled asset, by absolute path
    File(PathBuf),
    /// Whatever the desktop plays by default
    PlatformDefault,
}

/// Delivers through the desktop notification service via `notify-rust`.
#[derive(Debug, Clone)]
pub struct DesktopNotificationCenter {
    library: AssetLibrary,
}

impl DesktopNotificationCenter {
    /// Creates a center resolving bundled sounds in `library`.
    #[must_use]
    pub fn new(library: AssetLibrary) -> Self {
        Self { library }
    }

    /// Resolves the sound for `content`. A named asset missing from the
    /// library falls back to the platform default.
    #[must_use]
    pub fn resolve_sound(
        &self,
        content: &NotificationContent,
        suppress_sound: bool,
    ) -> DeliveredSound {
        if suppress_sound {
            return DeliveredSound::Silent;
        }
        match &content.sound {
            NotificationSound::Named(name) => match self.library.locate(name) {
                Ok(SoundSource::Asset { path, .. }) => DeliveredSound::File(path),
                _ => {
                    debug!("Notification sound '{}' not bundled, using default", name);
                    DeliveredSound::PlatformDefault
                }
            },
            NotificationSound::Default => DeliveredSound::PlatformDefault,
        }
    }
}

impl NotificationCenter for DesktopNotificationCenter {
    fn deliver(
        &self,
        content: &NotificationContent,
        suppress_sound: bool,
    ) -> Result<(), NotificationError> {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&content.title)
            .body(&content.body);

        let sound = self.resolve_sound(content, suppress_sound);

        // Sound hints only exist on the freedesktop backend.
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            match &sound {
                DeliveredSound::Silent => {
                    notification.hint(notify_rust::Hint::SuppressSound(true));
                }
                DeliveredSound::File(path) => {
                    notification.hint(notify_rust::Hint::SoundFile(path.display().to_string()));
                }
                DeliveredSound::PlatformDefault => {}
            }
        }

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        debug!(
            "Notification '{}' delivered (sound: {:?})",
            content.identifier, sound
        );
        Ok(())
    }
}

/// A delivery recorded by [`RecordingNotificationCenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub content: NotificationContent,
    pub suppress_sound: bool,
}

/// Notification center that records deliveries, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotificationCenter {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingNotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl NotificationCenter for RecordingNotificationCenter {
    fn deliver(
        &self,
        content: &NotificationContent,
        suppress_sound: bool,
    ) -> Result<(), NotificationError> {
        self.deliveries.lock().unwrap().push(Delivery {
            content: content.clone(),
            suppress_sound,
        });
        Ok(())
    }
}
