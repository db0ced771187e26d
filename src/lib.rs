//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown timer.
//! It includes:
//! - Timer engine driving the idle/running/paused/finished state machine
//! - Local "timer done" notification scheduling
//! - Alert sound playback with system tone fallback and vibration pulse
//! - Persisted preferences (selected ringtone, vibration toggle)
//! - Terminal UI and CLI command parsing

pub mod app;
pub mod cli;
pub mod notification;
pub mod preferences;
pub mod sound;
pub mod timer;
pub mod types;
pub mod ui;

// Re-export commonly used types for convenience
pub use types::{format_hms, DurationField, PickedDuration, TimerPhase, TimerState};

pub use timer::{AlertProfile, TimerEngine, TimerError, TimerEvent};

pub use notification::{
    LocalNotificationScheduler, MockNotificationScheduler, NotificationError,
    NotificationScheduler, PendingNotification,
};

pub use sound::{
    AlertCall, AlertPlayer, AssetLibrary, MockAlertPlayer, Ringtone, RodioAlertPlayer,
    SoundError, SoundSource,
};

pub use preferences::{PreferenceStore, Preferences, PreferencesError};

pub use ui::TimerView;
