//! Alert sound and vibration for the countdown timer.
//!
//! This module provides:
//!
//! - The static ringtone catalog
//! - Bundled asset lookup with system tone fallback
//! - One-shot previews and the looping end-of-timer alert
//! - A repeating vibration pulse
//! - An audio output held open only while something plays
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AlertPlayer    │ ← Main interface
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundSource    │────▶│  Bundled assets  │
//! │                  │     │  (assets dir)    │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  System tones    │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use countdown::sound::{
//!     default_ringtone, AlertPlayer, AssetLibrary, RodioAlertPlayer, TerminalBell,
//! };
//!
//! let player = RodioAlertPlayer::new(AssetLibrary::default(), Arc::new(TerminalBell));
//! let _ = player.preview(default_ringtone());
//! player.stop_all();
//! ```

mod error;
mod output;
mod player;
pub mod ringtone;
mod source;
pub mod system;
mod vibration;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use output::{
    AudioDevice, AudioOutput, BoxedSource, DefaultAudioDevice, OutputEvent, RecordingAudioDevice,
    Voice,
};
pub use player::RodioAlertPlayer;
pub use ringtone::{catalog, default_ringtone, Ringtone};
pub use source::{AssetLibrary, SoundSource};
pub use vibration::{Haptics, MockHaptics, TerminalBell, VibrationLoop, VIBRATION_INTERVAL};

/// Trait for alert playback implementations.
///
/// All operations stop whatever was playing before they start anything new,
/// so previews and alerts never overlap.
pub trait AlertPlayer {
    /// Stops any playback, then plays the ringtone once. Never vibrates.
    ///
    /// # Errors
    ///
    /// Returns an error only if neither the asset nor the system tone could
    /// be played.
    fn preview(&self, ringtone: &Ringtone) -> Result<(), SoundError>;

    /// Stops any playback, then loops the ringtone until stopped and, if
    /// `vibrate` is set, starts the repeating vibration pulse.
    ///
    /// Vibration starts even when audio fails.
    ///
    /// # Errors
    ///
    /// Returns an error only if no audio could be played.
    fn play_end_alert(&self, ringtone: &Ringtone, vibrate: bool) -> Result<(), SoundError>;

    /// Stops audio and vibration. Idempotent.
    fn stop_all(&self);

    /// Returns true while a sound is playing.
    fn is_playing(&self) -> bool;

    /// Returns true while the vibration pulse repeats.
    fn is_vibrating(&self) -> bool;
}

/// A call recorded by [`MockAlertPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertCall {
    Preview { ringtone_id: &'static str },
    EndAlert { ringtone_id: &'static str, vibrate: bool },
    StopAll,
}

/// Mock alert player for testing.
#[derive(Debug, Default)]
pub struct MockAlertPlayer {
    calls: Mutex<Vec<AlertCall>>,
    playing: AtomicBool,
    vibrating: AtomicBool,
    should_fail: AtomicBool,
}

impl MockAlertPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<AlertCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of end alerts started.
    #[must_use]
    pub fn end_alert_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, AlertCall::EndAlert { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: AlertCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn halt(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.vibrating.store(false, Ordering::SeqCst);
    }
}

impl AlertPlayer for MockAlertPlayer {
    fn preview(&self, ringtone: &Ringtone) -> Result<(), SoundError> {
        self.halt();
        self.record(AlertCall::Preview {
            ringtone_id: ringtone.id,
        });
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn play_end_alert(&self, ringtone: &Ringtone, vibrate: bool) -> Result<(), SoundError> {
        self.halt();
        self.record(AlertCall::EndAlert {
            ringtone_id: ringtone.id,
            vibrate,
        });
        self.vibrating.store(vibrate, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_all(&self) {
        self.halt();
        self.record(AlertCall::StopAll);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn is_vibrating(&self) -> bool {
        self.vibrating.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_preview_replaces_previous_preview() {
        let mock = MockAlertPlayer::new();
        let bell = ringtone::find_by_title("Bell").unwrap();

        mock.preview(default_ringtone()).unwrap();
        mock.preview(bell).unwrap();

        assert_eq!(
            mock.get_calls(),
            vec![
                AlertCall::Preview {
                    ringtone_id: "default"
                },
                AlertCall::Preview { ringtone_id: "bell" },
            ]
        );
        assert!(mock.is_playing());
        assert!(!mock.is_vibrating());
    }

    #[test]
    fn test_mock_end_alert_vibration_flag() {
        let mock = MockAlertPlayer::new();

        mock.play_end_alert(default_ringtone(), false).unwrap();
        assert!(mock.is_playing());
        assert!(!mock.is_vibrating());

        mock.play_end_alert(default_ringtone(), true).unwrap();
        assert!(mock.is_vibrating());
        assert_eq!(mock.end_alert_count(), 2);
    }

    #[test]
    fn test_mock_failure_still_vibrates() {
        let mock = MockAlertPlayer::new();
        mock.set_should_fail(true);

        assert!(mock.play_end_alert(default_ringtone(), true).is_err());
        assert!(!mock.is_playing());
        assert!(mock.is_vibrating());
    }

    #[test]
    fn test_mock_stop_all() {
        let mock = MockAlertPlayer::new();
        mock.play_end_alert(default_ringtone(), true).unwrap();
        mock.stop_all();
        mock.stop_all();

        assert!(!mock.is_playing());
        assert!(!mock.is_vibrating());
        assert_eq!(mock.get_calls().last(), Some(&AlertCall::StopAll));
    }

    #[test]
    fn test_mock_clear_calls() {
        let mock = MockAlertPlayer::new();
        mock.stop_all();
        mock.clear_calls();
        assert!(mock.get_calls().is_empty());
    }
}
