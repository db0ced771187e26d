//! Alert player implementation using rodio.
//!
//! This module provides the `RodioAlertPlayer`, which holds the audio output
//! while something plays, the voice of whatever is currently playing and the
//! vibration loop.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rodio::{Decoder, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::output::{AudioDevice, AudioOutput, BoxedSource, DefaultAudioDevice, Voice};
use super::ringtone::Ringtone;
use super::source::{AssetLibrary, SoundSource};
use super::system;
use super::vibration::{Haptics, VibrationLoop};
use super::AlertPlayer;

/// Whether a source plays once or until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Once,
    Loop,
}

/// The voice currently playing and what it plays.
struct Playing {
    voice: Box<dyn Voice>,
    source: SoundSource,
}

/// An alert player that uses rodio for audio playback.
///
/// The output device is opened when something starts playing and released
/// by `stop_all`. At most one voice is alive at a time; starting any
/// playback stops the previous one first.
pub struct RodioAlertPlayer {
    device: Box<dyn AudioDevice>,
    /// Open output, if anything has played since the last `stop_all`.
    output: Mutex<Option<Box<dyn AudioOutput>>>,
    /// Where bundled assets are looked up.
    library: AssetLibrary,
    current: Mutex<Option<Playing>>,
    /// Repeating vibration pulse.
    vibration: VibrationLoop,
}

impl RodioAlertPlayer {
    /// Creates a player on the default output device.
    ///
    /// The device is not opened until the first sound plays; without one the
    /// player still vibrates.
    #[must_use]
    pub fn new(library: AssetLibrary, haptics: Arc<dyn Haptics>) -> Self {
        Self::with_device(library, haptics, Box::new(DefaultAudioDevice))
    }

    /// Creates a player on a specific output device.
    #[must_use]
    pub fn with_device(
        library: AssetLibrary,
        haptics: Arc<dyn Haptics>,
        device: Box<dyn AudioDevice>,
    ) -> Self {
        Self {
            device,
            output: Mutex::new(None),
            library,
            current: Mutex::new(None),
            vibration: VibrationLoop::new(haptics),
        }
    }

    /// Returns true while the output device is held open.
    #[must_use]
    pub fn is_output_open(&self) -> bool {
        self.lock_output().is_some()
    }

    /// The source of the sound currently held, if any.
    #[must_use]
    pub fn now_playing(&self) -> Option<SoundSource> {
        self.lock_current()
            .as_ref()
            .map(|playing| playing.source.clone())
    }

    /// Plays a ringtone, falling back to its system tone if the asset fails.
    fn play_ringtone(&self, ringtone: &Ringtone, playback: Playback) -> Result<(), SoundError> {
        let source = SoundSource::for_ringtone(ringtone, &self.library);

        match &source {
            SoundSource::Asset { name, path } => {
                debug!("Playing asset: {} ({:?})", name, playback);
                match self.play_file(&source, path, playback) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_system() => {
                        warn!(
                            "Failed to play asset '{}': {}, falling back to system tone",
                            name, e
                        );
                        self.play_system(ringtone.system_sound_id, playback)
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::System { id } => {
                debug!("Playing system tone: {} ({:?})", id, playback);
                self.play_system(*id, playback)
            }
        }
    }

    /// Plays a bundled asset file.
    fn play_file(
        &self,
        source: &SoundSource,
        path: &Path,
        playback: Playback,
    ) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::AssetNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?
            .convert_samples::<f32>();

        let boxed: BoxedSource = match playback {
            Playback::Once => Box::new(decoder),
            Playback::Loop => Box::new(decoder.repeat_infinite()),
        };
        self.start_voice(source.clone(), boxed)
    }

    /// Plays a synthesized system tone.
    fn play_system(&self, id: u32, playback: Playback) -> Result<(), SoundError> {
        let boxed: BoxedSource = match playback {
            Playback::Once => Box::new(system::one_shot(id)),
            Playback::Loop => Box::new(system::looping(id)),
        };
        self.start_voice(SoundSource::system(id), boxed)
    }

    /// Opens the output if needed and plays `sound` on a fresh voice.
    fn start_voice(&self, source: SoundSource, sound: BoxedSource) -> Result<(), SoundError> {
        let voice = {
            let mut output = self.lock_output();
            let opened = match output.take() {
                Some(open) => open,
                None => self.device.open()?,
            };
            output.insert(opened).new_voice()?
        };

        if let Some(previous) = self.lock_current().take() {
            previous.voice.stop();
        }
        voice.play(sound);
        *self.lock_current() = Some(Playing { voice, source });
        Ok(())
    }

    fn lock_output(&self) -> MutexGuard<'_, Option<Box<dyn AudioOutput>>> {
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Playing>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AlertPlayer for RodioAlertPlayer {
    fn preview(&self, ringtone: &Ringtone) -> Result<(), SoundError> {
        self.stop_all();
        self.play_ringtone(ringtone, Playback::Once)
    }

    fn play_end_alert(&self, ringtone: &Ringtone, vibrate: bool) -> Result<(), SoundError> {
        self.stop_all();
        if vibrate {
            self.vibration.start();
        }
        self.play_ringtone(ringtone, Playback::Loop)
    }

    fn stop_all(&self) {
        if let Some(playing) = self.lock_current().take() {
            playing.voice.stop();
            debug!("Playback stopped");
        }
        // Voices go first; the output must outlive them.
        self.lock_output().take();
        self.vibration.stop();
    }

    fn is_playing(&self) -> bool {
        self.lock_current()
            .as_ref()
            .is_some_and(|playing| !playing.voice.is_finished())
    }

    fn is_vibrating(&self) -> bool {
        self.vibration.is_active()
    }
}

impl Drop for RodioAlertPlayer {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl std::fmt::Debug for RodioAlertPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlertPlayer")
            .field("output_open", &self.is_output_open())
            .field("library", &self.library)
            .field("vibration", &self.vibration)
            .finish_non_exhaustive()
    }
}
