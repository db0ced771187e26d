//! Audio output devices.
//!
//! The alert player opens an [`AudioOutput`] only while it has something to
//! play and drops it on `stop_all`, which releases the device. Each sound
//! plays on its own [`Voice`].

use std::sync::{Arc, Mutex};

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::debug;

use super::error::SoundError;

/// A sound ready to be queued on a voice.
pub type BoxedSource = Box<dyn Source<Item = f32> + Send>;

/// A single playing sound.
pub trait Voice {
    /// Queues `source` for playback.
    fn play(&self, source: BoxedSource);

    /// Stops playback immediately.
    fn stop(&self);

    /// Returns true once everything queued has played.
    fn is_finished(&self) -> bool;
}

impl Voice for Sink {
    fn play(&self, source: BoxedSource) {
        self.append(source);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn is_finished(&self) -> bool {
        self.empty()
    }
}

/// An open output. Dropping it releases the device.
pub trait AudioOutput {
    /// Creates a voice on this output.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::StreamError` if the output refuses a new voice.
    fn new_voice(&self) -> Result<Box<dyn Voice>, SoundError>;
}

/// Something that can open an audio output on demand.
pub trait AudioDevice {
    /// Opens the output.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if there is no device.
    fn open(&self) -> Result<Box<dyn AudioOutput>, SoundError>;
}

/// The system's default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAudioDevice;

struct RodioOutput {
    // Must outlive every sink created from `handle`.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput for RodioOutput {
    fn new_voice(&self) -> Result<Box<dyn Voice>, SoundError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
        Ok(Box::new(sink))
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        debug!("Audio output stream released");
    }
}

impl AudioDevice for DefaultAudioDevice {
    fn open(&self) -> Result<Box<dyn AudioOutput>, SoundError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
        debug!("Audio output stream initialized");
        Ok(Box::new(RodioOutput {
            _stream: stream,
            handle,
        }))
    }
}

/// Something observed by a [`RecordingAudioDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Opened,
    Played { voice: usize },
    Stopped { voice: usize },
    Released,
}

type EventLog = Arc<Mutex<Vec<OutputEvent>>>;

fn push(log: &EventLog, event: OutputEvent) {
    log.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(event);
}

/// Device that plays nothing and records what happens, for tests.
///
/// Voices are idle rodio sinks, so queued sounds never finish on their own.
/// Clones share one log.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudioDevice {
    events: EventLog,
    voices: Arc<Mutex<usize>>,
    unavailable: bool,
}

impl RecordingAudioDevice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that always fails to open.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Every event so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<OutputEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns true while an opened output has not been released.
    #[must_use]
    pub fn is_open(&self) -> bool {
        let events = self.events();
        let opened = events.iter().filter(|e| **e == OutputEvent::Opened).count();
        let released = events.iter().filter(|e| **e == OutputEvent::Released).count();
        opened > released
    }
}

impl AudioDevice for RecordingAudioDevice {
    fn open(&self) -> Result<Box<dyn AudioOutput>, SoundError> {
        if self.unavailable {
            return Err(SoundError::DeviceNotAvailable("no device".to_string()));
        }
        push(&self.events, OutputEvent::Opened);
        Ok(Box::new(RecordingOutput {
            events: Arc::clone(&self.events),
            voices: Arc::clone(&self.voices),
        }))
    }
}

struct RecordingOutput {
    events: EventLog,
    voices: Arc<Mutex<usize>>,
}

impl AudioOutput for RecordingOutput {
    fn new_voice(&self) -> Result<Box<dyn Voice>, SoundError> {
        let mut next = self
            .voices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let index = *next;
        *next += 1;

        let (sink, _queue) = Sink::new_idle();
        Ok(Box::new(RecordingVoice {
            index,
            sink,
            events: Arc::clone(&self.events),
        }))
    }
}

impl Drop for RecordingOutput {
    fn drop(&mut self) {
        push(&self.events, OutputEvent::Released);
    }
}

struct RecordingVoice {
    index: usize,
    sink: Sink,
    events: EventLog,
}

impl Voice for RecordingVoice {
    fn play(&self, source: BoxedSource) {
        self.sink.append(source);
        push(&self.events, OutputEvent::Played { voice: self.index });
    }

    fn stop(&self) {
        self.sink.stop();
        push(&self.events, OutputEvent::Stopped { voice: self.index });
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
