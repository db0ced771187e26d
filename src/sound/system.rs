//! Synthesized system tones.
//!
//! Each system-sound identifier maps to a short tone pattern built from sine
//! waves. These stand in for platform alert sounds and are what every
//! ringtone falls back to when its bundled asset cannot be played.

use std::time::Duration;

use rodio::source::{self, Amplify, SineWave, Source, TakeDuration};

/// A note in a tone pattern. A frequency of 0 is a rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    pub millis: u64,
}

const fn note(frequency: f32, millis: u64) -> Note {
    Note { frequency, millis }
}

/// Output amplitude for synthesized tones.
const TONE_VOLUME: f32 = 0.3;

/// Silence appended after each pattern repetition when looping.
const LOOP_GAP_MS: u64 = 600;

const KNOWN_TONES: &[(u32, &[Note])] = &[
    // Alarm: two quick high beeps
    (
        1005,
        &[note(1046.5, 150), note(0.0, 80), note(1046.5, 150)],
    ),
    // Chime: descending triad
    (
        1008,
        &[note(1318.5, 160), note(1046.5, 160), note(784.0, 260)],
    ),
    // Bell: single long strike
    (1013, &[note(880.0, 450)]),
    // Pulse: low-high pair
    (1016, &[note(660.0, 120), note(0.0, 60), note(990.0, 180)]),
    // Beacon: rising pair
    (1022, &[note(784.0, 200), note(1174.7, 300)]),
    // Radar: three short pings
    (
        1304,
        &[
            note(1567.98, 90),
            note(0.0, 90),
            note(1567.98, 90),
            note(0.0, 90),
            note(1567.98, 90),
        ],
    ),
];

/// Returns the note pattern for a system-sound identifier.
///
/// Unknown identifiers get a single beep whose pitch is derived from the id,
/// so every id is playable.
#[must_use]
pub fn pattern_for(id: u32) -> Vec<Note> {
    KNOWN_TONES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, notes)| notes.to_vec())
        .unwrap_or_else(|| vec![note(440.0 + (id % 12) as f32 * 55.0, 250)])
}

type ToneSegment = TakeDuration<Amplify<SineWave>>;

fn segment(n: &Note) -> ToneSegment {
    let volume = if n.frequency > 0.0 { TONE_VOLUME } else { 0.0 };
    SineWave::new(n.frequency)
        .amplify(volume)
        .take_duration(Duration::from_millis(n.millis))
}

/// Builds a one-shot source for the tone.
pub fn one_shot(id: u32) -> source::FromIter<std::vec::IntoIter<ToneSegment>> {
    let segments: Vec<ToneSegment> = pattern_for(id).iter().map(segment).collect();
    source::from_iter(segments)
}

/// Builds a source that repeats the tone, with a gap, until the sink stops.
pub fn looping(id: u32) -> source::Repeat<source::FromIter<std::vec::IntoIter<ToneSegment>>> {
    let mut segments: Vec<ToneSegment> = pattern_for(id).iter().map(segment).collect();
    segments.push(segment(&note(0.0, LOOP_GAP_MS)));
    source::from_iter(segments).repeat_infinite()
}
