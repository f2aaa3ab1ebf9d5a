//! Frequency to note name, e.g. 440 Hz to `A4 `.

use std::fmt;

use crate::error::{Error, Result};

/// Reference pitch A4 in Hz.
pub const A4_FREQ: f64 = 440.0;
/// Approximate frequency of C0 in Hz, the start of octave 0.
pub const C0_FREQ: f64 = 16.35;
/// Display width of every rendered label.
pub const NOTE_LABEL_WIDTH: usize = 3;

const SEMITONES: i64 = 12;

/// Pitch classes in A-relative order, matching semitone offsets from A4.
const PITCH_CLASSES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// A pitch class and octave number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    class: usize,
    octave: u8,
}

impl Note {
    /// Nearest equal-tempered note to `freq` (Hz).
    ///
    /// Only octaves 0 through 9 have a single-digit label; anything outside
    /// that, and any frequency that is not positive and finite, is an error.
    pub fn from_frequency(freq: f64) -> Result<Self> {
        if !(freq > 0.0 && freq.is_finite()) {
            return Err(Error::NoteOutOfRange(freq));
        }

        let semitones = (SEMITONES as f64 * (freq / A4_FREQ).log2()).round() as i64;
        let class = semitones.rem_euclid(SEMITONES) as usize;

        // A frequency just under a C still belongs to that C's octave, so C
        // rounds where every other class floors.
        let raw = (freq / C0_FREQ).log2();
        let octave = if PITCH_CLASSES[class] == "C" {
            raw.round()
        } else {
            raw.floor()
        };
        if !(0.0..=9.0).contains(&octave) {
            return Err(Error::NoteOutOfRange(freq));
        }

        Ok(Self {
            class,
            octave: octave as u8,
        })
    }

    pub fn name(&self) -> &'static str {
        PITCH_CLASSES[self.class]
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn is_sharp(&self) -> bool {
        self.name().ends_with('#')
    }

    /// Fixed-width label: letter, optional sharp, octave digit, space padded.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("{}{}", self.name(), self.octave);
        write!(f, "{:<width$}", label, width = NOTE_LABEL_WIDTH)
    }
}

/// Label for `freq`, see [`Note::from_frequency`].
pub fn note_from_frequency(freq: f64) -> Result<String> {
    Note::from_frequency(freq).map(|note| note.label())
}
