//! Turns raw estimates into what the tuner shows.

use std::fmt;

use crate::note::{Note, NOTE_LABEL_WIDTH};

pub const HEADER: &str = "LAST NOTE    CUR FREQ";

/// Remembers the last note heard inside the valid frequency window.
#[derive(Debug)]
pub struct Tuner {
    min_freq: f64,
    max_freq: f64,
    last_note: Option<Note>,
}

/// One line of tuner output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub frequency: f64,
    /// Whether `frequency` itself fell inside the valid window.
    pub in_range: bool,
    pub last_note: Option<Note>,
}

impl Tuner {
    pub fn new(min_freq: f64, max_freq: f64) -> Self {
        Self {
            min_freq,
            max_freq,
            last_note: None,
        }
    }

    /// Inclusive check against the configured window.
    pub fn in_range(&self, frequency: f64) -> bool {
        frequency >= self.min_freq && frequency <= self.max_freq
    }

    pub fn update(&mut self, frequency: f64) -> Reading {
        let in_range = self.in_range(frequency);
        if in_range {
            match Note::from_frequency(frequency) {
                Ok(note) => self.last_note = Some(note),
                Err(err) => log::debug!("{}", err),
            }
        }
        Reading {
            frequency,
            in_range,
            last_note: self.last_note,
        }
    }

    pub fn last_note(&self) -> Option<Note> {
        self.last_note
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_note {
            Some(note) => write!(f, "{}", note)?,
            None => write!(f, "{:width$}", "", width = NOTE_LABEL_WIDTH)?,
        }
        write!(f, "          {:07.3}", self.frequency)
    }
}
