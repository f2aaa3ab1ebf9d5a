//! Real-time fundamental pitch estimation for monophonic audio.
//!
//! A chunk of raw samples is normalized, Hann windowed and transformed;
//! the harmonic product spectrum of its magnitudes picks the fundamental,
//! which [`note`] renders as a fixed-width note name. [`ChunkScheduler`]
//! feeds the estimator from a live stream, optionally with overlapping
//! chunks for a faster refresh rate.

pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod estimator;
pub mod note;
pub mod scheduler;
pub mod source;
pub mod tuner;

pub use dsp::{Normalization, Sample, SampleType};
pub use error::{Error, ReadError, Result};
pub use estimator::{ChunkEstimate, FrequencyEstimator};
pub use note::{note_from_frequency, Note};
pub use scheduler::{ChunkScheduler, SampleSource, StopFlag};
pub use tuner::{Reading, Tuner};
