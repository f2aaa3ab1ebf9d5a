use serde::Deserialize;
use std::path::Path;

use crate::dsp::{Normalization, SampleType};
use crate::error::{Error, Result};
use crate::scheduler::step_size;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_sample_type")]
    pub sample_type: SampleType,
    #[serde(default)]
    pub normalization: Normalization,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default = "default_min_freq")]
    pub min_freq: f64,
    #[serde(default = "default_max_freq")]
    pub max_freq: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            sample_type: default_sample_type(),
            normalization: Normalization::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            steps: default_steps(),
            min_freq: default_min_freq(),
            max_freq: default_max_freq(),
        }
    }
}

pub fn default_sample_rate() -> u32 { 44100 }
pub fn default_sample_type() -> SampleType { SampleType::Float32 }
pub fn default_chunk_size() -> usize { 32768 }
pub fn default_steps() -> usize { 1 }
pub fn default_min_freq() -> f64 { 20.0 }
pub fn default_max_freq() -> f64 { 1500.0 }

impl Config {
    /// Checks every construction parameter, naming the first bad one.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(Error::config("sample_rate", "must be greater than 0"));
        }
        let analysis = &self.analysis;
        if analysis.chunk_size < 2 {
            return Err(Error::config(
                "chunk_size",
                format!("must be at least 2 samples, got {}", analysis.chunk_size),
            ));
        }
        step_size(analysis.chunk_size, analysis.steps)?;

        for (param, value) in [("min_freq", analysis.min_freq), ("max_freq", analysis.max_freq)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::config(param, format!("must be a positive frequency, got {}", value)));
            }
        }
        if analysis.min_freq > analysis.max_freq {
            return Err(Error::config(
                "min_freq",
                format!(
                    "{} Hz is above max_freq {} Hz",
                    analysis.min_freq, analysis.max_freq
                ),
            ));
        }
        Ok(())
    }

    pub fn normalization(&self) -> Normalization {
        self.audio.normalization.resolve(self.audio.sample_type)
    }
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}
