use clap::Parser;
use std::path::PathBuf;

use gtune::config::{
    default_chunk_size, default_max_freq, default_min_freq, default_sample_rate,
    default_sample_type, default_steps, Config,
};
use gtune::{Normalization, SampleType};

#[derive(Parser, Debug)]
#[command(name = "gtune", about = "Monophonic pitch tuner for live input or audio files")]
pub struct Cli {
    /// Audio file to analyse (WAV, MP3, FLAC, OGG). Live input when omitted.
    pub input: Option<PathBuf>,

    /// Config file (default: gtune.toml, then the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Capture sample rate in Hz. Files use their own rate.
    #[arg(long, default_value_t = default_sample_rate())]
    pub sample_rate: u32,

    /// Samples per analysed chunk
    #[arg(long, default_value_t = default_chunk_size())]
    pub chunk_size: usize,

    /// Times each chunk is analysed while sliding over the stream (1 = no overlap)
    #[arg(long, default_value_t = default_steps())]
    pub steps: usize,

    /// Lowest frequency in Hz that updates the displayed note
    #[arg(long, default_value_t = default_min_freq())]
    pub min_freq: f64,

    /// Highest frequency in Hz that updates the displayed note
    #[arg(long, default_value_t = default_max_freq())]
    pub max_freq: f64,

    /// Numeric type of raw samples
    #[arg(long, value_enum, default_value_t = default_sample_type())]
    pub sample_type: SampleType,

    /// How raw samples are brought into [-1, 1]
    #[arg(long, value_enum, default_value_t = Normalization::Auto)]
    pub normalization: Normalization,

    /// List audio input devices and exit
    #[arg(long)]
    pub list_devices: bool,
}

impl Cli {
    /// Applies CLI flags over `config`. A flag left at its default keeps the
    /// config file's value.
    pub fn merge_into(&self, mut config: Config) -> Config {
        if self.sample_rate != default_sample_rate() { config.audio.sample_rate = self.sample_rate; }
        if self.sample_type != default_sample_type() { config.audio.sample_type = self.sample_type; }
        if self.normalization != Normalization::Auto { config.audio.normalization = self.normalization; }
        if self.chunk_size != default_chunk_size() { config.analysis.chunk_size = self.chunk_size; }
        if self.steps != default_steps() { config.analysis.steps = self.steps; }
        if self.min_freq != default_min_freq() { config.analysis.min_freq = self.min_freq; }
        if self.max_freq != default_max_freq() { config.analysis.max_freq = self.max_freq; }
        config
    }
}
