mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use symphonia::core::conv::ConvertibleSample;

use cli::Cli;
use gtune::audio::decode::decode_audio;
use gtune::config::{self, Config};
use gtune::dispatch_sample_type;
use gtune::{FrequencyEstimator, Note, Sample, Tuner};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_devices {
        return list_devices();
    }

    let config = load_merged_config(&cli);
    config.validate().context("Invalid tuner configuration")?;

    log::info!("gtune - monophonic pitch tuner");
    log::info!(
        "Chunk: {} samples, {} step(s), valid range {}-{} Hz",
        config.analysis.chunk_size,
        config.analysis.steps,
        config.analysis.min_freq,
        config.analysis.max_freq
    );
    log::info!(
        "Samples: {} ({:?} normalization)",
        config.audio.sample_type,
        config.normalization()
    );

    match cli.input {
        Some(ref input) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            dispatch_sample_type!(config.audio.sample_type, |S| analyse_file::<S>(input, &config))
        }
        None => dispatch_sample_type!(config.audio.sample_type, |S| run_live::<S>(&config)),
    }
}

/// Explicit --config path, else gtune.toml or the user config directory.
fn load_merged_config(cli: &Cli) -> Config {
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("gtune.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("gtune").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("gtune").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let file_config = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };
    cli.merge_into(file_config)
}

fn analyse_file<S>(input: &Path, config: &Config) -> Result<()>
where
    S: Sample + ConvertibleSample,
{
    log::info!("Input: {}", input.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Decoding audio...");

    let audio = decode_audio::<S>(input)?;
    if audio.sample_rate != config.audio.sample_rate {
        log::info!(
            "Using the file's sample rate of {} Hz instead of {} Hz",
            audio.sample_rate,
            config.audio.sample_rate
        );
    }

    spinner.set_message("Estimating frequencies...");
    let chunk_size = config.analysis.chunk_size;
    let step = gtune::scheduler::step_size(chunk_size, config.analysis.steps)?;
    let mut estimator = FrequencyEstimator::new(audio.sample_rate, chunk_size)?;
    let estimates = estimator.estimate_all(&audio.samples, step, config.normalization())?;
    spinner.finish_and_clear();

    if estimates.is_empty() {
        log::warn!(
            "{} holds {} samples, fewer than one {}-sample step, nothing to analyse",
            input.display(),
            audio.samples.len(),
            step.max(2)
        );
        return Ok(());
    }

    let tuner = Tuner::new(config.analysis.min_freq, config.analysis.max_freq);
    println!("{:>5}  {:>10}  {:>8}  {:>12}  NOTE", "CHUNK", "START", "SAMPLES", "FREQ");
    for (i, estimate) in estimates.iter().enumerate() {
        let note = if tuner.in_range(estimate.frequency) {
            Note::from_frequency(estimate.frequency)
                .map(|n| n.label())
                .unwrap_or_else(|_| "-".to_string())
        } else {
            "-".to_string()
        };
        println!(
            "{:>5}  {:>9.3}s  {:>8}  {:>9.3} Hz  {}",
            i,
            estimate.offset as f64 / audio.sample_rate as f64,
            estimate.len,
            estimate.frequency,
            note
        );
    }

    log::info!("Estimated {} chunks", estimates.len());
    Ok(())
}

#[cfg(feature = "capture")]
fn run_live<S>(config: &Config) -> Result<()>
where
    S: Sample + cpal::SizedSample,
{
    use gtune::source::CaptureSource;
    use gtune::tuner::HEADER;
    use gtune::{ChunkScheduler, StopFlag};
    use std::io::Write;
    use std::ops::ControlFlow;

    let sample_rate = config.audio.sample_rate;
    let chunk_size = config.analysis.chunk_size;

    let mut estimator = FrequencyEstimator::new(sample_rate, chunk_size)?;
    let mut scheduler = ChunkScheduler::<S>::new(chunk_size, config.analysis.steps)?;
    let mut source = CaptureSource::<S>::open(sample_rate, chunk_size)
        .context("Failed to open audio input")?;
    let mut tuner = Tuner::new(config.analysis.min_freq, config.analysis.max_freq);

    let stop = StopFlag::new();
    let handler = stop.clone();
    ctrlc::set_handler(move || handler.request_stop())
        .context("Failed to install interrupt handler")?;

    let mut stdout = std::io::stdout();
    println!("{}", HEADER);
    print!("waiting for data...");
    stdout.flush()?;

    scheduler.run_until(&mut source, &mut estimator, config.normalization(), &stop, |frequency| {
        let reading = tuner.update(frequency);
        print!("\r{}", reading);
        match stdout.flush() {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    })?;

    println!();
    log::info!("Audio input closed");
    Ok(())
}

#[cfg(not(feature = "capture"))]
fn run_live<S: Sample>(_config: &Config) -> Result<()> {
    anyhow::bail!(
        "Live input requires the 'capture' feature. \
         Rebuild with: cargo build --features capture, or pass an audio file"
    );
}

#[cfg(feature = "capture")]
fn list_devices() -> Result<()> {
    let devices = gtune::source::capture::list_input_devices()?;
    println!("Available input devices:");
    for name in &devices {
        println!("  {}", name);
    }
    Ok(())
}

#[cfg(not(feature = "capture"))]
fn list_devices() -> Result<()> {
    anyhow::bail!(
        "Device listing requires the 'capture' feature. \
         Rebuild with: cargo build --features capture"
    );
}
