use std::f64::consts::PI;
use std::ops::ControlFlow;

use gtune::dsp::bin_frequency;
use gtune::source::MemorySource;
use gtune::{ChunkScheduler, FrequencyEstimator, Normalization, Note};

const SAMPLE_RATE: u32 = 44100;

/// Fundamental plus decaying harmonics, roughly a plucked string.
fn tone(frequency: f64, len: usize, phase: usize) -> Vec<f64> {
    (phase..phase + len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            (1..=6)
                .map(|k| {
                    let k = k as f64;
                    0.5 / k * (2.0 * PI * k * frequency * t).sin()
                })
                .sum()
        })
        .collect()
}

fn to_i16(samples: &[f64]) -> Vec<i16> {
    samples.iter().map(|s| (s * 16000.0).round() as i16).collect()
}

#[test]
fn low_e_string_at_full_resolution() {
    let chunk = 32768;
    let expected = bin_frequency(SAMPLE_RATE, 61, chunk);
    let mut estimator = FrequencyEstimator::new(SAMPLE_RATE, chunk).unwrap();

    let frequency = estimator
        .estimate(&tone(expected, chunk, 0), Normalization::Direct)
        .unwrap();
    assert_eq!(frequency, expected);
    assert_eq!(Note::from_frequency(frequency).unwrap().label(), "E2 ");
}

#[test]
fn integer_samples_match_float_samples() {
    let chunk = 32768;
    let expected = bin_frequency(SAMPLE_RATE, 327, chunk);
    let mut estimator = FrequencyEstimator::new(SAMPLE_RATE, chunk).unwrap();
    let samples = tone(expected, chunk, 0);

    let from_float = estimator.estimate(&samples, Normalization::Direct).unwrap();
    let from_int = estimator
        .estimate(&to_i16(&samples), Normalization::Rescale)
        .unwrap();
    assert_eq!(from_float, expected);
    assert_eq!(from_int, expected);
    assert_eq!(Note::from_frequency(from_int).unwrap().label(), "A4 ");
}

#[test]
fn no_step_scheduler_matches_direct_estimates() {
    let chunk = 4096;
    let bins = [20, 35, 50, 27];
    let mut stream = Vec::new();
    for (i, &bin) in bins.iter().enumerate() {
        stream.extend(to_i16(&tone(bin_frequency(SAMPLE_RATE, bin, chunk), chunk, i * chunk)));
    }

    let mut direct = Vec::new();
    let mut estimator = FrequencyEstimator::new(SAMPLE_RATE, chunk).unwrap();
    for frame in stream.chunks_exact(chunk) {
        direct.push(estimator.estimate(frame, Normalization::Rescale).unwrap());
    }

    let mut scheduled = Vec::new();
    let mut scheduler = ChunkScheduler::<i16>::new(chunk, 1).unwrap();
    let mut source = MemorySource::new(stream);
    scheduler
        .run(&mut source, &mut estimator, Normalization::Rescale, |f| {
            scheduled.push(f);
            ControlFlow::Continue(())
        })
        .unwrap();

    assert_eq!(scheduled, direct);
    let expected: Vec<f64> = bins
        .iter()
        .map(|&b| bin_frequency(SAMPLE_RATE, b, chunk))
        .collect();
    assert_eq!(scheduled, expected);
}

#[test]
fn overlap_yields_one_estimate_per_step() {
    let chunk = 4096;
    let steps = 4;
    let expected = bin_frequency(SAMPLE_RATE, 30, chunk);
    let samples: Vec<f32> = tone(expected, 4 * chunk, 0)
        .into_iter()
        .map(|s| s as f32)
        .collect();

    let mut estimator = FrequencyEstimator::new(SAMPLE_RATE, chunk).unwrap();
    let mut scheduler = ChunkScheduler::<f32>::new(chunk, steps).unwrap();
    let mut source = MemorySource::new(samples.clone());
    let mut estimates = Vec::new();
    scheduler
        .run(&mut source, &mut estimator, Normalization::Direct, |f| {
            estimates.push(f);
            ControlFlow::Continue(())
        })
        .unwrap();

    // First chunk, then one per 1024-sample step of the remaining three chunks.
    assert_eq!(estimates.len(), 1 + 3 * steps);

    // Every resident window is a contiguous slice of the stream.
    let step = scheduler.step_size();
    for (i, &f) in estimates.iter().enumerate() {
        let window = &samples[i * step..i * step + chunk];
        let direct = estimator.estimate(window, Normalization::Direct).unwrap();
        assert_eq!(f, direct);
    }
}
