use std::f64::consts::PI;
use std::path::Path;

use gtune::audio::decode::decode_audio;
use gtune::dsp::bin_frequency;
use gtune::{FrequencyEstimator, Normalization, Note};

const SAMPLE_RATE: u32 = 44100;
const CHUNK: usize = 8192;

fn harmonic(frequency: f64, i: usize) -> f64 {
    let t = i as f64 / SAMPLE_RATE as f64;
    (1..=5)
        .map(|k| {
            let k = k as f64;
            0.5 / k * (2.0 * PI * k * frequency * t).sin()
        })
        .sum()
}

/// Writes a 16-bit WAV whose channel `c` plays `frequencies[c]`.
fn write_wav(path: &Path, frequencies: &[f64], frames: usize) {
    let spec = hound::WavSpec {
        channels: frequencies.len() as u16,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        for &f in frequencies {
            writer
                .write_sample((harmonic(f, i) * 16000.0).round() as i16)
                .unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn decodes_and_estimates_a_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a2.wav");
    let expected = bin_frequency(SAMPLE_RATE, 20, CHUNK);
    write_wav(&path, &[expected], 3 * CHUNK);

    let audio = decode_audio::<i16>(&path).unwrap();
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.samples.len(), 3 * CHUNK);

    let mut estimator = FrequencyEstimator::new(audio.sample_rate, CHUNK).unwrap();
    let estimates = estimator
        .estimate_all(&audio.samples, CHUNK, Normalization::Rescale)
        .unwrap();
    assert_eq!(estimates.len(), 3);
    for estimate in &estimates {
        assert_eq!(estimate.len, CHUNK);
        assert_eq!(estimate.frequency, expected);
    }
    assert_eq!(Note::from_frequency(expected).unwrap().label(), "A2 ");
}

#[test]
fn float_decode_keeps_sample_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_wav(&path, &[bin_frequency(SAMPLE_RATE, 40, CHUNK)], CHUNK + 500);

    let audio = decode_audio::<f32>(&path).unwrap();
    assert_eq!(audio.samples.len(), CHUNK + 500);
    assert!(audio.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn stereo_files_use_the_first_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    let left = bin_frequency(SAMPLE_RATE, 20, CHUNK);
    let right = bin_frequency(SAMPLE_RATE, 33, CHUNK);
    write_wav(&path, &[left, right], 2 * CHUNK);

    let audio = decode_audio::<i16>(&path).unwrap();
    assert_eq!(audio.samples.len(), 2 * CHUNK);

    let mut estimator = FrequencyEstimator::new(audio.sample_rate, CHUNK).unwrap();
    let estimates = estimator
        .estimate_all(&audio.samples, CHUNK, Normalization::Rescale)
        .unwrap();
    assert!(estimates.iter().all(|e| e.frequency == left));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(decode_audio::<f32>(&dir.path().join("absent.wav")).is_err());
}
