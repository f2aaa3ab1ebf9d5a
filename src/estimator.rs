//! Chunk of raw samples in, fundamental frequency out.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner, FftPlannerScalar};

use crate::dsp::{
    bin_frequency, hann_window, hps, magnitudes, nmag, normalize, peak_index, Normalization,
    Sample, HPS_DOWNSAMPLE_LIMIT,
};
use crate::error::{Error, Result};

/// Allocates a fixed-size buffer, reporting failure instead of aborting.
pub(crate) fn alloc_buffer<T: Clone>(buffer: &'static str, len: usize, fill: T) -> Result<Box<[T]>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { buffer, len })?;
    data.resize(len, fill);
    Ok(data.into_boxed_slice())
}

/// Working buffers, sized once from the chunk size. Shorter trailing
/// chunks only use a prefix of each.
struct Arena {
    normalized: Box<[f64]>,
    spectrum: Box<[Complex<f64>]>,
    mags: Box<[f64]>,
    hps: Box<[f64]>,
}

impl Arena {
    fn new(chunk_size: usize) -> Result<Self> {
        let m = nmag(chunk_size);
        Ok(Self {
            normalized: alloc_buffer("normalized frame", chunk_size, 0.0)?,
            spectrum: alloc_buffer("spectral frame", chunk_size, Complex::new(0.0, 0.0))?,
            mags: alloc_buffer("magnitude spectrum", m, 0.0)?,
            hps: alloc_buffer("harmonic product spectrum", m, 0.0)?,
        })
    }

    /// Runs normalize, window, transform, magnitude and HPS over `frame`
    /// and returns the peak bin.
    fn analyze<S: Sample>(
        &mut self,
        frame: &[S],
        mode: Normalization,
        fft: &dyn Fft<f64>,
        scratch: &mut [Complex<f64>],
    ) -> usize {
        let len = frame.len();
        let normalized = &mut self.normalized[..len];
        normalize(frame, normalized, mode);
        hann_window(normalized);

        let spectrum = &mut self.spectrum[..len];
        for (bin, &x) in spectrum.iter_mut().zip(normalized.iter()) {
            *bin = Complex::new(x, 0.0);
        }
        fft.process_with_scratch(spectrum, scratch);

        // Upper half mirrors the lower half for real input.
        let m = nmag(len);
        magnitudes(&spectrum[..m], &mut self.mags[..m]);
        hps(&self.mags[..m], &mut self.hps[..m], HPS_DOWNSAMPLE_LIMIT);
        peak_index(&self.hps[..m])
    }
}

/// Frequency estimate for one chunk of a batch run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkEstimate {
    /// Index of the first sample of the chunk.
    pub offset: usize,
    /// Samples analysed; shorter than the chunk size for trailing chunks.
    pub len: usize,
    pub frequency: f64,
}

/// Harmonic product spectrum pitch estimator over fixed-size chunks.
///
/// The transform plan for the configured chunk size is built once, together
/// with all scratch space, so [`estimate`](Self::estimate) never allocates.
pub struct FrequencyEstimator {
    sample_rate: u32,
    chunk_size: usize,
    plan: Arc<dyn Fft<f64>>,
    scratch: Box<[Complex<f64>]>,
    arena: Arena,
}

impl FrequencyEstimator {
    pub fn new(sample_rate: u32, chunk_size: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::config("sample_rate", "must be greater than 0"));
        }
        if chunk_size < 2 {
            return Err(Error::config(
                "chunk_size",
                format!("must be at least 2 samples, got {}", chunk_size),
            ));
        }

        let arena = Arena::new(chunk_size)?;
        let plan = FftPlanner::<f64>::new().plan_fft_forward(chunk_size);
        let scratch = alloc_buffer(
            "transform scratch",
            plan.get_inplace_scratch_len(),
            Complex::new(0.0, 0.0),
        )?;

        log::info!(
            "Planned {}-point transform at {} Hz ({:.3} Hz per bin)",
            chunk_size,
            sample_rate,
            sample_rate as f64 / chunk_size as f64
        );

        Ok(Self {
            sample_rate,
            chunk_size,
            plan,
            scratch,
            arena,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Estimates the fundamental frequency of one full chunk.
    ///
    /// Silence (every sample equal) under rescale normalization yields 0 Hz.
    pub fn estimate<S: Sample>(&mut self, frame: &[S], mode: Normalization) -> Result<f64> {
        if frame.len() != self.chunk_size {
            return Err(Error::FrameLength {
                expected: self.chunk_size,
                actual: frame.len(),
            });
        }
        let peak = self
            .arena
            .analyze(frame, mode, &*self.plan, &mut self.scratch);
        let frequency = bin_frequency(self.sample_rate, peak, self.chunk_size);
        log::debug!("peak bin {} -> {:.3} Hz", peak, frequency);
        Ok(frequency)
    }

    /// Estimates a chunk shorter than the configured size with a one-shot
    /// plan that is dropped on return.
    fn estimate_tail<S: Sample>(&mut self, frame: &[S], mode: Normalization) -> Result<f64> {
        let len = frame.len();
        let plan = FftPlannerScalar::<f64>::new().plan_fft_forward(len);
        let mut scratch = alloc_buffer(
            "tail transform scratch",
            plan.get_inplace_scratch_len(),
            Complex::new(0.0, 0.0),
        )?;
        let peak = self.arena.analyze(frame, mode, &*plan, &mut scratch);
        Ok(bin_frequency(self.sample_rate, peak, len))
    }

    /// Estimates every chunk of a finite recording, advancing `step` samples
    /// between chunks.
    ///
    /// Full chunks use the reusable plan. Once a full chunk no longer fits,
    /// the remaining tail is still walked at the same stride while at least
    /// `step` (and never fewer than two) samples remain, each tail analysed
    /// over its own length.
    pub fn estimate_all<S: Sample>(
        &mut self,
        samples: &[S],
        step: usize,
        mode: Normalization,
    ) -> Result<Vec<ChunkEstimate>> {
        if step == 0 || step > self.chunk_size {
            return Err(Error::config(
                "step",
                format!("must be between 1 and {}, got {}", self.chunk_size, step),
            ));
        }

        let mut estimates = Vec::new();
        let mut offset = 0;
        while offset + self.chunk_size <= samples.len() {
            let frequency = self.estimate(&samples[offset..offset + self.chunk_size], mode)?;
            estimates.push(ChunkEstimate {
                offset,
                len: self.chunk_size,
                frequency,
            });
            offset += step;
        }

        let min_tail = step.max(2);
        while samples.len().saturating_sub(offset) >= min_tail {
            let frame = &samples[offset..];
            let frequency = self.estimate_tail(frame, mode)?;
            estimates.push(ChunkEstimate {
                offset,
                len: frame.len(),
                frequency,
            });
            offset += step;
        }

        Ok(estimates)
    }
}
