//! Magnitude spectrum, harmonic product spectrum and peak picking.

use rustfft::num_complex::Complex;

/// Number of downsampled copies multiplied together by the estimator.
pub const HPS_DOWNSAMPLE_LIMIT: usize = 5;

/// Number of usable one-sided bins for a real input of `chunk_size` samples.
#[inline]
pub fn nmag(chunk_size: usize) -> usize {
    chunk_size / 2
}

/// Writes the modulus of each bin into `mags`, stopping at the shorter of the two.
pub fn magnitudes(bins: &[Complex<f64>], mags: &mut [f64]) {
    for (mag, bin) in mags.iter_mut().zip(bins) {
        *mag = bin.norm();
    }
}

/// Harmonic product spectrum of `mags` into `out`, both of the same length.
///
/// `out[i]` ends up as the product of `mags[i * d]` for `d` in `1..=limit`
/// wherever `i * d` is still inside the spectrum. Entries past the shrinking
/// window of a factor are left as they are for that factor.
pub fn hps(mags: &[f64], out: &mut [f64], limit: usize) {
    let len = mags.len();
    out[..len].copy_from_slice(mags);

    for d in 2..=limit {
        for i in 0..len / d {
            out[i] *= mags[i * d];
        }
    }
}

/// Index of the largest value; the first one wins on ties.
pub fn peak_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Centre frequency in Hz of `bin` for a transform over `n_bins` samples.
#[inline]
pub fn bin_frequency(sample_rate: u32, bin: usize, n_bins: usize) -> f64 {
    (sample_rate as f64 * bin as f64) / n_bins as f64
}
