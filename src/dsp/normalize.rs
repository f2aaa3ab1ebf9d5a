use serde::Deserialize;

use super::range::RangeMap;
use super::sample::{Sample, SampleType};

/// How raw samples become doubles in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Direct for float kinds, rescale for integer kinds.
    #[default]
    Auto,
    /// Min/max rescale of each frame onto `[-1, 1]`.
    Rescale,
    /// Plain conversion, for sources already known to be normalized.
    Direct,
}

impl Normalization {
    /// Resolves `Auto` for a given sample kind. The result is trusted for
    /// every frame; samples are not checked against `[-1, 1]`.
    pub fn resolve(self, sample_type: SampleType) -> Normalization {
        match self {
            Normalization::Auto if sample_type.is_float() => Normalization::Direct,
            Normalization::Auto => Normalization::Rescale,
            other => other,
        }
    }
}

/// Writes `samples` into `out` as doubles according to `mode`.
///
/// `out` must be at least as long as `samples`; only the first
/// `samples.len()` entries are written.
pub fn normalize<S: Sample>(samples: &[S], out: &mut [f64], mode: Normalization) {
    match mode.resolve(S::TYPE) {
        Normalization::Direct => convert(samples, out),
        _ => rescale(samples, out),
    }
}

fn convert<S: Sample>(samples: &[S], out: &mut [f64]) {
    for (dst, &src) in out.iter_mut().zip(samples) {
        *dst = src.to_f64();
    }
}

fn rescale<S: Sample>(samples: &[S], out: &mut [f64]) {
    let Some((min, max)) = min_max(samples) else {
        return;
    };

    // Constant frame (silence): nothing to scale against.
    let Ok(map) = RangeMap::new(min.to_f64(), max.to_f64(), -1.0, 1.0) else {
        out[..samples.len()].fill(0.0);
        return;
    };

    for (dst, &src) in out.iter_mut().zip(samples) {
        *dst = map.map(src.to_f64());
    }
}

/// Single pass over `samples` using the kind's own comparisons.
fn min_max<S: Sample>(samples: &[S]) -> Option<(S, S)> {
    let (&first, rest) = samples.split_first()?;
    let mut min = first;
    let mut max = first;
    for &s in rest {
        if s.less_than(min) {
            min = s;
        }
        if s.greater_than(max) {
            max = s;
        }
    }
    Some((min, max))
}
