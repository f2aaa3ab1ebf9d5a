//! Numeric stages of the pitch pipeline, leaves first.

pub mod normalize;
pub mod range;
pub mod sample;
pub mod spectrum;
pub mod window;

pub use normalize::{normalize, Normalization};
pub use range::{map_range, RangeMap};
pub use sample::{Sample, SampleType};
pub use spectrum::{bin_frequency, hps, magnitudes, nmag, peak_index, HPS_DOWNSAMPLE_LIMIT};
pub use window::hann_window;
