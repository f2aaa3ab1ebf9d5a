use crate::error::{Error, Result};

/// Linear map from one inclusive range onto another.
///
/// The source range is checked once on construction so that mapping a
/// whole frame never has to re-validate it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeMap {
    src_start: f64,
    src_len: f64,
    dst_start: f64,
    dst_len: f64,
}

impl RangeMap {
    pub fn new(src_start: f64, src_end: f64, dst_start: f64, dst_end: f64) -> Result<Self> {
        let src_len = src_end - src_start;
        if src_len == 0.0 || !src_len.is_finite() {
            return Err(Error::Domain(format!(
                "cannot map from single-valued range [{}, {}]",
                src_start, src_end
            )));
        }
        Ok(Self {
            src_start,
            src_len,
            dst_start,
            dst_len: dst_end - dst_start,
        })
    }

    #[inline]
    pub fn map(&self, value: f64) -> f64 {
        self.dst_start + ((value - self.src_start) / self.src_len) * self.dst_len
    }
}

/// Maps `value` from `[src_start, src_end]` onto `[dst_start, dst_end]`.
pub fn map_range(
    value: f64,
    src_start: f64,
    src_end: f64,
    dst_start: f64,
    dst_end: f64,
) -> Result<f64> {
    RangeMap::new(src_start, src_end, dst_start, dst_end).map(|m| m.map(value))
}
