//! Supported raw sample kinds.

use std::fmt;

use serde::Deserialize;

/// Numeric kind of a raw sample, selected once from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    Float32,
    Float64,
    Int16,
    Int32,
    Uint16,
    Uint32,
}

impl SampleType {
    pub const ALL: [SampleType; 6] = [
        SampleType::Float32,
        SampleType::Float64,
        SampleType::Int16,
        SampleType::Int32,
        SampleType::Uint16,
        SampleType::Uint32,
    ];

    /// Size of one sample in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            SampleType::Float32 => 4,
            SampleType::Float64 => 8,
            SampleType::Int16 => 2,
            SampleType::Int32 => 4,
            SampleType::Uint16 => 2,
            SampleType::Uint32 => 4,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleType::Float32 => "float32",
            SampleType::Float64 => "float64",
            SampleType::Int16 => "int16",
            SampleType::Int32 => "int32",
            SampleType::Uint16 => "uint16",
            SampleType::Uint32 => "uint32",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three operations the normalizer needs from a sample kind.
///
/// Adding a numeric kind means implementing exactly these plus naming
/// its [`SampleType`] tag.
pub trait Sample: Copy + Default + Send + 'static {
    const TYPE: SampleType;

    fn less_than(self, other: Self) -> bool;
    fn greater_than(self, other: Self) -> bool;
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($ty:ty, $tag:expr) => {
        impl Sample for $ty {
            const TYPE: SampleType = $tag;

            #[inline]
            fn less_than(self, other: Self) -> bool {
                self < other
            }

            #[inline]
            fn greater_than(self, other: Self) -> bool {
                self > other
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_sample!(f32, SampleType::Float32);
impl_sample!(f64, SampleType::Float64);
impl_sample!(i16, SampleType::Int16);
impl_sample!(i32, SampleType::Int32);
impl_sample!(u16, SampleType::Uint16);
impl_sample!(u32, SampleType::Uint32);

/// Calls a generic function with the Rust type matching a [`SampleType`] tag.
///
/// `dispatch_sample_type!(tag, |S| body)` expands `body` once per kind with
/// `S` bound to the concrete sample type.
#[macro_export]
macro_rules! dispatch_sample_type {
    ($tag:expr, |$s:ident| $body:expr) => {
        match $tag {
            $crate::dsp::SampleType::Float32 => {
                type $s = f32;
                $body
            }
            $crate::dsp::SampleType::Float64 => {
                type $s = f64;
                $body
            }
            $crate::dsp::SampleType::Int16 => {
                type $s = i16;
                $body
            }
            $crate::dsp::SampleType::Int32 => {
                type $s = i32;
                $body
            }
            $crate::dsp::SampleType::Uint16 => {
                type $s = u16;
                $body
            }
            $crate::dsp::SampleType::Uint32 => {
                type $s = u32;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_of<S: Sample>() -> usize {
        std::mem::size_of::<S>()
    }

    #[test]
    fn byte_widths_match_rust_types() {
        for tag in SampleType::ALL {
            let actual = crate::dispatch_sample_type!(tag, |S| width_of::<S>());
            assert_eq!(tag.byte_width(), actual, "{}", tag);
        }
    }

    #[test]
    fn tags_round_trip_through_dispatch() {
        for tag in SampleType::ALL {
            let resolved = crate::dispatch_sample_type!(tag, |S| <S as Sample>::TYPE);
            assert_eq!(resolved, tag);
        }
    }

    #[test]
    fn integer_extremes_convert_exactly() {
        assert_eq!(u32::MAX.to_f64(), 4294967295.0);
        assert_eq!(i32::MIN.to_f64(), -2147483648.0);
        assert!(i16::MIN.less_than(0));
        assert!(u16::MAX.greater_than(0));
    }

    #[test]
    fn deserializes_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: SampleType,
        }
        let w: Wrapper = toml::from_str("kind = \"uint16\"").unwrap();
        assert_eq!(w.kind, SampleType::Uint16);
    }
}
