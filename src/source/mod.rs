//! Implementations of [`SampleSource`](crate::scheduler::SampleSource).

#[cfg(feature = "capture")]
pub mod capture;
mod memory;

#[cfg(feature = "capture")]
pub use capture::CaptureSource;
pub use memory::MemorySource;
