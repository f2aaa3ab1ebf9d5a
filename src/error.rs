use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {param} {reason}")]
    Config { param: &'static str, reason: String },
    #[error("failed to allocate {buffer} buffer of {len} elements")]
    Allocation { buffer: &'static str, len: usize },
    #[error("domain error: {0}")]
    Domain(String),
    #[error("frame holds {actual} samples, expected {expected}")]
    FrameLength { expected: usize, actual: usize },
    #[error("no note label for frequency {0} Hz")]
    NoteOutOfRange(f64),
    #[error("audio capture error: {0}")]
    Capture(String),
}

impl Error {
    pub(crate) fn config(param: &'static str, reason: impl Into<String>) -> Self {
        Error::Config {
            param,
            reason: reason.into(),
        }
    }
}

/// Failure of a single read from a [`SampleSource`](crate::scheduler::SampleSource).
#[derive(Debug, Error)]
pub enum ReadError {
    /// The read can be retried.
    #[error("transient read failure: {0}")]
    Transient(String),
    /// A finite source has no more full reads to give.
    #[error("sample source exhausted")]
    Exhausted,
}
