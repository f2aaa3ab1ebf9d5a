//! Feeds the estimator from a sample stream, optionally with overlapping chunks.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dsp::{Normalization, Sample};
use crate::error::{Error, ReadError, Result};
use crate::estimator::{alloc_buffer, FrequencyEstimator};

/// Producer of raw samples, e.g. an audio input device.
pub trait SampleSource<S: Sample> {
    /// Blocks until `buf` is completely filled.
    fn read(&mut self, buf: &mut [S]) -> std::result::Result<(), ReadError>;
}

/// Shared request to stop a running loop after the chunk in progress.
///
/// Clones share one flag, so a signal handler can hold one and the loop
/// another.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Samples to advance between chunks when a chunk is analysed `steps` times.
pub fn step_size(chunk_size: usize, steps: usize) -> Result<usize> {
    if steps == 0 {
        return Err(Error::config("steps", "must be at least 1"));
    }
    let step = chunk_size / steps;
    if step == 0 {
        return Err(Error::config(
            "steps",
            format!(
                "{} steps over a {}-sample chunk leaves an empty step",
                steps, chunk_size
            ),
        ));
    }
    if step > chunk_size {
        return Err(Error::config(
            "steps",
            format!("step of {} exceeds chunk size {}", step, chunk_size),
        ));
    }
    Ok(step)
}

/// Sliding window over the last `chunk_size` samples of a stream.
///
/// With one step every chunk is fresh audio. With `n` steps the window
/// moves `chunk_size / n` samples at a time, so each sample is analysed
/// `n` times. Overlap raises the refresh rate; resolution stays that of
/// the full chunk.
pub struct ChunkScheduler<S: Sample> {
    chunk_size: usize,
    steps: usize,
    step_size: usize,
    window: Box<[S]>,
}

impl<S: Sample> ChunkScheduler<S> {
    pub fn new(chunk_size: usize, steps: usize) -> Result<Self> {
        let step_size = step_size(chunk_size, steps)?;
        Ok(Self {
            chunk_size,
            steps,
            step_size,
            window: alloc_buffer("sample window", chunk_size, S::default())?,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn step_size(&self) -> usize {
        self.step_size
    }

    /// The resident chunk, oldest sample first.
    pub fn window(&self) -> &[S] {
        &self.window
    }

    /// Replaces the whole window with fresh samples.
    ///
    /// Returns `false` once the source is exhausted.
    pub fn fill<R: SampleSource<S>>(&mut self, source: &mut R) -> bool {
        read_until_success(source, &mut self.window, None)
    }

    /// Drops the oldest `step_size` samples and reads as many new ones
    /// into the tail.
    ///
    /// Returns `false` once the source is exhausted.
    pub fn advance<R: SampleSource<S>>(&mut self, source: &mut R) -> bool {
        self.slide(source, None)
    }

    fn slide<R: SampleSource<S>>(&mut self, source: &mut R, stop: Option<&StopFlag>) -> bool {
        let kept = self.chunk_size - self.step_size;
        self.window.copy_within(self.step_size.., 0);
        read_until_success(source, &mut self.window[kept..], stop)
    }

    /// Estimates a frequency for every chunk the source yields and hands each
    /// to `sink` until the sink breaks or the source is exhausted.
    ///
    /// The estimator must be configured for the same chunk size.
    pub fn run<R, F>(
        &mut self,
        source: &mut R,
        estimator: &mut FrequencyEstimator,
        mode: Normalization,
        sink: F,
    ) -> Result<()>
    where
        R: SampleSource<S>,
        F: FnMut(f64) -> ControlFlow<()>,
    {
        self.drive(source, estimator, mode, None, sink)
    }

    /// Like [`run`](Self::run), but also returns once `stop` is raised.
    ///
    /// The flag is checked between chunks and while retrying failed reads,
    /// so a chunk read after the request never reaches `sink`.
    pub fn run_until<R, F>(
        &mut self,
        source: &mut R,
        estimator: &mut FrequencyEstimator,
        mode: Normalization,
        stop: &StopFlag,
        sink: F,
    ) -> Result<()>
    where
        R: SampleSource<S>,
        F: FnMut(f64) -> ControlFlow<()>,
    {
        self.drive(source, estimator, mode, Some(stop), sink)
    }

    fn drive<R, F>(
        &mut self,
        source: &mut R,
        estimator: &mut FrequencyEstimator,
        mode: Normalization,
        stop: Option<&StopFlag>,
        mut sink: F,
    ) -> Result<()>
    where
        R: SampleSource<S>,
        F: FnMut(f64) -> ControlFlow<()>,
    {
        if estimator.chunk_size() != self.chunk_size {
            return Err(Error::config(
                "chunk_size",
                format!(
                    "estimator expects {} samples, scheduler holds {}",
                    estimator.chunk_size(),
                    self.chunk_size
                ),
            ));
        }

        let stopped = || stop.is_some_and(StopFlag::is_stopped);
        if stopped() {
            return Ok(());
        }

        log::info!(
            "Analysing {}-sample chunks, {} step(s) of {} samples",
            self.chunk_size,
            self.steps,
            self.step_size
        );

        let mut more = read_until_success(source, &mut self.window, stop);
        while more {
            if stopped() {
                log::info!("Stop requested, leaving the analysis loop");
                break;
            }
            let frequency = estimator.estimate(&self.window, mode)?;
            if sink(frequency).is_break() {
                break;
            }
            more = if self.steps == 1 {
                read_until_success(source, &mut self.window, stop)
            } else {
                self.slide(source, stop)
            };
        }
        Ok(())
    }
}

/// Retries transient failures until the read succeeds. There is no retry
/// budget, so a source that never recovers blocks here forever unless
/// `stop` is raised.
///
/// Returns `false` once the source is exhausted or a stop was requested.
fn read_until_success<S: Sample, R: SampleSource<S>>(
    source: &mut R,
    buf: &mut [S],
    stop: Option<&StopFlag>,
) -> bool {
    loop {
        match source.read(buf) {
            Ok(()) => return true,
            Err(ReadError::Transient(reason)) => {
                log::warn!("Failed to read audio input samples: {}", reason);
                if stop.is_some_and(StopFlag::is_stopped) {
                    return false;
                }
            }
            Err(ReadError::Exhausted) => return false,
        }
    }
}
