//! Live mono input from the default capture device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::dsp::Sample;
use crate::error::{Error, ReadError, Result};
use crate::scheduler::SampleSource;

/// How long a read may go without new samples before it reports a
/// transient failure.
const READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Sleep between polls of an empty ring.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| Error::Capture(format!("couldn't enumerate input devices: {}", e)))?
        .map(|d| d.name().unwrap_or_else(|_| "unknown-input".to_string()))
        .collect();
    Ok(devices)
}

/// Blocking reader over a callback-driven input stream.
///
/// The device callback pushes samples into a ring allocated once at open;
/// reads drain it into requests of any size. Dropping the source stops and
/// closes the stream.
pub struct CaptureSource<S: Sample> {
    _stream: cpal::Stream,
    reader: RingReader<S>,
}

/// Consumer half of the device ring plus the flags the callbacks raise.
struct RingReader<S> {
    ring: rtrb::Consumer<S>,
    overflowed: Arc<AtomicBool>,
    stream_failed: Arc<AtomicBool>,
    timeout: Duration,
}

/// Copies one callback block into the ring without allocating. Samples
/// that don't fit are dropped and flagged.
fn push_block<S: Copy>(producer: &mut rtrb::Producer<S>, data: &[S], overflowed: &AtomicBool) {
    for &sample in data {
        if producer.push(sample).is_err() {
            overflowed.store(true, Ordering::Relaxed);
            break;
        }
    }
}

impl<S: Sample + cpal::SizedSample> CaptureSource<S> {
    /// Opens the default input device with one channel at `sample_rate`.
    ///
    /// `read_size` is the largest read the caller will make and sizes the
    /// ring between the device thread and the reader.
    pub fn open(sample_rate: u32, read_size: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Capture("couldn't get default input device".into()))?;
        log::info!(
            "Using {} audio input device \"{}\"",
            host.id().name(),
            device.name().unwrap_or_else(|_| "unknown-input".to_string())
        );

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = 2 * read_size.max(sample_rate as usize);
        let (mut producer, ring) = rtrb::RingBuffer::<S>::new(capacity).split();
        let overflowed = Arc::new(AtomicBool::new(false));
        let overflow_flag = overflowed.clone();
        let stream_failed = Arc::new(AtomicBool::new(false));
        let failure_flag = stream_failed.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[S], _: &cpal::InputCallbackInfo| {
                    push_block(&mut producer, data, &overflow_flag);
                },
                move |err| {
                    log::error!("Audio input error: {}", err);
                    failure_flag.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| Error::Capture(format!("couldn't open audio input stream: {}", e)))?;
        stream
            .play()
            .map_err(|e| Error::Capture(format!("couldn't start audio input stream: {}", e)))?;

        log::info!(
            "Capturing {} Hz mono {} input (ring of {} samples)",
            sample_rate,
            <S as Sample>::TYPE,
            capacity
        );

        Ok(Self {
            _stream: stream,
            reader: RingReader {
                ring,
                overflowed,
                stream_failed,
                timeout: READ_TIMEOUT,
            },
        })
    }
}

impl<S: Sample> SampleSource<S> for CaptureSource<S> {
    fn read(&mut self, buf: &mut [S]) -> std::result::Result<(), ReadError> {
        self.reader.read(buf)
    }
}

impl<S: Sample> SampleSource<S> for RingReader<S> {
    fn read(&mut self, buf: &mut [S]) -> std::result::Result<(), ReadError> {
        if self.overflowed.swap(false, Ordering::Relaxed) {
            log::warn!("Input overflow, some captured samples were dropped");
        }

        let mut filled = 0;
        let mut last_progress = Instant::now();
        while filled < buf.len() {
            match self.ring.pop() {
                Ok(sample) => {
                    buf[filled] = sample;
                    filled += 1;
                    last_progress = Instant::now();
                }
                Err(_) => {
                    if self.stream_failed.swap(false, Ordering::Relaxed) {
                        return Err(ReadError::Transient("audio input stream failed".into()));
                    }
                    if last_progress.elapsed() >= self.timeout {
                        return Err(ReadError::Transient(
                            "timed out waiting for audio input".into(),
                        ));
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(capacity: usize) -> (rtrb::Producer<i16>, RingReader<i16>) {
        let (producer, ring) = rtrb::RingBuffer::new(capacity).split();
        let reader = RingReader {
            ring,
            overflowed: Arc::new(AtomicBool::new(false)),
            stream_failed: Arc::new(AtomicBool::new(false)),
            timeout: Duration::from_millis(20),
        };
        (producer, reader)
    }

    #[test]
    fn reads_span_callback_blocks() {
        let (mut producer, mut reader) = ring(16);
        let overflowed = reader.overflowed.clone();
        push_block(&mut producer, &[1, 2, 3], &overflowed);
        push_block(&mut producer, &[4, 5, 6, 7], &overflowed);

        let mut buf = [0i16; 5];
        reader.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5]);

        push_block(&mut producer, &[8, 9, 10], &overflowed);
        reader.read(&mut buf).unwrap();
        assert_eq!(buf, [6, 7, 8, 9, 10]);
        assert!(!overflowed.load(Ordering::Relaxed));
    }

    #[test]
    fn full_ring_drops_and_flags_samples() {
        let (mut producer, mut reader) = ring(4);
        let overflowed = reader.overflowed.clone();
        push_block(&mut producer, &[1, 2, 3, 4, 5, 6], &overflowed);
        assert!(overflowed.load(Ordering::Relaxed));

        let mut buf = [0i16; 4];
        reader.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        // The warning consumes the flag.
        assert!(!overflowed.load(Ordering::Relaxed));
    }

    #[test]
    fn starved_read_is_transient() {
        let (mut producer, mut reader) = ring(8);
        let overflowed = reader.overflowed.clone();
        push_block(&mut producer, &[1, 2], &overflowed);
        let mut buf = [0i16; 4];
        assert!(matches!(reader.read(&mut buf), Err(ReadError::Transient(_))));
    }

    #[test]
    fn stream_error_is_transient() {
        let (_producer, mut reader) = ring(8);
        reader.stream_failed.store(true, Ordering::Relaxed);
        let mut buf = [0i16; 1];
        match reader.read(&mut buf) {
            Err(ReadError::Transient(reason)) => assert!(reason.contains("failed")),
            other => panic!("expected a transient failure, got {:?}", other.err()),
        }
        assert!(!reader.stream_failed.load(Ordering::Relaxed));
    }
}
