use crate::dsp::Sample;
use crate::error::ReadError;
use crate::scheduler::SampleSource;

/// Serves a finite, already loaded run of samples front to back.
pub struct MemorySource<S: Sample> {
    samples: Vec<S>,
    pos: usize,
}

impl<S: Sample> MemorySource<S> {
    pub fn new(samples: Vec<S>) -> Self {
        Self { samples, pos: 0 }
    }

    /// Samples not yet read.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.pos
    }
}

impl<S: Sample> SampleSource<S> for MemorySource<S> {
    fn read(&mut self, buf: &mut [S]) -> Result<(), ReadError> {
        if self.remaining() < buf.len() {
            return Err(ReadError::Exhausted);
        }
        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.samples[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order_until_short() {
        let mut source = MemorySource::new(vec![1i16, 2, 3, 4, 5]);
        let mut buf = [0i16; 2];
        source.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        source.read(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
        assert_eq!(source.remaining(), 1);
        assert!(matches!(source.read(&mut buf), Err(ReadError::Exhausted)));
        // A short read consumes nothing.
        assert_eq!(source.remaining(), 1);
        let mut one = [0i16; 1];
        source.read(&mut one).unwrap();
        assert_eq!(one, [5]);
    }
}
