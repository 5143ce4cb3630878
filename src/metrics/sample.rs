use crate::metrics::ring_buffer::RingBuffer;
use parking_lot::Mutex;

/// Default number of samples kept per host.
pub const DEFAULT_CAPACITY: usize = 120;

/// One tick's reading for a host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Round-trip time in milliseconds.
    Latency(f64),
    /// No reading this tick (timeout, probe failure).
    Gap,
}

impl Sample {
    pub fn latency(&self) -> Option<f64> {
        match self {
            Sample::Latency(ms) => Some(*ms),
            Sample::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Sample::Gap)
    }
}

/// Bounded, time-ordered sample history shared between one writer and any
/// number of readers.
///
/// Every `push` (eviction plus insertion) happens under one lock, so a
/// `snapshot` never observes a half-applied push.
#[derive(Debug)]
pub struct SampleBuffer {
    inner: Mutex<RingBuffer<Sample>>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RingBuffer::new(capacity)),
        }
    }

    pub fn push(&self, sample: Sample) {
        self.inner.lock().push(sample);
    }

    /// Owned copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.inner.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
