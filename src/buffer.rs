//! Sliding-window sample storage
//!
//! [`SampleBuffer`] keeps the most recent `capacity` samples in arrival
//! order. When a push would exceed the capacity, the oldest sample is
//! evicted (FIFO). Shrinking the capacity discards the oldest excess
//! samples; growing it leaves the contents alone.
//!
//! For display, each sample is labelled by its negative offset from the
//! newest one: the most recent sample is `0`, the one before it `-1`, and so
//! on. [`SampleBuffer::labels`] returns these oldest-first so they line up
//! with [`SampleBuffer::snapshot`].

use crate::error::{Result, ScopeError};
use std::collections::VecDeque;

/// Default number of samples kept in the window
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity FIFO window of samples
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SampleBuffer {
    /// Create an empty buffer holding at most `capacity` samples
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ScopeError::InvalidCapacity(capacity));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a sample, evicting from the front while over capacity
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Change the window size, keeping the most recent samples
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(ScopeError::InvalidCapacity(capacity));
        }
        self.capacity = capacity;
        while self.samples.len() > capacity {
            self.samples.pop_front();
        }
        Ok(())
    }

    /// Remove every sample. The capacity is kept.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Current contents, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Display labels matching [`snapshot`](Self::snapshot): `-(len-1) ..= 0`
    pub fn labels(&self) -> Vec<i64> {
        offset_labels(self.samples.len())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Min, max and mean of the current window
    pub fn stats(&self) -> Option<WindowStats> {
        WindowStats::from_samples(self.samples.iter().copied())
    }
}

/// Labels for `count` samples where the newest is `0`, oldest first
pub fn offset_labels(count: usize) -> Vec<i64> {
    let count = count as i64;
    (0..count).map(|i| -(count - 1 - i)).collect()
}

/// Summary of the samples currently in the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl WindowStats {
    fn from_samples(samples: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for value in samples {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f64,
            count,
        })
    }
}
