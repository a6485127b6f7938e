//! Fixed-capacity rolling window with O(1) amortized insertion

use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent observations
///
/// The oldest sample is evicted on overflow. A running sum keeps the mean
/// O(1); variance walks the window, which is small and bounded.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl RollingWindow {
    /// Create a window; capacity is fixed for the lifetime of the window
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    /// Add a sample, evicting the oldest if the window is full
    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.capacity {
            if let Some(removed) = self.values.pop_front() {
                self.sum -= removed;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    #[inline]
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Sample `offset` positions before the latest (`offset == 0` is the
    /// latest); `None` when the window holds fewer than `offset + 1` samples
    pub fn value_from_latest(&self, offset: usize) -> Option<f64> {
        let len = self.values.len();
        if offset >= len {
            return None;
        }
        self.values.get(len - 1 - offset).copied()
    }

    /// Mean over the whole window
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum / self.values.len() as f64)
    }

    /// Sample standard deviation over the last `count` observations
    ///
    /// Uses the n-1 denominator; `None` when fewer than two samples are
    /// available in the requested tail.
    pub fn std_dev_last(&self, count: usize) -> Option<f64> {
        let len = self.values.len();
        let n = count.min(len);
        if n < 2 {
            return None;
        }
        let tail = self.values.iter().skip(len - n);
        let mean: f64 = tail.clone().sum::<f64>() / n as f64;
        let sum_sq: f64 = tail.map(|v| (v - mean) * (v - mean)).sum();
        Some((sum_sq / (n - 1) as f64).sqrt())
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
