//! Sliding window of colour samples.
//!
//! Keeps the most recent `capacity` samples (oldest first) together with
//! a parallel timestamp sequence, and decides when the window has
//! accumulated enough new samples to justify recomputing the estimates.

use std::collections::VecDeque;

use crate::types::ColorSample;

/// Fixed-capacity FIFO of colour samples with companion timestamps.
#[derive(Debug, Clone)]
pub struct SignalWindow {
    /// Samples, oldest first.
    samples: VecDeque<ColorSample>,
    /// Timestamps, parallel to `samples`.
    timestamps: VecDeque<f64>,
    /// Maximum number of samples retained.
    capacity: usize,
    /// Recompute every this many pushes once full.
    stride: usize,
    /// Pushes since the window first became full.
    since_full: Option<u64>,
}

impl SignalWindow {
    /// Create a window holding `capacity` samples that requests a
    /// recompute every `stride` pushes once full.
    ///
    /// Both values are clamped to at least 1.
    #[must_use]
    pub fn new(capacity: usize, stride: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            timestamps: VecDeque::with_capacity(capacity + 1),
            capacity,
            stride: stride.max(1),
            since_full: None,
        }
    }

    /// Append a sample, evicting the oldest one beyond capacity.
    ///
    /// Returns `true` when downstream estimates are due: on the push that
    /// fills the window and on every `stride`-th push after that.
    pub fn push(&mut self, sample: ColorSample) -> bool {
        self.samples.push_back(sample);
        self.timestamps.push_back(sample.timestamp);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            self.timestamps.pop_front();
        }

        if !self.is_full() {
            return false;
        }

        let count = match self.since_full {
            Some(n) => n + 1,
            None => 0,
        };
        self.since_full = Some(count);
        count % self.stride as u64 == 0
    }

    /// Whether the window holds `capacity` samples.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Number of samples currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &ColorSample> + '_ {
        self.samples.iter()
    }

    /// Timestamps, oldest first.
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        self.timestamps.iter().copied().collect()
    }

    /// Split the window into per-channel sequences `(r, g, b)`.
    #[must_use]
    pub fn channels(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.samples.len();
        let mut r = Vec::with_capacity(n);
        let mut g = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for s in &self.samples {
            r.push(s.r);
            g.push(s.g);
            b.push(s.b);
        }
        (r, g, b)
    }

    /// Empirical sampling rate of the window in Hz.
    #[must_use]
    pub fn sampling_rate(&self) -> f64 {
        let (front, back) = self.timestamps.as_slices();
        if back.is_empty() {
            estimate_sampling_rate(front)
        } else {
            estimate_sampling_rate(&self.timestamps())
        }
    }

    /// Drop every sample and restart the recompute cadence.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.timestamps.clear();
        self.since_full = None;
    }
}

/// Sampling rate as `1 / mean(consecutive timestamp deltas)`.
///
/// Returns `0.0` when fewer than two timestamps are available or the
/// timestamps do not advance; callers treat `0.0` as "no estimate".
#[must_use]
pub fn estimate_sampling_rate(timestamps: &[f64]) -> f64 {
    if timestamps.len() < 2 {
        return 0.0;
    }
    let deltas = timestamps.len() - 1;
    let span: f64 = timestamps.windows(2).map(|w| w[1] - w[0]).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean_dt = span / deltas as f64;
    if !mean_dt.is_finite() || mean_dt <= 0.0 {
        return 0.0;
    }
    1.0 / mean_dt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> ColorSample {
        ColorSample::new(t, t * 2.0, t * 3.0, t)
    }

    #[test]
    fn eviction_is_fifo() {
        let mut w = SignalWindow::new(3, 1);
        for i in 0..5 {
            w.push(sample(f64::from(i)));
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.timestamps(), vec![2.0, 3.0, 4.0]);
        let first = w.samples().next().unwrap();
        assert!((first.r - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn samples_and_timestamps_stay_parallel() {
        let mut w = SignalWindow::new(4, 1);
        for i in 0..9 {
            w.push(sample(f64::from(i)));
            assert_eq!(w.samples().len(), w.timestamps().len());
        }
    }

    #[test]
    fn recompute_fires_on_fill_then_every_stride() {
        let mut w = SignalWindow::new(5, 3);
        let due: Vec<bool> = (0..12).map(|i| w.push(sample(f64::from(i)))).collect();
        // Pushes 0-3 fill the window; push 4 fills it, then every third.
        assert_eq!(
            due,
            vec![false, false, false, false, true, false, false, true, false, false, true, false]
        );
    }

    #[test]
    fn clear_restarts_cadence() {
        let mut w = SignalWindow::new(2, 10);
        w.push(sample(0.0));
        assert!(w.push(sample(1.0)));
        w.clear();
        assert!(w.is_empty());
        assert!(!w.push(sample(2.0)));
        assert!(w.push(sample(3.0)));
    }

    #[test]
    fn channels_split_in_order() {
        let mut w = SignalWindow::new(3, 1);
        w.push(ColorSample::new(1.0, 2.0, 3.0, 0.0));
        w.push(ColorSample::new(4.0, 5.0, 6.0, 0.1));
        let (r, g, b) = w.channels();
        assert_eq!(r, vec![1.0, 4.0]);
        assert_eq!(g, vec![2.0, 5.0]);
        assert_eq!(b, vec![3.0, 6.0]);
    }

    #[test]
    fn sampling_rate_of_uniform_timestamps() {
        let ts: Vec<f64> = (0..31).map(|i| f64::from(i) / 30.0).collect();
        assert!((estimate_sampling_rate(&ts) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn sampling_rate_needs_two_timestamps() {
        assert!((estimate_sampling_rate(&[]) - 0.0).abs() < f64::EPSILON);
        assert!((estimate_sampling_rate(&[1.0]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sampling_rate_of_frozen_clock_is_zero() {
        assert!((estimate_sampling_rate(&[5.0, 5.0, 5.0]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn window_sampling_rate_after_wraparound() {
        let mut w = SignalWindow::new(10, 1);
        for i in 0..25 {
            w.push(sample(f64::from(i) * 0.05));
        }
        assert!((w.sampling_rate() - 20.0).abs() < 1e-6);
    }
}
