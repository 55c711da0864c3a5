//! Temporal smoothing of vital sign estimates.
//!
//! Each metric keeps a bounded history of accepted estimates. A fresh
//! estimate is accepted only if it lies strictly inside the metric's
//! plausible range; rejected estimates are dropped without touching the
//! history. The exposed value is the mean of the history, or `0.0` while
//! nothing has been accepted.

use std::collections::VecDeque;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::types::VitalMetrics;

/// Bounded moving-average history for one metric.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    /// Accepted values, oldest first.
    values: VecDeque<f64>,
    /// Maximum number of values retained.
    capacity: usize,
    /// Open interval of plausible values.
    range: (f64, f64),
}

impl MetricHistory {
    /// Create a history of `capacity` values accepting `(low, high)` exclusive.
    #[must_use]
    pub fn new(capacity: usize, range: (f64, f64)) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
            range,
        }
    }

    /// Whether `value` lies inside the plausible range.
    #[must_use]
    pub fn is_plausible(&self, value: f64) -> bool {
        value > self.range.0 && value < self.range.1
    }

    /// Offer a fresh estimate. Returns `true` if it was accepted.
    pub fn push(&mut self, value: f64) -> bool {
        if !self.is_plausible(value) {
            return false;
        }
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
        true
    }

    /// Mean of the accepted values, `0.0` if there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn latest(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Number of accepted values held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value has been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget every accepted value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Smoothing state for heart rate, HRV and respiratory rate.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    bpm: MetricHistory,
    hrv: MetricHistory,
    rr: MetricHistory,
}

impl TemporalSmoother {
    /// Create a smoother with explicit capacity and ranges. HRV accepts
    /// any positive value.
    #[must_use]
    pub fn new(capacity: usize, bpm_range: (f64, f64), rr_range: (f64, f64)) -> Self {
        Self {
            bpm: MetricHistory::new(capacity, bpm_range),
            hrv: MetricHistory::new(capacity, (0.0, f64::INFINITY)),
            rr: MetricHistory::new(capacity, rr_range),
        }
    }

    /// Create a smoother from a pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.smoothing_capacity, config.bpm_range, config.rr_range)
    }

    /// Offer one set of raw estimates and return the smoothed metrics.
    ///
    /// Zero (no estimate) and implausible values are rejected per metric.
    pub fn update(&mut self, raw: VitalMetrics) -> VitalMetrics {
        if !self.bpm.push(raw.bpm) {
            debug!(bpm = raw.bpm, "heart rate estimate rejected");
        }
        if !self.hrv.push(raw.hrv_sdnn) {
            debug!(hrv_sdnn = raw.hrv_sdnn, "HRV estimate rejected");
        }
        if !self.rr.push(raw.rr) {
            debug!(rr = raw.rr, "respiratory rate estimate rejected");
        }
        self.current()
    }

    /// Current smoothed metrics.
    #[must_use]
    pub fn current(&self) -> VitalMetrics {
        VitalMetrics {
            bpm: self.bpm.latest(),
            hrv_sdnn: self.hrv.latest(),
            rr: self.rr.latest(),
        }
    }

    /// Heart rate history.
    #[must_use]
    pub fn bpm_history(&self) -> &MetricHistory {
        &self.bpm
    }

    /// HRV history.
    #[must_use]
    pub fn hrv_history(&self) -> &MetricHistory {
        &self.hrv
    }

    /// Respiratory rate history.
    #[must_use]
    pub fn rr_history(&self) -> &MetricHistory {
        &self.rr
    }

    /// Forget all histories.
    pub fn clear(&mut self) {
        self.bpm.clear();
        self.hrv.clear();
        self.rr.clear();
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
