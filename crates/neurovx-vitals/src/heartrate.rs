//! Heart rate and HRV estimation from the CHROM pulse waveform.
//!
//! The pulse is band-passed to the cardiac band once more, and local
//! maxima at least one fastest-beat period apart are taken as beats.
//! Beats inside the filter's settling margin at either end of the window,
//! or too shallow to be more than ripple, are discarded. The remaining
//! beat times are refined to sub-sample precision, and their intervals
//! give the rate (`60 / mean(IBI)`) and SDNN.

use tracing::trace;

use crate::error::FilterError;
use crate::filter::BandpassFilter;
use crate::peaks::{find_settled_peaks, min_peak_distance, IntervalStats};

/// Outcome of one cardiac estimate. Zero fields mean "no estimate".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardiacEstimate {
    /// Heart rate in beats per minute.
    pub bpm: f64,
    /// SDNN of the inter-beat intervals in milliseconds.
    pub hrv_sdnn: f64,
    /// Sample indices of the detected beats.
    pub peaks: Vec<usize>,
}

/// Cardiac-band heart rate estimator.
#[derive(Debug, Clone)]
pub struct CardiacEstimator {
    band_hz: (f64, f64),
    order: usize,
}

impl CardiacEstimator {
    /// Create an estimator for the given cardiac band and filter order.
    #[must_use]
    pub fn new(band_hz: (f64, f64), order: usize) -> Self {
        Self { band_hz, order }
    }

    /// Band-pass a pulse waveform to the cardiac band.
    ///
    /// # Errors
    ///
    /// Propagates filter design and length errors.
    pub fn filter(&self, pulse: &[f64], sample_rate: f64) -> Result<Vec<f64>, FilterError> {
        self.design(sample_rate)?.filtfilt(pulse)
    }

    fn design(&self, sample_rate: f64) -> Result<BandpassFilter, FilterError> {
        BandpassFilter::design(self.band_hz.0, self.band_hz.1, sample_rate, self.order)
    }

    /// Detect beats in a waveform produced by [`Self::filter`].
    #[must_use]
    pub fn estimate(&self, filtered: &[f64], sample_rate: f64) -> CardiacEstimate {
        let guard = match self.design(sample_rate) {
            Ok(filter) => filter.settling_len(),
            Err(err) => {
                trace!(%err, fs = sample_rate, "cardiac band unavailable");
                return CardiacEstimate::default();
            }
        };
        let distance = min_peak_distance(sample_rate, self.band_hz.1);
        let peaks = find_settled_peaks(filtered, distance, guard);
        match IntervalStats::from_refined_peaks(filtered, &peaks, sample_rate) {
            Some(stats) => CardiacEstimate {
                bpm: stats.rate_per_min,
                hrv_sdnn: stats.sdnn_ms,
                peaks,
            },
            None => {
                trace!(peaks = peaks.len(), "too few beats for a heart rate");
                CardiacEstimate {
                    peaks,
                    ..CardiacEstimate::default()
                }
            }
        }
    }
}
