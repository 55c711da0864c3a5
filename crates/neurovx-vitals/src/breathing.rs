//! Respiratory rate estimation.
//!
//! Breathing modulates skin perfusion and the angle of the face to the
//! light, which shows up as a slow variation of the green channel. The
//! mean-normalised green channel is band-passed to the respiratory band
//! and the same peak-interval technique as the cardiac path gives
//! breaths per minute. Because the lower band edge is slow, the settling
//! margin at each end of the window is long: a window must span a few
//! breaths before any estimate is reported.

use tracing::trace;

use crate::chrom::mean;
use crate::error::FilterError;
use crate::filter::BandpassFilter;
use crate::peaks::{find_settled_peaks, min_peak_distance, IntervalStats};

/// Respiratory-band breathing rate estimator.
#[derive(Debug, Clone)]
pub struct RespiratoryEstimator {
    band_hz: (f64, f64),
    order: usize,
}

impl RespiratoryEstimator {
    /// Create an estimator for the given respiratory band and filter order.
    #[must_use]
    pub fn new(band_hz: (f64, f64), order: usize) -> Self {
        Self { band_hz, order }
    }

    /// Respiratory waveform of a green-channel window.
    ///
    /// # Errors
    ///
    /// Propagates filter design and length errors. A channel with a
    /// non-positive mean yields an all-zero waveform.
    pub fn respiratory_signal(
        &self,
        green: &[f64],
        sample_rate: f64,
    ) -> Result<Vec<f64>, FilterError> {
        let filter = self.design(sample_rate)?;
        Self::filter_green(&filter, green)
    }

    /// Breaths per minute for a green-channel window; `0.0` when no
    /// estimate is possible.
    #[must_use]
    pub fn estimate(&self, green: &[f64], sample_rate: f64) -> f64 {
        let filtered = self.design(sample_rate).and_then(|filter| {
            let guard = filter.settling_len();
            Self::filter_green(&filter, green).map(|signal| (signal, guard))
        });
        let (signal, guard) = match filtered {
            Ok(s) => s,
            Err(err) => {
                trace!(%err, fs = sample_rate, "respiratory filter skipped");
                return 0.0;
            }
        };
        let distance = min_peak_distance(sample_rate, self.band_hz.1);
        let peaks = find_settled_peaks(&signal, distance, guard);
        IntervalStats::from_refined_peaks(&signal, &peaks, sample_rate)
            .map_or(0.0, |s| s.rate_per_min)
    }

    fn design(&self, sample_rate: f64) -> Result<BandpassFilter, FilterError> {
        BandpassFilter::design(self.band_hz.0, self.band_hz.1, sample_rate, self.order)
    }

    fn filter_green(filter: &BandpassFilter, green: &[f64]) -> Result<Vec<f64>, FilterError> {
        let m = mean(green);
        if !(m > 0.0) {
            return filter.filtfilt(&vec![0.0; green.len()]);
        }
        let normalised: Vec<f64> = green.iter().map(|g| g / m - 1.0).collect();
        filter.filtfilt(&normalised)
    }
}
