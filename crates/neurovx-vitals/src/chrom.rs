//! Chrominance-based (CHROM) pulse extraction.
//!
//! Each colour channel is divided by its temporal mean, which cancels the
//! illumination level. Two chrominance signals are then formed:
//!
//! ```text
//! X = 3·Rn − 2·Gn
//! Y = 1.5·Rn + Gn − 1.5·Bn
//! ```
//!
//! Both are band-passed to the cardiac band and combined as
//! `S = Xf − α·Yf` with `α = σ(Xf) / σ(Yf)`. Specular and motion
//! components appear in both X and Y with matched energy after the `α`
//! scaling and cancel; the blood-volume pulse does not.

use tracing::trace;

use crate::error::FilterError;
use crate::filter::BandpassFilter;

/// Below this a filtered chrominance signal is treated as flat.
const FLAT_STD: f64 = 1e-12;

/// CHROM pulse extractor for one pass band.
#[derive(Debug, Clone)]
pub struct ChromExtractor {
    band_hz: (f64, f64),
    order: usize,
}

impl ChromExtractor {
    /// Create an extractor band-limiting to `band_hz` with a
    /// Butterworth filter of the given per-edge order.
    #[must_use]
    pub fn new(band_hz: (f64, f64), order: usize) -> Self {
        Self { band_hz, order }
    }

    /// Pass band in Hz.
    #[must_use]
    pub fn band(&self) -> (f64, f64) {
        self.band_hz
    }

    /// Extract the pulse waveform from parallel channel sequences.
    ///
    /// Returns one value per input sample, or an empty vector when no
    /// estimate is possible this cycle: `sample_rate` is not positive,
    /// the channels differ in length or are too short for the filter,
    /// a channel mean is not positive, or the band cannot be realised
    /// at this sampling rate.
    #[must_use]
    pub fn extract(&self, r: &[f64], g: &[f64], b: &[f64], sample_rate: f64) -> Vec<f64> {
        match self.try_extract(r, g, b, sample_rate) {
            Ok(Some(pulse)) => pulse,
            Ok(None) => Vec::new(),
            Err(err) => {
                trace!(%err, fs = sample_rate, "CHROM extraction skipped");
                Vec::new()
            }
        }
    }

    fn try_extract(
        &self,
        r: &[f64],
        g: &[f64],
        b: &[f64],
        sample_rate: f64,
    ) -> Result<Option<Vec<f64>>, FilterError> {
        if !(sample_rate > 0.0) || r.len() != g.len() || r.len() != b.len() || r.is_empty() {
            return Ok(None);
        }

        let filter =
            BandpassFilter::design(self.band_hz.0, self.band_hz.1, sample_rate, self.order)?;
        if r.len() < filter.min_len() {
            return Err(FilterError::SignalTooShort {
                len: r.len(),
                required: filter.padding(),
            });
        }

        let (Some(rn), Some(gn), Some(bn)) = (normalise(r), normalise(g), normalise(b)) else {
            return Ok(None);
        };

        let x: Vec<f64> = rn.iter().zip(&gn).map(|(r, g)| 3.0 * r - 2.0 * g).collect();
        let y: Vec<f64> = rn
            .iter()
            .zip(&gn)
            .zip(&bn)
            .map(|((r, g), b)| 1.5 * r + g - 1.5 * b)
            .collect();

        let xf = filter.filtfilt(&x)?;
        let yf = filter.filtfilt(&y)?;

        let std_y = std_dev(&yf);
        let alpha = if std_y > FLAT_STD { std_dev(&xf) / std_y } else { 0.0 };

        Ok(Some(
            xf.iter().zip(&yf).map(|(x, y)| x - alpha * y).collect(),
        ))
    }
}

/// Divide a channel by its mean; `None` if the mean is not positive.
fn normalise(channel: &[f64]) -> Option<Vec<f64>> {
    let mean = mean(channel);
    if !(mean > 0.0) || !mean.is_finite() {
        return None;
    }
    Some(channel.iter().map(|v| v / mean).collect())
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Population standard deviation.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn std_dev(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let m = mean(x);
    (x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / x.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const FS: f64 = 30.0;

    /// Skin-like channels carrying a 1.2 Hz pulse mostly in green.
    fn pulsatile(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut r = Vec::with_capacity(n);
        let mut g = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for i in 0..n {
            let p = (2.0 * PI * 1.2 * i as f64 / FS).sin();
            r.push(150.0 + 0.3 * p);
            g.push(100.0 + 0.6 * p);
            b.push(80.0 + 0.1 * p);
        }
        (r, g, b)
    }

    #[test]
    fn output_matches_window_length() {
        let (r, g, b) = pulsatile(150);
        let s = ChromExtractor::new((0.7, 4.0), 2).extract(&r, &g, &b, FS);
        assert_eq!(s.len(), 150);
        assert!(s.iter().all(|v| v.is_finite()));
        assert!(std_dev(&s) > 0.0);
    }

    #[test]
    fn zero_sampling_rate_yields_empty() {
        let (r, g, b) = pulsatile(150);
        assert!(ChromExtractor::new((0.7, 4.0), 2).extract(&r, &g, &b, 0.0).is_empty());
    }

    #[test]
    fn short_window_yields_empty() {
        let (r, g, b) = pulsatile(10);
        assert!(ChromExtractor::new((0.7, 4.0), 2).extract(&r, &g, &b, FS).is_empty());
    }

    #[test]
    fn black_channel_yields_empty() {
        let (r, g, _) = pulsatile(150);
        let b = vec![0.0; 150];
        assert!(ChromExtractor::new((0.7, 4.0), 2).extract(&r, &g, &b, FS).is_empty());
    }

    #[test]
    fn mismatched_channels_yield_empty() {
        let (r, g, b) = pulsatile(150);
        assert!(ChromExtractor::new((0.7, 4.0), 2)
            .extract(&r, &g[..149], &b, FS)
            .is_empty());
    }

    #[test]
    fn illumination_level_is_cancelled() {
        let (r, g, b) = pulsatile(150);
        let scale = |x: &[f64]| x.iter().map(|v| v * 1.8).collect::<Vec<_>>();
        let chrom = ChromExtractor::new((0.7, 4.0), 2);
        let s1 = chrom.extract(&r, &g, &b, FS);
        let s2 = chrom.extract(&scale(&r), &scale(&g), &scale(&b), FS);
        for (a, b) in s1.iter().zip(&s2) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn std_dev_is_population() {
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
        assert!((std_dev(&[]) - 0.0).abs() < f64::EPSILON);
    }
}
