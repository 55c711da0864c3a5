//! Zero-phase Butterworth band-pass filtering.
//!
//! The band-pass is a cascade of second-order sections: `order / 2`
//! high-pass biquads at the lower cut-off followed by `order / 2`
//! low-pass biquads at the upper cut-off, each with the Butterworth pole
//! quality factor for its pair. [`BandpassFilter::filtfilt`] runs the
//! cascade forward and then backward over an odd-reflected, mean-removed
//! copy of the signal, so the output has no phase lag and peak positions
//! are preserved.

use std::f64::consts::PI;

use crate::error::FilterError;

/// Direct-form I biquad state.
#[derive(Clone, Debug, Default)]
struct IirState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

/// Normalised second-order section (`a0 == 1`).
#[derive(Clone, Debug, PartialEq)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    fn lowpass(cutoff_hz: f64, sample_rate: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn highpass(cutoff_hz: f64, sample_rate: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos_w0) / 2.0 / a0,
            b1: -(1.0 + cos_w0) / a0,
            b2: (1.0 + cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Filter `signal` in place, starting from rest.
    fn run(&self, signal: &mut [f64]) {
        let mut state = IirState::default();
        for x in signal.iter_mut() {
            let input = *x;
            let output = self.b0 * input + self.b1 * state.x1 + self.b2 * state.x2
                - self.a1 * state.y1
                - self.a2 * state.y2;
            state.x2 = state.x1;
            state.x1 = input;
            state.y2 = state.y1;
            state.y1 = output;
            *x = output;
        }
    }
}

/// Quality factors of the Butterworth pole pairs for an even `order`.
#[allow(clippy::cast_precision_loss)]
fn butterworth_q(order: usize) -> Vec<f64> {
    (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
            1.0 / (2.0 * theta.sin())
        })
        .collect()
}

/// Band-pass filter designed for one sampling rate.
#[derive(Clone, Debug)]
pub struct BandpassFilter {
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
    order: usize,
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    /// Design a Butterworth band-pass of the given per-edge `order`.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnsupportedOrder`] for odd or zero orders and
    /// [`FilterError::InvalidBand`] unless `0 < low < high < sample_rate / 2`.
    pub fn design(
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
        order: usize,
    ) -> Result<Self, FilterError> {
        if order == 0 || order % 2 != 0 {
            return Err(FilterError::UnsupportedOrder(order));
        }
        let finite = low_hz.is_finite() && high_hz.is_finite() && sample_rate.is_finite();
        if !finite || low_hz <= 0.0 || high_hz <= low_hz || high_hz >= sample_rate / 2.0 {
            return Err(FilterError::InvalidBand {
                low_hz,
                high_hz,
                sample_rate,
            });
        }

        let qs = butterworth_q(order);
        let mut sections = Vec::with_capacity(order);
        sections.extend(qs.iter().map(|&q| Biquad::highpass(low_hz, sample_rate, q)));
        sections.extend(qs.iter().map(|&q| Biquad::lowpass(high_hz, sample_rate, q)));

        Ok(Self {
            low_hz,
            high_hz,
            sample_rate,
            order,
            sections,
        })
    }

    /// Pass band `(low, high)` in Hz.
    #[must_use]
    pub fn band(&self) -> (f64, f64) {
        (self.low_hz, self.high_hz)
    }

    /// Sampling rate the filter was designed for.
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Per-edge Butterworth order.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Reflection padding applied at each end by [`Self::filtfilt`].
    ///
    /// A signal must be strictly longer than this to be filtered.
    #[must_use]
    pub fn padding(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Samples at each end of a [`Self::filtfilt`] output still shaped by
    /// the start-up transient: the reflection padding or half a period of
    /// the lower cut-off, whichever is longer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn settling_len(&self) -> usize {
        let half_period = (self.sample_rate / (2.0 * self.low_hz)).ceil() as usize;
        self.padding().max(half_period)
    }

    /// Minimum number of samples [`Self::filtfilt`] accepts.
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.padding() + 1
    }

    /// Zero-phase (forward-backward) filtering of `signal`.
    ///
    /// The mean is removed first; the band-pass rejects DC anyway and
    /// starting near zero keeps the start-up transient small.
    ///
    /// # Errors
    ///
    /// [`FilterError::SignalTooShort`] if `signal.len() <= self.padding()`.
    pub fn filtfilt(&self, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
        let n = signal.len();
        let pad = self.padding();
        if n <= pad {
            return Err(FilterError::SignalTooShort { len: n, required: pad });
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = signal.iter().sum::<f64>() / n as f64;
        let centred: Vec<f64> = signal.iter().map(|x| x - mean).collect();

        let mut ext = odd_extend(&centred, pad);
        for section in &self.sections {
            section.run(&mut ext);
        }
        ext.reverse();
        for section in &self.sections {
            section.run(&mut ext);
        }
        ext.reverse();

        Ok(ext[pad..pad + n].to_vec())
    }
}

/// Odd (point-symmetric) reflection of `x` by `pad` samples at each end.
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn rms(x: &[f64]) -> f64 {
        (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
    }

    #[test]
    fn butterworth_q_values() {
        let q2 = butterworth_q(2);
        assert_eq!(q2.len(), 1);
        assert!((q2[0] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);

        let q4 = butterworth_q(4);
        assert!((q4[0] - 1.306_562_964_876_376_6).abs() < 1e-9);
        assert!((q4[1] - 0.541_196_100_146_197).abs() < 1e-9);
    }

    #[test]
    fn passband_sine_survives() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        let x = sine(1.5, 30.0, 600);
        let y = f.filtfilt(&x).unwrap();
        assert_eq!(y.len(), x.len());
        let ratio = rms(&y[100..500]) / rms(&x[100..500]);
        assert!(ratio > 0.8, "passband gain too low: {ratio}");
        assert!(ratio < 1.05, "passband gain too high: {ratio}");
    }

    #[test]
    fn low_frequency_rejected() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        let x = sine(0.1, 30.0, 1800);
        let y = f.filtfilt(&x).unwrap();
        let ratio = rms(&y[300..1500]) / rms(&x[300..1500]);
        assert!(ratio < 0.1, "respiratory band leaked into cardiac band: {ratio}");
    }

    #[test]
    fn high_frequency_rejected() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        let x = sine(10.0, 30.0, 600);
        let y = f.filtfilt(&x).unwrap();
        let ratio = rms(&y[100..500]) / rms(&x[100..500]);
        assert!(ratio < 0.1, "high frequency leaked: {ratio}");
    }

    #[test]
    fn zero_phase_keeps_peak_positions() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        // cos peaks at multiples of 25 samples for 1.2 Hz at 30 Hz.
        let x: Vec<f64> = (0..600)
            .map(|i| (2.0 * PI * 1.2 * i as f64 / 30.0).cos())
            .collect();
        let y = f.filtfilt(&x).unwrap();
        let window = &y[295..306];
        let (argmax, _) = window
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert_eq!(295 + argmax, 300);
    }

    #[test]
    fn constant_signal_filters_to_zero() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 4).unwrap();
        let y = f.filtfilt(&vec![128.0; 200]).unwrap();
        assert!(y.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn odd_order_rejected() {
        assert_eq!(
            BandpassFilter::design(0.7, 4.0, 30.0, 3).unwrap_err(),
            FilterError::UnsupportedOrder(3)
        );
    }

    #[test]
    fn band_above_nyquist_rejected() {
        let err = BandpassFilter::design(0.7, 4.0, 6.0, 2).unwrap_err();
        assert!(matches!(err, FilterError::InvalidBand { .. }));
    }

    #[test]
    fn inverted_band_rejected() {
        assert!(BandpassFilter::design(4.0, 0.7, 30.0, 2).is_err());
        assert!(BandpassFilter::design(0.0, 4.0, 30.0, 2).is_err());
    }

    #[test]
    fn short_signal_rejected() {
        let f = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        assert_eq!(f.padding(), 15);
        assert_eq!(f.min_len(), 16);
        let err = f.filtfilt(&[0.0; 15]).unwrap_err();
        assert_eq!(err, FilterError::SignalTooShort { len: 15, required: 15 });
        assert!(f.filtfilt(&[0.0; 16]).is_ok());
    }

    #[test]
    fn odd_extension_is_point_symmetric() {
        let ext = odd_extend(&[1.0, 2.0, 4.0], 2);
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 6.0, 7.0]);
    }

    #[test]
    fn settling_covers_half_a_low_cutoff_period() {
        let cardiac = BandpassFilter::design(0.7, 4.0, 30.0, 2).unwrap();
        assert_eq!(cardiac.settling_len(), 22);
        let respiratory = BandpassFilter::design(0.1, 0.7, 30.0, 2).unwrap();
        assert_eq!(respiratory.settling_len(), 150);
        let wide = BandpassFilter::design(3.0, 10.0, 30.0, 4).unwrap();
        assert_eq!(wide.settling_len(), wide.padding());
    }
}
