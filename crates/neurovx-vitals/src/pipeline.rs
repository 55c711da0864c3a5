//! Frame-by-frame rPPG pipeline.
//!
//! One [`RppgPipeline`] tracks one subject. Every frame is reduced to a
//! mean skin colour and appended to the sliding window; once the window
//! is full, estimates are recomputed every `recompute_stride` frames:
//!
//! 1. sampling rate from the window timestamps,
//! 2. CHROM pulse from the three channels,
//! 3. cardiac band-pass and beat detection (BPM, SDNN),
//! 4. respiratory rate from the green channel,
//! 5. plausibility filtering and moving-average smoothing.
//!
//! Nothing on this path returns an error: a frame without a face, a
//! degenerate region, a zero sampling rate or too few peaks all mean "no
//! new estimate this cycle" and the previously exposed values stay.

use image::RgbImage;
use tracing::{debug, trace};

use crate::breathing::RespiratoryEstimator;
use crate::chrom::ChromExtractor;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::heartrate::CardiacEstimator;
use crate::roi::{LandmarkProvider, RoiSampler};
use crate::smoother::TemporalSmoother;
use crate::types::{ChannelOrder, ColorSample, FaceLandmarks, PixelPoint, VitalMetrics};
use crate::window::SignalWindow;

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Smoothed metrics after this frame.
    pub vitals: VitalMetrics,
    /// Whether a colour sample was appended to the window.
    pub sampled: bool,
    /// Whether estimates were successfully recomputed on this frame.
    pub recomputed: bool,
}

/// Single-subject rPPG pipeline.
#[derive(Debug, Clone)]
pub struct RppgPipeline {
    config: PipelineConfig,
    sampler: RoiSampler,
    window: SignalWindow,
    chrom: ChromExtractor,
    cardiac: CardiacEstimator,
    respiratory: RespiratoryEstimator,
    smoother: TemporalSmoother,
    roi_polygon: Vec<PixelPoint>,
    raw_pulse: Vec<f64>,
    filtered_pulse: Vec<f64>,
    recomputes: u64,
}

impl RppgPipeline {
    /// Build a pipeline from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Config`](crate::VitalsError::Config) if the
    /// configuration does not validate.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Pipeline with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::build(PipelineConfig::default())
    }

    fn build(config: PipelineConfig) -> Self {
        Self {
            sampler: RoiSampler::new(config.roi_landmarks.clone()),
            window: SignalWindow::new(config.window_capacity, config.recompute_stride),
            chrom: ChromExtractor::new(config.cardiac_band_hz, config.filter_order),
            cardiac: CardiacEstimator::new(config.cardiac_band_hz, config.filter_order),
            respiratory: RespiratoryEstimator::new(config.respiratory_band_hz, config.filter_order),
            smoother: TemporalSmoother::from_config(&config),
            roi_polygon: Vec::new(),
            raw_pulse: Vec::new(),
            filtered_pulse: Vec::new(),
            recomputes: 0,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one video frame.
    ///
    /// `face` is the landmark set detected on this frame, if any. Without
    /// a face, or when the landmarks do not enclose any pixel, nothing is
    /// appended and the previous state is returned unchanged.
    pub fn process_frame(
        &mut self,
        frame: &RgbImage,
        order: ChannelOrder,
        face: Option<&FaceLandmarks>,
        timestamp: f64,
    ) -> FrameOutcome {
        let Some(face) = face else {
            trace!(timestamp, "no face in frame");
            return self.idle();
        };
        let Some(measurement) = self.sampler.sample(frame, order, face) else {
            trace!(timestamp, "degenerate ROI, frame skipped");
            return self.idle();
        };

        let [r, g, b] = measurement.rgb;
        self.roi_polygon = measurement.polygon;
        self.push_sample(ColorSample::new(r, g, b, timestamp))
    }

    /// Detect landmarks with `provider`, then process the frame.
    pub fn process_with<P: LandmarkProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        frame: &RgbImage,
        order: ChannelOrder,
        timestamp: f64,
    ) -> FrameOutcome {
        let face = provider.detect(frame);
        self.process_frame(frame, order, face.as_ref(), timestamp)
    }

    /// Append an already measured colour sample.
    ///
    /// Non-finite samples are dropped.
    pub fn push_sample(&mut self, sample: ColorSample) -> FrameOutcome {
        if !sample.is_finite() {
            trace!(timestamp = sample.timestamp, "non-finite sample dropped");
            return self.idle();
        }

        let due = self.window.push(sample);
        let recomputed = due && self.recompute();
        FrameOutcome {
            vitals: self.smoother.current(),
            sampled: true,
            recomputed,
        }
    }

    /// Run one estimate cycle over the current window.
    ///
    /// Returns `false` and leaves every exposed value untouched when no
    /// estimate is possible.
    fn recompute(&mut self) -> bool {
        let fs = self.window.sampling_rate();
        if fs <= 0.0 {
            debug!(samples = self.window.len(), "sampling rate unavailable, recompute skipped");
            return false;
        }

        let (r, g, b) = self.window.channels();
        let raw = self.chrom.extract(&r, &g, &b, fs);
        if raw.is_empty() {
            debug!(fs, "no CHROM pulse this cycle");
            return false;
        }

        let filtered = match self.cardiac.filter(&raw, fs) {
            Ok(f) => f,
            Err(err) => {
                debug!(%err, fs, "cardiac filter failed");
                return false;
            }
        };

        let cardiac = self.cardiac.estimate(&filtered, fs);
        let rr = self.respiratory.estimate(&g, fs);
        let vitals = self.smoother.update(VitalMetrics {
            bpm: cardiac.bpm,
            hrv_sdnn: cardiac.hrv_sdnn,
            rr,
        });

        self.raw_pulse = raw;
        self.filtered_pulse = filtered;
        self.recomputes += 1;

        debug!(
            fs,
            raw_bpm = cardiac.bpm,
            raw_hrv = cardiac.hrv_sdnn,
            raw_rr = rr,
            bpm = vitals.bpm,
            hrv = vitals.hrv_sdnn,
            rr_smoothed = vitals.rr,
            "vitals recomputed"
        );
        true
    }

    fn idle(&self) -> FrameOutcome {
        FrameOutcome {
            vitals: self.smoother.current(),
            sampled: false,
            recomputed: false,
        }
    }

    /// Current smoothed metrics.
    #[must_use]
    pub fn vitals(&self) -> VitalMetrics {
        self.smoother.current()
    }

    /// ROI polygon of the most recently sampled frame.
    #[must_use]
    pub fn roi_polygon(&self) -> &[PixelPoint] {
        &self.roi_polygon
    }

    /// Timestamps of the samples in the window, oldest first.
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        self.window.timestamps()
    }

    /// CHROM pulse of the last successful recompute.
    #[must_use]
    pub fn raw_pulse(&self) -> &[f64] {
        &self.raw_pulse
    }

    /// Cardiac-filtered pulse of the last successful recompute.
    #[must_use]
    pub fn filtered_pulse(&self) -> &[f64] {
        &self.filtered_pulse
    }

    /// The sliding window.
    #[must_use]
    pub fn window(&self) -> &SignalWindow {
        &self.window
    }

    /// Number of successful recomputes since creation or reset.
    #[must_use]
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Drop all buffered samples, histories and waveforms.
    pub fn reset(&mut self) {
        self.window.clear();
        self.smoother.clear();
        self.roi_polygon.clear();
        self.raw_pulse.clear();
        self.filtered_pulse.clear();
        self.recomputes = 0;
    }
}

impl Default for RppgPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
