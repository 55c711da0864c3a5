//! Camera-based vital sign extraction (remote photoplethysmography).
//!
//! Estimates heart rate, heart rate variability and respiratory rate from
//! the colour of a patch of facial skin across video frames.
//!
//! # Architecture
//!
//! Each frame flows through:
//!
//! 1. **ROI sampling** ([`RoiSampler`]): mean colour inside the convex hull
//!    of nine forehead landmarks.
//! 2. **Sliding window** ([`SignalWindow`]): the last 150 samples with
//!    timestamps; a recompute is requested when the window fills and
//!    every 10 samples after that.
//! 3. **Pulse extraction** ([`ChromExtractor`]): CHROM chrominance
//!    combination, band-limited with a zero-phase Butterworth
//!    [`BandpassFilter`].
//! 4. **Rate estimation** ([`CardiacEstimator`], [`RespiratoryEstimator`]):
//!    prominent peaks outside the filter settling margin, timed to
//!    sub-sample precision, and their intervals.
//! 5. **Smoothing** ([`TemporalSmoother`]): plausibility filter plus a
//!    10-deep moving average per metric.
//!
//! [`RppgPipeline`] wires the stages together for one subject.
//!
//! # Example
//!
//! ```
//! use neurovx_vitals::{ColorSample, PipelineConfig, RppgPipeline};
//!
//! let mut pipeline = RppgPipeline::new(PipelineConfig::default()).unwrap();
//! for i in 0..300 {
//!     let t = f64::from(i) / 30.0;
//!     let pulse = (2.0 * std::f64::consts::PI * 1.2 * t).sin();
//!     let sample = ColorSample::new(150.0 + 0.4 * pulse, 100.0 + 0.8 * pulse, 80.0, t);
//!     pipeline.push_sample(sample);
//! }
//! let vitals = pipeline.vitals();
//! assert!((vitals.bpm - 72.0).abs() < 5.0);
//! ```

pub mod breathing;
pub mod chrom;
pub mod config;
pub mod error;
pub mod filter;
pub mod heartrate;
pub mod peaks;
pub mod pipeline;
pub mod roi;
pub mod smoother;
pub mod types;
pub mod window;

pub use breathing::RespiratoryEstimator;
pub use chrom::ChromExtractor;
pub use config::PipelineConfig;
pub use error::{ConfigError, FilterError, Result, VitalsError};
pub use filter::BandpassFilter;
pub use heartrate::{CardiacEstimate, CardiacEstimator};
pub use peaks::{
    find_peaks, find_settled_peaks, min_peak_distance, prominence, refine_peak, IntervalStats,
    MIN_RELATIVE_PROMINENCE,
};
pub use pipeline::{FrameOutcome, RppgPipeline};
pub use roi::{LandmarkProvider, RoiMeasurement, RoiSampler, StaticLandmarks, FOREHEAD_LANDMARKS};
pub use smoother::{MetricHistory, TemporalSmoother};
pub use types::{ChannelOrder, ColorSample, FaceLandmarks, Landmark, PixelPoint, VitalMetrics};
pub use window::{estimate_sampling_rate, SignalWindow};
