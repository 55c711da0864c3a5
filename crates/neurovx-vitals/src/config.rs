//! Pipeline configuration.
//!
//! [`PipelineConfig`] collects every tunable constant of the rPPG
//! pipeline. The defaults describe a ~30 fps webcam stream and a 5 s
//! analysis window.
//!
//! ```rust
//! use neurovx_vitals::PipelineConfig;
//!
//! let cfg = PipelineConfig::default();
//! cfg.validate().expect("default config is valid");
//! assert_eq!(cfg.window_capacity, 150);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;

use crate::error::ConfigError;
use crate::roi::FOREHEAD_LANDMARKS;

/// Complete configuration for an [`RppgPipeline`](crate::RppgPipeline).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Number of colour samples held in the sliding window. Default: **150**.
    pub window_capacity: usize,

    /// Recompute estimates every this many samples once the window is
    /// full. Default: **10**.
    pub recompute_stride: usize,

    /// Cardiac pass band in Hz. Default: **0.7-4.0** (42-240 BPM).
    pub cardiac_band_hz: (f64, f64),

    /// Respiratory pass band in Hz. Default: **0.1-0.7** (6-42 breaths/min).
    pub respiratory_band_hz: (f64, f64),

    /// Butterworth order of each band edge. Must be even. Default: **2**.
    pub filter_order: usize,

    /// Number of accepted estimates averaged per metric. Default: **10**.
    pub smoothing_capacity: usize,

    /// Open interval of plausible heart rates (BPM). Default: **(40, 200)**.
    pub bpm_range: (f64, f64),

    /// Open interval of plausible respiratory rates. Default: **(5, 40)**.
    pub rr_range: (f64, f64),

    /// Landmark indices outlining the sampled skin region.
    /// Default: the nine-point forehead set.
    pub roi_landmarks: Vec<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_capacity: 150,
            recompute_stride: 10,
            cardiac_band_hz: (0.7, 4.0),
            respiratory_band_hz: (0.1, 0.7),
            filter_order: 2,
            smoothing_capacity: 10,
            bpm_range: (40.0, 200.0),
            rr_range: (5.0, 40.0),
            roi_landmarks: FOREHEAD_LANDMARKS.to_vec(),
        }
    }
}

impl PipelineConfig {
    /// Check that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity < 2 {
            return Err(ConfigError::invalid_value("window_capacity", "must be >= 2"));
        }
        if self.recompute_stride == 0 {
            return Err(ConfigError::invalid_value("recompute_stride", "must be >= 1"));
        }
        validate_band("cardiac_band_hz", self.cardiac_band_hz)?;
        validate_band("respiratory_band_hz", self.respiratory_band_hz)?;
        if self.respiratory_band_hz.1 > self.cardiac_band_hz.0 {
            return Err(ConfigError::invalid_value(
                "respiratory_band_hz",
                "must not overlap the cardiac band",
            ));
        }
        if self.filter_order == 0 || self.filter_order % 2 != 0 {
            return Err(ConfigError::invalid_value("filter_order", "must be even and >= 2"));
        }
        if self.smoothing_capacity == 0 {
            return Err(ConfigError::invalid_value("smoothing_capacity", "must be >= 1"));
        }
        validate_range("bpm_range", self.bpm_range)?;
        validate_range("rr_range", self.rr_range)?;
        if self.roi_landmarks.len() < 3 {
            return Err(ConfigError::invalid_value(
                "roi_landmarks",
                "at least 3 landmarks are needed to enclose a region",
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if the JSON is malformed, and
    /// [`ConfigError::InvalidValue`] if validation fails.
    #[cfg(feature = "serde")]
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: PipelineConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn validate_band(field: &'static str, (low, high): (f64, f64)) -> Result<(), ConfigError> {
    if !(low.is_finite() && high.is_finite()) || low <= 0.0 || high <= low {
        return Err(ConfigError::invalid_value(
            field,
            format!("expected 0 < low < high, got ({low}, {high})"),
        ));
    }
    Ok(())
}

fn validate_range(field: &'static str, (low, high): (f64, f64)) -> Result<(), ConfigError> {
    if !(low.is_finite() && high.is_finite()) || low < 0.0 || high <= low {
        return Err(ConfigError::invalid_value(
            field,
            format!("expected 0 <= low < high, got ({low}, {high})"),
        ));
    }
    Ok(())
}
