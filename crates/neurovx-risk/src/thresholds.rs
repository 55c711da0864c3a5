//! Rule thresholds of the domain assessors.
//!
//! All values are static, hand-set screening cut-offs; none are learned.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;

use crate::error::{Result, RiskError};
use crate::types::NO_HUMAN_DETECTED;

/// Thresholds used by [`RiskStratifier`](crate::RiskStratifier).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiskThresholds {
    /// Heart rate above this is `high` (tachycardia). Default: **100** BPM.
    pub bpm_high: f64,
    /// Heart rate below this is `medium` (bradycardia). Default: **50** BPM.
    pub bpm_low: f64,
    /// SDNN below this escalates the cardiovascular level. Default: **20** ms.
    pub hrv_low: f64,
    /// Respiratory rate above this is `high`. Default: **20** breaths/min.
    pub rr_high: f64,
    /// Respiratory rate below this is `medium`. Default: **10** breaths/min.
    pub rr_low: f64,
    /// Step symmetry below this flags asymmetry. Default: **80** %.
    pub gait_symmetry_low: f64,
    /// Balance stability below this flags instability. Default: **70** %.
    pub gait_balance_low: f64,
    /// Cadence below this flags slow gait. Default: **90** steps/min.
    pub gait_cadence_low: f64,
    /// Facial asymmetry above this is `medium`. Default: **0.15**.
    pub face_asymmetry_high: f64,
    /// Maximum phonation time below this is `medium`. Default: **3.0** s.
    pub voice_mpt_low: f64,
    /// Jitter above this escalates. Default: **1.0** %.
    pub voice_jitter_high: f64,
    /// Shimmer above this escalates. Default: **3.5** %.
    pub voice_shimmer_high: f64,
    /// HNR below this escalates. Default: **15** dB.
    pub voice_hnr_low: f64,
    /// "Low" rules only fire above this value, so near-zero readings
    /// are not mistaken for findings. Default: **0.1**.
    pub sentinel_floor: f64,
    /// Gait status meaning no subject was tracked.
    /// Default: **"No Human Detected"**.
    pub no_subject_status: String,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            bpm_high: 100.0,
            bpm_low: 50.0,
            hrv_low: 20.0,
            rr_high: 20.0,
            rr_low: 10.0,
            gait_symmetry_low: 80.0,
            gait_balance_low: 70.0,
            gait_cadence_low: 90.0,
            face_asymmetry_high: 0.15,
            voice_mpt_low: 3.0,
            voice_jitter_high: 1.0,
            voice_shimmer_high: 3.5,
            voice_hnr_low: 15.0,
            sentinel_floor: 0.1,
            no_subject_status: NO_HUMAN_DETECTED.to_string(),
        }
    }
}

impl RiskThresholds {
    /// Check that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidThreshold`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("bpm_high", self.bpm_high),
            ("bpm_low", self.bpm_low),
            ("hrv_low", self.hrv_low),
            ("rr_high", self.rr_high),
            ("rr_low", self.rr_low),
            ("gait_symmetry_low", self.gait_symmetry_low),
            ("gait_balance_low", self.gait_balance_low),
            ("gait_cadence_low", self.gait_cadence_low),
            ("face_asymmetry_high", self.face_asymmetry_high),
            ("voice_mpt_low", self.voice_mpt_low),
            ("voice_jitter_high", self.voice_jitter_high),
            ("voice_shimmer_high", self.voice_shimmer_high),
            ("voice_hnr_low", self.voice_hnr_low),
            ("sentinel_floor", self.sentinel_floor),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(RiskError::invalid_threshold(
                    field,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        if self.bpm_low >= self.bpm_high {
            return Err(RiskError::invalid_threshold("bpm_low", "must be below bpm_high"));
        }
        if self.rr_low >= self.rr_high {
            return Err(RiskError::invalid_threshold("rr_low", "must be below rr_high"));
        }
        if self.no_subject_status.is_empty() {
            return Err(RiskError::invalid_threshold("no_subject_status", "must not be empty"));
        }
        Ok(())
    }

    /// Load thresholds from a JSON file and validate them.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::FileRead`], [`RiskError::ParseError`] or
    /// [`RiskError::InvalidThreshold`].
    #[cfg(feature = "serde")]
    pub fn from_json(path: &Path) -> Result<Self> {
        let thresholds: RiskThresholds = crate::error::read_json(path)?;
        thresholds.validate()?;
        Ok(thresholds)
    }
}
