//! Risk levels, domains, reason codes and per-domain metric inputs.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use neurovx_vitals::VitalMetrics;

/// Gait status reported when no walking subject was tracked.
pub const NO_HUMAN_DETECTED: &str = "No Human Detected";

/// Discrete risk level of one domain.
///
/// `Low < Medium < High`; `Uncertain` means the domain could not be
/// assessed and is not comparable with the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskLevel {
    /// No finding.
    Low,
    /// One or more moderate findings.
    Medium,
    /// Severe or compounded findings.
    High,
    /// Inputs missing; the domain was not assessed.
    Uncertain,
}

impl RiskLevel {
    fn rank(self) -> Option<u8> {
        match self {
            RiskLevel::Low => Some(0),
            RiskLevel::Medium => Some(1),
            RiskLevel::High => Some(2),
            RiskLevel::Uncertain => None,
        }
    }

    /// Raise the level by exactly one step, saturating at `High`.
    ///
    /// `Uncertain` stays `Uncertain`.
    #[must_use]
    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
            RiskLevel::Uncertain => RiskLevel::Uncertain,
        }
    }

    /// Contribution to the overall confidence score.
    #[must_use]
    pub fn confidence_points(self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 0.5,
            RiskLevel::High | RiskLevel::Uncertain => 0.0,
        }
    }

    /// Whether the domain was actually assessed.
    #[must_use]
    pub fn is_assessed(self) -> bool {
        self != RiskLevel::Uncertain
    }

    /// Lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Uncertain => "uncertain",
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => Some(std::cmp::Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five assessed domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Domain {
    /// Heart rate and HRV.
    #[cfg_attr(feature = "serde", serde(rename = "cardiovascular_risk"))]
    Cardiovascular,
    /// Breathing rate.
    #[cfg_attr(feature = "serde", serde(rename = "respiratory_risk"))]
    Respiratory,
    /// Walking pattern.
    #[cfg_attr(feature = "serde", serde(rename = "neuro_motor_gait_risk"))]
    Gait,
    /// Facial symmetry.
    #[cfg_attr(feature = "serde", serde(rename = "neuro_motor_face_risk"))]
    Face,
    /// Voice quality.
    #[cfg_attr(feature = "serde", serde(rename = "speech_pathology_risk"))]
    Voice,
}

impl Domain {
    /// All domains in reporting order.
    pub const ALL: [Domain; 5] = [
        Domain::Cardiovascular,
        Domain::Respiratory,
        Domain::Gait,
        Domain::Face,
        Domain::Voice,
    ];

    /// Key used in serialised assessments.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Domain::Cardiovascular => "cardiovascular_risk",
            Domain::Respiratory => "respiratory_risk",
            Domain::Gait => "neuro_motor_gait_risk",
            Domain::Face => "neuro_motor_face_risk",
            Domain::Voice => "speech_pathology_risk",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Domain::Cardiovascular => "Cardiovascular",
            Domain::Respiratory => "Respiratory",
            Domain::Gait => "Neuro-motor (gait)",
            Domain::Face => "Neuro-motor (face)",
            Domain::Voice => "Speech pathology",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a domain was scored the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReasonCode {
    /// Heart rate or HRV not available.
    InsufficientCardioData,
    /// Heart rate above the tachycardia threshold.
    HighBpm,
    /// Heart rate below the bradycardia threshold.
    LowBpm,
    /// HRV (SDNN) below threshold.
    LowHrv,
    /// Respiratory rate not available.
    InsufficientRespData,
    /// Respiratory rate above the tachypnoea threshold.
    HighRr,
    /// Respiratory rate below the bradypnoea threshold.
    LowRr,
    /// No subject tracked or a gait metric missing.
    InsufficientGaitData,
    /// Step symmetry below threshold.
    GaitAsymmetry,
    /// Balance stability below threshold.
    GaitInstability,
    /// Cadence below threshold.
    LowCadence,
    /// Facial asymmetry score not available.
    NoFaceAsymmetryData,
    /// Facial asymmetry above threshold.
    HighFaceAsymmetry,
    /// Maximum phonation time not measured.
    MptUnavailable,
    /// Jitter, shimmer or HNR not measured.
    VoiceMetricsBlocked,
    /// Maximum phonation time below threshold.
    LowMpt,
    /// Jitter above threshold.
    HighJitter,
    /// Shimmer above threshold.
    HighShimmer,
    /// Harmonics-to-noise ratio below threshold.
    LowHnr,
}

impl ReasonCode {
    /// `snake_case` code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::InsufficientCardioData => "insufficient_cardio_data",
            ReasonCode::HighBpm => "high_bpm",
            ReasonCode::LowBpm => "low_bpm",
            ReasonCode::LowHrv => "low_hrv",
            ReasonCode::InsufficientRespData => "insufficient_resp_data",
            ReasonCode::HighRr => "high_rr",
            ReasonCode::LowRr => "low_rr",
            ReasonCode::InsufficientGaitData => "insufficient_gait_data",
            ReasonCode::GaitAsymmetry => "gait_asymmetry",
            ReasonCode::GaitInstability => "gait_instability",
            ReasonCode::LowCadence => "low_cadence",
            ReasonCode::NoFaceAsymmetryData => "no_face_asymmetry_data",
            ReasonCode::HighFaceAsymmetry => "high_face_asymmetry",
            ReasonCode::MptUnavailable => "mpt_unavailable",
            ReasonCode::VoiceMetricsBlocked => "voice_metrics_blocked",
            ReasonCode::LowMpt => "low_mpt",
            ReasonCode::HighJitter => "high_jitter",
            ReasonCode::HighShimmer => "high_shimmer",
            ReasonCode::LowHnr => "low_hnr",
        }
    }

    /// Whether this code marks missing input rather than a finding.
    #[must_use]
    pub fn is_missing_data(self) -> bool {
        matches!(
            self,
            ReasonCode::InsufficientCardioData
                | ReasonCode::InsufficientRespData
                | ReasonCode::InsufficientGaitData
                | ReasonCode::NoFaceAsymmetryData
                | ReasonCode::MptUnavailable
                | ReasonCode::VoiceMetricsBlocked
        )
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera vital signs. `0.0` means "not available".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RppgMetrics {
    /// Heart rate in beats per minute.
    pub bpm: f64,
    /// HRV (SDNN) in milliseconds.
    pub hrv_sdnn: f64,
    /// Respiratory rate in breaths per minute.
    pub rr: f64,
}

impl From<VitalMetrics> for RppgMetrics {
    fn from(v: VitalMetrics) -> Self {
        Self {
            bpm: v.bpm,
            hrv_sdnn: v.hrv_sdnn,
            rr: v.rr,
        }
    }
}

/// Gait analysis output. Zero metrics mean "not available".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaitMetrics {
    /// Tracker status, e.g. `"Tracking"` or `"No Human Detected"`.
    pub status: String,
    /// Steps per minute.
    pub cadence: f64,
    /// Left/right step symmetry in percent.
    pub symmetry: f64,
    /// Mean stride length in metres. Informational.
    #[cfg_attr(feature = "serde", serde(alias = "avgStrideLength"))]
    pub avg_stride_length: f64,
    /// Balance stability in percent.
    #[cfg_attr(feature = "serde", serde(alias = "balanceStability"))]
    pub balance_stability: f64,
}

impl Default for GaitMetrics {
    fn default() -> Self {
        Self {
            status: NO_HUMAN_DETECTED.to_string(),
            cadence: 0.0,
            symmetry: 0.0,
            avg_stride_length: 0.0,
            balance_stability: 0.0,
        }
    }
}

/// Facial asymmetry analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaceMetrics {
    /// Asymmetry score; `0.0` means "not available".
    #[cfg_attr(feature = "serde", serde(alias = "asymmetryScore"))]
    pub asymmetry_score: f64,
    /// Eye openness ratio. Informational.
    #[cfg_attr(feature = "serde", serde(alias = "eyeOpenness"))]
    pub eye_openness: f64,
}

/// Acoustic voice analysis output. Absent values are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoiceMetrics {
    /// Maximum phonation time in seconds.
    #[cfg_attr(feature = "serde", serde(alias = "mptSeconds"))]
    pub mpt_seconds: Option<f64>,
    /// Cycle-to-cycle frequency perturbation in percent.
    #[cfg_attr(feature = "serde", serde(alias = "jitterPercent"))]
    pub jitter_percent: Option<f64>,
    /// Cycle-to-cycle amplitude perturbation in percent.
    #[cfg_attr(feature = "serde", serde(alias = "shimmerPercent"))]
    pub shimmer_percent: Option<f64>,
    /// Harmonics-to-noise ratio in dB.
    #[cfg_attr(feature = "serde", serde(alias = "hnrDb"))]
    pub hnr_db: Option<f64>,
}

/// Level and reasons for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainAssessment {
    /// Resulting level.
    pub level: RiskLevel,
    /// Reason codes in the order the rules fired.
    pub reasons: Vec<ReasonCode>,
}

impl DomainAssessment {
    /// Assessment that could not be made.
    #[must_use]
    pub fn uncertain(reasons: Vec<ReasonCode>) -> Self {
        Self {
            level: RiskLevel::Uncertain,
            reasons,
        }
    }

    /// Low-risk starting point for rule evaluation.
    #[must_use]
    pub fn low() -> Self {
        Self {
            level: RiskLevel::Low,
            reasons: Vec::new(),
        }
    }

    /// Set `level` and record `reason`.
    pub(crate) fn raise_to(&mut self, level: RiskLevel, reason: ReasonCode) {
        self.level = level;
        self.reasons.push(reason);
    }

    /// Escalate one step and record `reason`.
    pub(crate) fn escalate(&mut self, reason: ReasonCode) {
        self.level = self.level.escalate();
        self.reasons.push(reason);
    }
}
