//! Multi-domain risk stratification.
//!
//! The stratifier runs the five domain assessors and merges them into a
//! [`RiskAssessment`]. Confidence is the sum of per-domain points
//! (`low` 1, `medium` 0.5, `high`/`uncertain` 0) over a fixed
//! denominator of 5, rounded to two decimals.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;
use tracing::debug;

use crate::assess;
use crate::error::Result;
use crate::thresholds::RiskThresholds;
use crate::types::{
    Domain, DomainAssessment, FaceMetrics, GaitMetrics, ReasonCode, RiskLevel, RppgMetrics,
    VoiceMetrics,
};

/// Fixed denominator of the confidence score.
pub const CONFIDENCE_DENOMINATOR: f64 = 5.0;

/// Latest metrics from every feature provider.
///
/// Any section may be missing in JSON; it then takes its
/// "not available" default.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiskInputs {
    /// Camera vital signs.
    pub rppg: RppgMetrics,
    /// Gait analysis.
    pub gait: GaitMetrics,
    /// Facial asymmetry analysis.
    pub face: FaceMetrics,
    /// Voice analysis.
    pub voice: VoiceMetrics,
}

impl RiskInputs {
    /// Load inputs from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::FileRead`](crate::RiskError::FileRead) or
    /// [`RiskError::ParseError`](crate::RiskError::ParseError).
    #[cfg(feature = "serde")]
    pub fn from_json(path: &Path) -> Result<Self> {
        crate::error::read_json(path)
    }
}

/// Result of one stratification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskAssessment {
    /// Level per domain.
    pub risk_signals: BTreeMap<Domain, RiskLevel>,
    /// Confidence in `[0, 1]`, two decimals.
    pub confidence: f64,
    /// Reason codes of every domain that could not be assessed.
    pub uncertainty_flags: BTreeSet<ReasonCode>,
    /// Reason codes per domain, findings included.
    pub domain_reasons: BTreeMap<Domain, Vec<ReasonCode>>,
    /// Feature modules that produced a usable assessment (rPPG counts once).
    pub available_modules: u8,
}

impl RiskAssessment {
    /// Level of `domain`.
    #[must_use]
    pub fn level(&self, domain: Domain) -> RiskLevel {
        self.risk_signals
            .get(&domain)
            .copied()
            .unwrap_or(RiskLevel::Uncertain)
    }

    /// Reason codes of `domain`.
    #[must_use]
    pub fn reasons(&self, domain: Domain) -> &[ReasonCode] {
        self.domain_reasons.get(&domain).map_or(&[], Vec::as_slice)
    }

    /// Highest level among assessed domains, `None` if none was assessed.
    #[must_use]
    pub fn highest(&self) -> Option<RiskLevel> {
        self.risk_signals
            .values()
            .copied()
            .filter(|l| l.is_assessed())
            .fold(None, |acc, l| match acc {
                Some(a) if a >= l => Some(a),
                _ => Some(l),
            })
    }

    /// Whether any assessed domain is `high`.
    #[must_use]
    pub fn has_high_risk(&self) -> bool {
        self.risk_signals.values().any(|l| *l == RiskLevel::High)
    }
}

/// Deterministic rule-based risk stratifier.
///
/// Holds only thresholds; [`Self::stratify`] has no side effects and
/// may be called concurrently.
#[derive(Debug, Clone, Default)]
pub struct RiskStratifier {
    thresholds: RiskThresholds,
}

impl RiskStratifier {
    /// Create a stratifier with validated thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidThreshold`](crate::RiskError::InvalidThreshold)
    /// if validation fails.
    pub fn new(thresholds: RiskThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Active thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Stratify one set of inputs.
    #[must_use]
    pub fn stratify_inputs(&self, inputs: &RiskInputs) -> RiskAssessment {
        self.stratify(&inputs.rppg, &inputs.gait, &inputs.face, &inputs.voice)
    }

    /// Assess every domain and merge the results.
    #[must_use]
    pub fn stratify(
        &self,
        rppg: &RppgMetrics,
        gait: &GaitMetrics,
        face: &FaceMetrics,
        voice: &VoiceMetrics,
    ) -> RiskAssessment {
        let t = &self.thresholds;
        let domains: [(Domain, DomainAssessment); 5] = [
            (Domain::Cardiovascular, assess::cardiovascular(rppg, t)),
            (Domain::Respiratory, assess::respiratory(rppg, t)),
            (Domain::Gait, assess::gait(gait, t)),
            (Domain::Face, assess::face(face, t)),
            (Domain::Voice, assess::voice(voice, t)),
        ];

        let mut risk_signals = BTreeMap::new();
        let mut domain_reasons = BTreeMap::new();
        let mut uncertainty_flags = BTreeSet::new();
        let mut points = 0.0;
        let mut rppg_available = false;
        let mut available_modules = 0_u8;

        for (domain, assessment) in domains {
            let assessed = assessment.level.is_assessed();
            points += assessment.level.confidence_points();
            match domain {
                Domain::Cardiovascular | Domain::Respiratory => rppg_available |= assessed,
                Domain::Gait | Domain::Face | Domain::Voice => {
                    available_modules += u8::from(assessed);
                }
            }
            if !assessed {
                uncertainty_flags.extend(assessment.reasons.iter().copied());
            }
            risk_signals.insert(domain, assessment.level);
            domain_reasons.insert(domain, assessment.reasons);
        }
        available_modules += u8::from(rppg_available);

        let confidence = round2(points / CONFIDENCE_DENOMINATOR);

        debug!(
            confidence,
            available_modules,
            uncertain = uncertainty_flags.len(),
            "risk stratified"
        );

        RiskAssessment {
            risk_signals,
            confidence,
            uncertainty_flags,
            domain_reasons,
            available_modules,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> RiskInputs {
        RiskInputs {
            rppg: RppgMetrics {
                bpm: 70.0,
                hrv_sdnn: 50.0,
                rr: 15.0,
            },
            gait: GaitMetrics {
                status: "Tracking".into(),
                cadence: 110.0,
                symmetry: 95.0,
                avg_stride_length: 0.7,
                balance_stability: 90.0,
            },
            face: FaceMetrics {
                asymmetry_score: 0.05,
                eye_openness: 0.8,
            },
            voice: VoiceMetrics {
                mpt_seconds: Some(5.0),
                jitter_percent: Some(0.5),
                shimmer_percent: Some(2.0),
                hnr_db: Some(25.0),
            },
        }
    }

    #[test]
    fn healthy_inputs_full_confidence() {
        let a = RiskStratifier::default().stratify_inputs(&healthy());
        assert!((a.confidence - 1.0).abs() < f64::EPSILON);
        assert!(a.uncertainty_flags.is_empty());
        assert_eq!(a.available_modules, 4);
        assert!(Domain::ALL.iter().all(|d| a.level(*d) == RiskLevel::Low));
        assert_eq!(a.highest(), Some(RiskLevel::Low));
    }

    #[test]
    fn confidence_low_low_medium_medium_low() {
        let mut inputs = healthy();
        inputs.gait.cadence = 80.0;
        inputs.face.asymmetry_score = 0.3;
        let a = RiskStratifier::default().stratify_inputs(&inputs);
        assert_eq!(a.level(Domain::Gait), RiskLevel::Medium);
        assert_eq!(a.level(Domain::Face), RiskLevel::Medium);
        assert!((a.confidence - 0.80).abs() < f64::EPSILON);
    }

    #[test]
    fn rppg_counts_as_one_module() {
        let mut inputs = healthy();
        inputs.rppg.rr = 0.0;
        let a = RiskStratifier::default().stratify_inputs(&inputs);
        assert_eq!(a.available_modules, 4);
        assert!((a.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(
            a.uncertainty_flags.iter().copied().collect::<Vec<_>>(),
            vec![ReasonCode::InsufficientRespData]
        );
    }

    #[test]
    fn findings_are_not_uncertainty_flags() {
        let mut inputs = healthy();
        inputs.rppg.bpm = 120.0;
        let a = RiskStratifier::default().stratify_inputs(&inputs);
        assert_eq!(a.level(Domain::Cardiovascular), RiskLevel::High);
        assert!(a.uncertainty_flags.is_empty());
        assert_eq!(a.reasons(Domain::Cardiovascular), &[ReasonCode::HighBpm]);
        assert!(a.has_high_risk());
    }

    #[test]
    fn nothing_available() {
        let a = RiskStratifier::default().stratify_inputs(&RiskInputs::default());
        assert!(a.confidence.abs() < f64::EPSILON);
        assert_eq!(a.available_modules, 0);
        assert_eq!(a.highest(), None);
        assert_eq!(a.uncertainty_flags.len(), 6);
    }

    #[test]
    fn invalid_thresholds_rejected() {
        let t = RiskThresholds {
            rr_low: 30.0,
            ..RiskThresholds::default()
        };
        assert!(RiskStratifier::new(t).is_err());
    }

    #[test]
    fn rounding_to_two_decimals() {
        assert!((round2(0.666_666) - 0.67).abs() < 1e-12);
        assert!((round2(0.3) - 0.3).abs() < 1e-12);
    }
}
