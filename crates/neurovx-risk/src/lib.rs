//! Explainable multi-domain health risk stratification.
//!
//! Classifies five physiological domains into [`RiskLevel`]s from
//! heterogeneous, possibly missing metrics and reports a confidence score
//! plus the reasons any domain could not be assessed.
//!
//! | Domain | Inputs | Uncertain when |
//! |--------|--------|----------------|
//! | Cardiovascular | BPM, HRV (SDNN) | either is `0.0` |
//! | Respiratory | RR | RR is `0.0` |
//! | Gait | status, symmetry, balance, cadence | no subject, or any metric `0.0` |
//! | Face | asymmetry score | score is `0.0` |
//! | Voice | MPT, jitter, shimmer, HNR | MPT absent, or any of jitter/shimmer/HNR absent |
//!
//! This is a screening aid built on static thresholds, not a diagnostic
//! system.
//!
//! # Example
//!
//! ```
//! use neurovx_risk::{Domain, RiskInputs, RiskLevel, RiskStratifier, RppgMetrics};
//!
//! let inputs = RiskInputs {
//!     rppg: RppgMetrics { bpm: 110.0, hrv_sdnn: 15.0, rr: 16.0 },
//!     ..RiskInputs::default()
//! };
//! let assessment = RiskStratifier::default().stratify_inputs(&inputs);
//! assert_eq!(assessment.level(Domain::Cardiovascular), RiskLevel::High);
//! assert_eq!(assessment.level(Domain::Respiratory), RiskLevel::Low);
//! assert_eq!(assessment.level(Domain::Gait), RiskLevel::Uncertain);
//! ```

pub mod assess;
pub mod error;
pub mod stratifier;
pub mod thresholds;
pub mod types;

pub use error::{Result, RiskError};
pub use stratifier::{RiskAssessment, RiskInputs, RiskStratifier, CONFIDENCE_DENOMINATOR};
pub use thresholds::RiskThresholds;
pub use types::{
    Domain, DomainAssessment, FaceMetrics, GaitMetrics, ReasonCode, RiskLevel, RppgMetrics,
    VoiceMetrics, NO_HUMAN_DETECTED,
};
