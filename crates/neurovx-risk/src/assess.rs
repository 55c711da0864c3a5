//! Per-domain rule assessors.
//!
//! Each assessor is a pure function of one domain's metrics and the
//! thresholds. Cardiovascular, respiratory, gait and face inputs use an
//! exact `0.0` to mean "not computed"; voice inputs use `None`.

use crate::thresholds::RiskThresholds;
use crate::types::{
    DomainAssessment, FaceMetrics, GaitMetrics, ReasonCode, RiskLevel, RppgMetrics, VoiceMetrics,
};

/// Heart rate and HRV.
///
/// Heart rate sets the base level (`high` above `bpm_high`, `medium`
/// below `bpm_low`); low HRV then escalates that level by one step.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn cardiovascular(m: &RppgMetrics, t: &RiskThresholds) -> DomainAssessment {
    if m.bpm == 0.0 || m.hrv_sdnn == 0.0 {
        return DomainAssessment::uncertain(vec![ReasonCode::InsufficientCardioData]);
    }

    let mut out = DomainAssessment::low();
    if m.bpm > t.bpm_high {
        out.raise_to(RiskLevel::High, ReasonCode::HighBpm);
    } else if m.bpm < t.bpm_low && m.bpm > t.sentinel_floor {
        out.raise_to(RiskLevel::Medium, ReasonCode::LowBpm);
    }

    if m.hrv_sdnn < t.hrv_low && m.hrv_sdnn > t.sentinel_floor {
        out.escalate(ReasonCode::LowHrv);
    }
    out
}

/// Respiratory rate.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn respiratory(m: &RppgMetrics, t: &RiskThresholds) -> DomainAssessment {
    if m.rr == 0.0 {
        return DomainAssessment::uncertain(vec![ReasonCode::InsufficientRespData]);
    }

    let mut out = DomainAssessment::low();
    if m.rr > t.rr_high {
        out.raise_to(RiskLevel::High, ReasonCode::HighRr);
    } else if m.rr < t.rr_low && m.rr > t.sentinel_floor {
        out.raise_to(RiskLevel::Medium, ReasonCode::LowRr);
    }
    out
}

/// Gait symmetry, balance and cadence. Never rises above `medium`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn gait(m: &GaitMetrics, t: &RiskThresholds) -> DomainAssessment {
    if m.status == t.no_subject_status
        || m.symmetry == 0.0
        || m.balance_stability == 0.0
        || m.cadence == 0.0
    {
        return DomainAssessment::uncertain(vec![ReasonCode::InsufficientGaitData]);
    }

    let mut out = DomainAssessment::low();
    let checks = [
        (m.symmetry < t.gait_symmetry_low, ReasonCode::GaitAsymmetry),
        (m.balance_stability < t.gait_balance_low, ReasonCode::GaitInstability),
        (m.cadence < t.gait_cadence_low, ReasonCode::LowCadence),
    ];
    for (triggered, reason) in checks {
        if triggered {
            out.raise_to(RiskLevel::Medium, reason);
        }
    }
    out
}

/// Facial asymmetry.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn face(m: &FaceMetrics, t: &RiskThresholds) -> DomainAssessment {
    if m.asymmetry_score == 0.0 {
        return DomainAssessment::uncertain(vec![ReasonCode::NoFaceAsymmetryData]);
    }

    let mut out = DomainAssessment::low();
    if m.asymmetry_score > t.face_asymmetry_high {
        out.raise_to(RiskLevel::Medium, ReasonCode::HighFaceAsymmetry);
    }
    out
}

/// Voice quality.
///
/// Jitter, shimmer and HNR come from one acoustic analysis and are
/// required together. A short phonation time sets `medium`; each
/// perturbation finding then escalates one step from the level reached
/// so far, so findings compound up to `high`.
#[must_use]
pub fn voice(m: &VoiceMetrics, t: &RiskThresholds) -> DomainAssessment {
    let mut missing = Vec::new();
    if m.mpt_seconds.is_none() {
        missing.push(ReasonCode::MptUnavailable);
    }
    let (Some(jitter), Some(shimmer), Some(hnr)) = (m.jitter_percent, m.shimmer_percent, m.hnr_db)
    else {
        missing.push(ReasonCode::VoiceMetricsBlocked);
        return DomainAssessment::uncertain(missing);
    };
    let Some(mpt) = m.mpt_seconds else {
        return DomainAssessment::uncertain(missing);
    };

    let mut out = DomainAssessment::low();
    if mpt < t.voice_mpt_low {
        out.raise_to(RiskLevel::Medium, ReasonCode::LowMpt);
    }
    if jitter > t.voice_jitter_high {
        out.escalate(ReasonCode::HighJitter);
    }
    if shimmer > t.voice_shimmer_high {
        out.escalate(ReasonCode::HighShimmer);
    }
    if hnr < t.voice_hnr_low {
        out.escalate(ReasonCode::LowHnr);
    }
    out
}
