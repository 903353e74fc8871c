use serde::{Deserialize, Serialize};

use super::super::domain::{PillarAssessment, Recommendation};
use super::super::normalizer::PILLAR_RANGE;
use super::config::PillarTierThresholds;
use super::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarTier {
    Strong,
    Moderate,
    Weak,
}

impl PillarTier {
    pub fn from_overall(overall: f64, thresholds: &PillarTierThresholds) -> Self {
        if overall >= thresholds.strong {
            Self::Strong
        } else if overall >= thresholds.moderate {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

/// Computed DVF score next to the human decision it was recorded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub desirability: f64,
    pub feasibility: f64,
    pub viability: f64,
    pub overall: f64,
    pub tier: PillarTier,
    /// Copied from the assessment untouched.
    pub recommendation: Recommendation,
}

pub(crate) fn score(
    assessment: &PillarAssessment,
    thresholds: &PillarTierThresholds,
) -> PillarScore {
    let desirability = PILLAR_RANGE.clamp(assessment.desirability);
    let feasibility = PILLAR_RANGE.clamp(assessment.feasibility);
    let viability = PILLAR_RANGE.clamp(assessment.viability);

    let overall = round1((desirability + feasibility + viability) / 3.0);

    PillarScore {
        desirability,
        feasibility,
        viability,
        overall,
        tier: PillarTier::from_overall(overall, thresholds),
        recommendation: assessment.recommendation,
    }
}
