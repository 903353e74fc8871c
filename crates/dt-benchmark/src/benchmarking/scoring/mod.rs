mod competitive;
mod config;
mod engagement;
mod pillars;

pub use competitive::CompetitiveScore;
pub use config::{
    CompetitivePolicy, EmotionalWeights, EngagementPolicy, LovabilityTierThresholds,
    PillarTierThresholds, PolicyError, ScoringPolicy, SufficiencyThresholds,
};
pub use engagement::{EngagementScore, LovabilityTier};
pub use pillars::{PillarScore, PillarTier};

use super::domain::{
    CompetitiveProfile, DataInventory, EngagementProfile, PillarAssessment, ProjectSnapshot,
};
use super::sufficiency::{self, SufficiencyReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless scorer that applies a [`ScoringPolicy`] to the current inputs.
///
/// Nothing is cached: every call recomputes from what it is handed, so two calls with the same
/// snapshot always agree and a changed snapshot is always reflected.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkEngine {
    policy: ScoringPolicy,
}

impl BenchmarkEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn score_pillars(&self, assessment: &PillarAssessment) -> PillarScore {
        pillars::score(assessment, &self.policy.pillar_tiers)
    }

    pub fn score_engagement(&self, profile: &EngagementProfile) -> EngagementScore {
        engagement::score(
            profile,
            &self.policy.emotional_weights,
            &self.policy.engagement,
            &self.policy.lovability_tiers,
        )
    }

    pub fn score_competitive(&self, profile: &CompetitiveProfile) -> CompetitiveScore {
        competitive::score(profile, &self.policy.competitive)
    }

    pub fn assess_sufficiency(&self, inventory: DataInventory) -> SufficiencyReport {
        sufficiency::assess(inventory, &self.policy.sufficiency)
    }

    pub fn score(&self, snapshot: &ProjectSnapshot) -> ScoreResult {
        let result = ScoreResult {
            pillars: snapshot
                .latest_pillars()
                .map(|assessment| self.score_pillars(assessment)),
            engagement: snapshot
                .latest_engagement()
                .map(|profile| self.score_engagement(profile)),
            competitive: snapshot
                .latest_competitive()
                .map(|profile| self.score_competitive(profile)),
            sufficiency: self.assess_sufficiency(snapshot.inventory()),
        };

        debug!(
            project = %snapshot.project.id,
            records = snapshot.records.len(),
            sufficiency = result.sufficiency.percent,
            "recomputed benchmark scores"
        );

        result
    }
}

/// Derived scores for one project. Recomputed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillars: Option<PillarScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<EngagementScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitive: Option<CompetitiveScore>,
    pub sufficiency: SufficiencyReport,
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
