//! Composite "lovability" score built from emotional, metric, and behavioral sub-scores.

use serde::{Deserialize, Serialize};

use super::super::domain::{EmotionalDistribution, EngagementProfile};
use super::super::normalizer::{
    COUNT_RANGE, MINUTES_RANGE, NPS_RANGE, PERCENT_RANGE, SATISFACTION_RANGE, SCORE_RANGE,
};
use super::config::{EmotionalWeights, EngagementPolicy, LovabilityTierThresholds};
use super::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LovabilityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl LovabilityTier {
    pub fn from_overall(overall: f64, thresholds: &LovabilityTierThresholds) -> Self {
        if overall >= thresholds.excellent {
            Self::Excellent
        } else if overall >= thresholds.good {
            Self::Good
        } else if overall >= thresholds.fair {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementScore {
    pub emotional: f64,
    pub metrics: f64,
    pub behavior: f64,
    /// 0-10, one decimal.
    pub overall: f64,
    pub tier: LovabilityTier,
}

pub(crate) fn score(
    profile: &EngagementProfile,
    weights: &EmotionalWeights,
    policy: &EngagementPolicy,
    thresholds: &LovabilityTierThresholds,
) -> EngagementScore {
    let emotional = emotional_score(&profile.emotional_distribution, weights);
    let metrics = metrics_score(profile, policy);
    let behavior = behavior_score(profile, policy);

    let overall = round1(SCORE_RANGE.clamp((emotional + metrics + behavior) / 3.0));

    EngagementScore {
        emotional,
        metrics,
        behavior,
        overall,
        tier: LovabilityTier::from_overall(overall, thresholds),
    }
}

/// Weighted mean over the buckets, normalized by whatever the percentages actually add up to.
pub(crate) fn emotional_score(
    distribution: &EmotionalDistribution,
    weights: &EmotionalWeights,
) -> f64 {
    let buckets = [
        (weights.delight, PERCENT_RANGE.clamp(distribution.delight)),
        (
            weights.satisfaction,
            PERCENT_RANGE.clamp(distribution.satisfaction),
        ),
        (weights.neutral, PERCENT_RANGE.clamp(distribution.neutral)),
        (
            weights.frustration,
            PERCENT_RANGE.clamp(distribution.frustration),
        ),
    ];

    let total: f64 = buckets.iter().map(|(_, pct)| pct).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = buckets.iter().map(|(weight, pct)| weight * pct).sum();
    weighted / total
}

pub(crate) fn metrics_score(profile: &EngagementProfile, policy: &EngagementPolicy) -> f64 {
    let nps = NPS_RANGE.clamp(profile.nps);
    let satisfaction = SATISFACTION_RANGE.clamp(profile.satisfaction);
    let retention = PERCENT_RANGE.clamp(profile.retention_rate);
    let minutes = MINUTES_RANGE.clamp(profile.engagement_time);

    let engagement_points = if policy.minutes_per_point > 0.0 {
        (minutes / policy.minutes_per_point).min(policy.engagement_time_cap)
    } else {
        0.0
    };

    ((nps + 100.0) / 20.0 + satisfaction + retention / 10.0 + engagement_points) / 4.0
}

pub(crate) fn behavior_score(profile: &EngagementProfile, policy: &EngagementPolicy) -> f64 {
    let error_rate = PERCENT_RANGE.clamp(profile.error_rate);
    let completion_rate = PERCENT_RANGE.clamp(profile.completion_rate);
    let tickets = COUNT_RANGE.clamp(f64::from(profile.support_tickets));

    let support_points = (policy.support_ticket_baseline - tickets).max(0.0);

    ((100.0 - error_rate) / 10.0 + completion_rate / 10.0 + support_points) / 3.0
}
