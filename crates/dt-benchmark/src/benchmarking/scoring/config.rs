use serde::{Deserialize, Serialize};

/// Tunable constants behind every score. Changing them never changes how scores are aggregated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub emotional_weights: EmotionalWeights,
    pub engagement: EngagementPolicy,
    pub competitive: CompetitivePolicy,
    pub pillar_tiers: PillarTierThresholds,
    pub lovability_tiers: LovabilityTierThresholds,
    pub sufficiency: SufficiencyThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalWeights {
    pub delight: f64,
    pub satisfaction: f64,
    pub neutral: f64,
    pub frustration: f64,
}

impl Default for EmotionalWeights {
    fn default() -> Self {
        Self {
            delight: 4.0,
            satisfaction: 3.0,
            neutral: 2.0,
            frustration: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementPolicy {
    /// Minutes of engagement worth one point.
    pub minutes_per_point: f64,
    pub engagement_time_cap: f64,
    /// Ticket count at which the support component bottoms out.
    pub support_ticket_baseline: f64,
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self {
            minutes_per_point: 30.0,
            engagement_time_cap: 10.0,
            support_ticket_baseline: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitivePolicy {
    pub feature_scale: f64,
    pub advantage_step: f64,
    pub advantage_cap: f64,
    pub gap_step: f64,
    pub gap_cap: f64,
}

impl Default for CompetitivePolicy {
    fn default() -> Self {
        Self {
            feature_scale: 2.0,
            advantage_step: 0.5,
            advantage_cap: 5.0,
            gap_step: 0.3,
            gap_cap: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PillarTierThresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for PillarTierThresholds {
    fn default() -> Self {
        Self {
            strong: 4.0,
            moderate: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LovabilityTierThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for LovabilityTierThresholds {
    fn default() -> Self {
        Self {
            excellent: 8.0,
            good: 6.0,
            fair: 4.0,
        }
    }
}

/// Minimum total record counts for each readiness tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SufficiencyThresholds {
    pub complete: u64,
    pub substantial: u64,
    pub partial: u64,
    pub minimal: u64,
}

impl Default for SufficiencyThresholds {
    fn default() -> Self {
        Self {
            complete: 8,
            substantial: 5,
            partial: 3,
            minimal: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidWeight { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveDivisor { field: &'static str, value: f64 },
    #[error("{group} thresholds must be strictly descending")]
    UnorderedThresholds { group: &'static str },
    #[error("minimal sufficiency threshold must be at least 1")]
    ZeroMinimalThreshold,
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let weights = &self.emotional_weights;
        let competitive = &self.competitive;
        let engagement = &self.engagement;
        for (field, value) in [
            ("emotional_weights.delight", weights.delight),
            ("emotional_weights.satisfaction", weights.satisfaction),
            ("emotional_weights.neutral", weights.neutral),
            ("emotional_weights.frustration", weights.frustration),
            ("engagement.engagement_time_cap", engagement.engagement_time_cap),
            (
                "engagement.support_ticket_baseline",
                engagement.support_ticket_baseline,
            ),
            ("competitive.feature_scale", competitive.feature_scale),
            ("competitive.advantage_step", competitive.advantage_step),
            ("competitive.advantage_cap", competitive.advantage_cap),
            ("competitive.gap_step", competitive.gap_step),
            ("competitive.gap_cap", competitive.gap_cap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidWeight { field, value });
            }
        }

        if !engagement.minutes_per_point.is_finite() || engagement.minutes_per_point <= 0.0 {
            return Err(PolicyError::NonPositiveDivisor {
                field: "engagement.minutes_per_point",
                value: engagement.minutes_per_point,
            });
        }

        let pillar = &self.pillar_tiers;
        if !strictly_descending(&[pillar.strong, pillar.moderate]) {
            return Err(PolicyError::UnorderedThresholds {
                group: "pillar_tiers",
            });
        }

        let lovability = &self.lovability_tiers;
        if !strictly_descending(&[lovability.excellent, lovability.good, lovability.fair]) {
            return Err(PolicyError::UnorderedThresholds {
                group: "lovability_tiers",
            });
        }

        let sufficiency = &self.sufficiency;
        if !(sufficiency.complete > sufficiency.substantial
            && sufficiency.substantial > sufficiency.partial
            && sufficiency.partial > sufficiency.minimal)
        {
            return Err(PolicyError::UnorderedThresholds {
                group: "sufficiency",
            });
        }
        if sufficiency.minimal == 0 {
            return Err(PolicyError::ZeroMinimalThreshold);
        }

        Ok(())
    }
}

fn strictly_descending(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
        && values.windows(2).all(|pair| match pair {
            [higher, lower] => higher > lower,
            _ => true,
        })
}
