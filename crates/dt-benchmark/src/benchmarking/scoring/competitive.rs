use serde::{Deserialize, Serialize};

use super::super::domain::CompetitiveProfile;
use super::super::normalizer::{FEATURE_RATING_RANGE, SCORE_RANGE};
use super::config::CompetitivePolicy;
use super::round1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveScore {
    pub average_feature: f64,
    pub advantages: usize,
    pub disadvantages: usize,
    pub advantage_bonus: f64,
    pub gap_penalty: f64,
    /// 0-10, one decimal.
    pub competitiveness: f64,
}

pub(crate) fn score(profile: &CompetitiveProfile, policy: &CompetitivePolicy) -> CompetitiveScore {
    let average_feature = average_rating(profile);
    let advantages = populated(&profile.advantages);
    let disadvantages = populated(&profile.disadvantages);

    let advantage_bonus = (policy.advantage_step * advantages as f64).min(policy.advantage_cap);
    let gap_penalty = (policy.gap_step * disadvantages as f64).min(policy.gap_cap);

    let raw = average_feature * policy.feature_scale + advantage_bonus - gap_penalty;
    let competitiveness = round1(SCORE_RANGE.clamp(raw));

    CompetitiveScore {
        average_feature,
        advantages,
        disadvantages,
        advantage_bonus,
        gap_penalty,
        competitiveness,
    }
}

fn average_rating(profile: &CompetitiveProfile) -> f64 {
    if profile.feature_ratings.is_empty() {
        return 0.0;
    }

    let total: f64 = profile
        .feature_ratings
        .values()
        .map(|rating| FEATURE_RATING_RANGE.clamp(*rating))
        .sum();
    total / profile.feature_ratings.len() as f64
}

fn populated(entries: &[String]) -> usize {
    entries
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .count()
}
