use crate::benchmarking::normalizer::{
    FieldRange, COUNT_RANGE, FEATURE_RATING_RANGE, MINUTES_RANGE, NPS_RANGE, PERCENT_RANGE,
    PILLAR_RANGE, SATISFACTION_RANGE, UNBOUNDED_RANGE,
};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Part of a project record a CSV row feeds into, decided by its category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Pillars,
    Engagement,
    Emotion,
    Feature,
    Advantage,
    Disadvantage,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PillarField {
    Desirability,
    Feasibility,
    Viability,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngagementField {
    Nps,
    Satisfaction,
    RetentionRate,
    EngagementTime,
    CompletionRate,
    ErrorRate,
    SupportTickets,
    TestingSessions,
}

impl EngagementField {
    pub(crate) const fn range(self) -> FieldRange {
        match self {
            Self::Nps => NPS_RANGE,
            Self::Satisfaction => SATISFACTION_RANGE,
            Self::RetentionRate | Self::CompletionRate | Self::ErrorRate => PERCENT_RANGE,
            Self::EngagementTime => MINUTES_RANGE,
            Self::SupportTickets | Self::TestingSessions => COUNT_RANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmotionField {
    Delight,
    Satisfaction,
    Neutral,
    Frustration,
}

impl Section {
    pub(crate) const fn default_range(self) -> FieldRange {
        match self {
            Self::Pillars => PILLAR_RANGE,
            Self::Emotion => PERCENT_RANGE,
            Self::Feature => FEATURE_RATING_RANGE,
            Self::Engagement | Self::Advantage | Self::Disadvantage | Self::Analytics => {
                UNBOUNDED_RANGE
            }
        }
    }
}

static SECTION_MAP: OnceLock<HashMap<&'static str, Section>> = OnceLock::new();
static PILLAR_MAP: OnceLock<HashMap<&'static str, PillarField>> = OnceLock::new();
static ENGAGEMENT_MAP: OnceLock<HashMap<&'static str, EngagementField>> = OnceLock::new();
static EMOTION_MAP: OnceLock<HashMap<&'static str, EmotionField>> = OnceLock::new();

/// Unknown categories land in analytics so nothing in an export is silently dropped.
pub(crate) fn section_for(normalized_category: &str) -> Section {
    SECTION_MAP
        .get_or_init(|| {
            HashMap::from([
                ("dvf", Section::Pillars),
                ("pillar", Section::Pillars),
                ("pillars", Section::Pillars),
                ("dvf assessment", Section::Pillars),
                ("lovability", Section::Engagement),
                ("lovability metrics", Section::Engagement),
                ("engagement", Section::Engagement),
                ("emotion", Section::Emotion),
                ("emotional", Section::Emotion),
                ("emotional distribution", Section::Emotion),
                ("feature", Section::Feature),
                ("features", Section::Feature),
                ("feature rating", Section::Feature),
                ("advantage", Section::Advantage),
                ("advantages", Section::Advantage),
                ("disadvantage", Section::Disadvantage),
                ("disadvantages", Section::Disadvantage),
                ("gap", Section::Disadvantage),
            ])
        })
        .get(normalized_category)
        .copied()
        .unwrap_or(Section::Analytics)
}

pub(crate) fn pillar_field(normalized_key: &str) -> Option<PillarField> {
    PILLAR_MAP
        .get_or_init(|| {
            HashMap::from([
                ("desirability", PillarField::Desirability),
                ("feasibility", PillarField::Feasibility),
                ("viability", PillarField::Viability),
                ("recommendation", PillarField::Recommendation),
                ("decision", PillarField::Recommendation),
            ])
        })
        .get(normalized_key)
        .copied()
}

pub(crate) fn engagement_field(normalized_key: &str) -> Option<EngagementField> {
    ENGAGEMENT_MAP
        .get_or_init(|| {
            HashMap::from([
                ("nps", EngagementField::Nps),
                ("net promoter score", EngagementField::Nps),
                ("satisfaction", EngagementField::Satisfaction),
                ("satisfaction score", EngagementField::Satisfaction),
                ("retention", EngagementField::RetentionRate),
                ("retention rate", EngagementField::RetentionRate),
                ("engagement time", EngagementField::EngagementTime),
                ("engagement minutes", EngagementField::EngagementTime),
                ("completion rate", EngagementField::CompletionRate),
                ("task completion rate", EngagementField::CompletionRate),
                ("error rate", EngagementField::ErrorRate),
                ("support tickets", EngagementField::SupportTickets),
                ("testing sessions", EngagementField::TestingSessions),
                ("user testing sessions", EngagementField::TestingSessions),
            ])
        })
        .get(normalized_key)
        .copied()
}

pub(crate) fn emotion_field(normalized_key: &str) -> Option<EmotionField> {
    EMOTION_MAP
        .get_or_init(|| {
            HashMap::from([
                ("delight", EmotionField::Delight),
                ("satisfaction", EmotionField::Satisfaction),
                ("neutral", EmotionField::Neutral),
                ("frustration", EmotionField::Frustration),
            ])
        })
        .get(normalized_key)
        .copied()
}

/// Lowercased, whitespace-collapsed header text with BOM and zero-width characters removed.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_strips_invisible_characters() {
        assert_eq!(normalize_name("\u{feff}Retention   Rate "), "retention rate");
        assert_eq!(normalize_name("Error\u{200b} Rate"), "error rate");
    }

    #[test]
    fn unknown_categories_fall_back_to_analytics() {
        assert_eq!(section_for("dvf"), Section::Pillars);
        assert_eq!(section_for("emotional distribution"), Section::Emotion);
        assert_eq!(section_for("weekly actives"), Section::Analytics);
    }

    #[test]
    fn engagement_aliases_resolve_with_declared_ranges() {
        let nps = engagement_field("net promoter score").expect("nps alias");
        assert_eq!(nps, EngagementField::Nps);
        assert_eq!(nps.range(), NPS_RANGE);
        assert_eq!(
            engagement_field("support tickets").map(EngagementField::range),
            Some(COUNT_RANGE)
        );
        assert_eq!(engagement_field("bounce rate"), None);
    }
}
