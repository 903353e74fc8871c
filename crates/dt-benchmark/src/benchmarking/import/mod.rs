mod mapping;
mod parser;

use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::domain::{
    AssessmentPayload, CompetitiveProfile, EngagementProfile, MetricInput, PillarAssessment,
    ProjectAnalytics, ProjectInfo, ProjectSnapshot, Recommendation,
};
use super::normalizer::{FieldRange, RawValue, COUNT_RANGE};
use mapping::{EmotionField, EngagementField, PillarField, Section};
use parser::MetricRow;

#[derive(Debug, thiserror::Error)]
pub enum MetricImportError {
    #[error("failed to read metric export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid metric CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {column} bound '{value}' is not a number")]
    InvalidBound {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: unknown recommendation '{value}'")]
    InvalidRecommendation { line: u64, value: String },
}

/// Records assembled from a `Category,Key,Value,Min,Max` export.
///
/// A section is `None` when the export carried no rows for it, so importing never invents
/// records that would inflate the sufficiency tier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedMetrics {
    pub pillars: Option<PillarAssessment>,
    pub engagement: Option<EngagementProfile>,
    pub competitive: Option<CompetitiveProfile>,
    pub analytics: Option<ProjectAnalytics>,
    /// Every numeric row as read, with the bounds it was clamped against.
    pub inputs: Vec<MetricInput>,
}

impl ImportedMetrics {
    pub fn into_snapshot(
        self,
        project: ProjectInfo,
        recorded_at: DateTime<Utc>,
    ) -> ProjectSnapshot {
        let mut snapshot = ProjectSnapshot::new(project);
        if let Some(pillars) = self.pillars {
            snapshot =
                snapshot.with_record("import-dvf", recorded_at, AssessmentPayload::Dvf(pillars));
        }
        if let Some(engagement) = self.engagement {
            snapshot = snapshot.with_record(
                "import-lovability",
                recorded_at,
                AssessmentPayload::Lovability(engagement),
            );
        }
        if let Some(analytics) = self.analytics {
            snapshot = snapshot.with_record(
                "import-analytics",
                recorded_at,
                AssessmentPayload::Analytics(analytics),
            );
        }
        if let Some(competitive) = self.competitive {
            snapshot = snapshot.with_record(
                "import-competitive",
                recorded_at,
                AssessmentPayload::Competitive(competitive),
            );
        }
        snapshot
    }
}

pub struct MetricImporter;

impl MetricImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImportedMetrics, MetricImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ImportedMetrics, MetricImportError> {
        let mut imported = ImportedMetrics::default();

        for row in parser::parse_rows(reader)? {
            apply_row(row, &mut imported)?;
        }

        debug!(
            inputs = imported.inputs.len(),
            pillars = imported.pillars.is_some(),
            engagement = imported.engagement.is_some(),
            competitive = imported.competitive.is_some(),
            analytics = imported.analytics.is_some(),
            "imported metric export"
        );
        Ok(imported)
    }
}

fn apply_row(row: MetricRow, imported: &mut ImportedMetrics) -> Result<(), MetricImportError> {
    match mapping::section_for(&row.normalized_category) {
        Section::Pillars => match mapping::pillar_field(&row.normalized_key) {
            Some(PillarField::Recommendation) => {
                let recommendation = parse_recommendation(&row)?;
                pillars(imported).recommendation = recommendation;
            }
            Some(field) => {
                let value = imported.clamped(&row, Section::Pillars.default_range());
                let assessment = pillars(imported);
                match field {
                    PillarField::Desirability => assessment.desirability = value,
                    PillarField::Feasibility => assessment.feasibility = value,
                    PillarField::Viability => assessment.viability = value,
                    PillarField::Recommendation => {}
                }
            }
            None => push_analytics(row, imported),
        },
        Section::Engagement => match mapping::engagement_field(&row.normalized_key) {
            Some(field) => {
                let value = imported.clamped(&row, field.range());
                let profile = imported.engagement.get_or_insert_with(EngagementProfile::default);
                match field {
                    EngagementField::Nps => profile.nps = value,
                    EngagementField::Satisfaction => profile.satisfaction = value,
                    EngagementField::RetentionRate => profile.retention_rate = value,
                    EngagementField::EngagementTime => profile.engagement_time = value,
                    EngagementField::CompletionRate => profile.completion_rate = value,
                    EngagementField::ErrorRate => profile.error_rate = value,
                    EngagementField::SupportTickets => profile.support_tickets = as_count(value),
                    EngagementField::TestingSessions => profile.testing_sessions = as_count(value),
                }
            }
            None => push_analytics(row, imported),
        },
        Section::Emotion => match mapping::emotion_field(&row.normalized_key) {
            Some(field) => {
                let value = imported.clamped(&row, Section::Emotion.default_range());
                let profile = imported.engagement.get_or_insert_with(EngagementProfile::default);
                let emotions = &mut profile.emotional_distribution;
                match field {
                    EmotionField::Delight => emotions.delight = value,
                    EmotionField::Satisfaction => emotions.satisfaction = value,
                    EmotionField::Neutral => emotions.neutral = value,
                    EmotionField::Frustration => emotions.frustration = value,
                }
            }
            None => push_analytics(row, imported),
        },
        Section::Feature => {
            let value = imported.clamped(&row, Section::Feature.default_range());
            competitive(imported)
                .feature_ratings
                .insert(row.key.clone(), value);
        }
        Section::Advantage => {
            if !row.key.is_empty() {
                competitive(imported).advantages.push(row.key);
            }
        }
        Section::Disadvantage => {
            if !row.key.is_empty() {
                competitive(imported).disadvantages.push(row.key);
            }
        }
        Section::Analytics => push_analytics(row, imported),
    }

    Ok(())
}

impl ImportedMetrics {
    fn clamped(&mut self, row: &MetricRow, declared: FieldRange) -> f64 {
        let input = MetricInput::new(
            row.category.clone(),
            row.key.clone(),
            row.value.clone(),
            row.min.unwrap_or(declared.min),
            row.max.unwrap_or(declared.max),
        );
        let value = input.normalized();
        self.inputs.push(input);
        value
    }
}

fn pillars(imported: &mut ImportedMetrics) -> &mut PillarAssessment {
    imported
        .pillars
        .get_or_insert_with(|| PillarAssessment::new(0.0, 0.0, 0.0))
}

fn competitive(imported: &mut ImportedMetrics) -> &mut CompetitiveProfile {
    imported
        .competitive
        .get_or_insert_with(CompetitiveProfile::default)
}

fn push_analytics(row: MetricRow, imported: &mut ImportedMetrics) {
    let analytics = imported
        .analytics
        .get_or_insert_with(ProjectAnalytics::default);

    if row.normalized_key == "period" {
        if let RawValue::Text(period) = row.value {
            analytics.period = period;
        }
        return;
    }

    let declared = Section::Analytics.default_range();
    analytics.metrics.push(MetricInput::new(
        row.category,
        row.key,
        row.value,
        row.min.unwrap_or(declared.min),
        row.max.unwrap_or(declared.max),
    ));
}

fn parse_recommendation(row: &MetricRow) -> Result<Recommendation, MetricImportError> {
    let text = match &row.value {
        RawValue::Text(text) => mapping::normalize_name(text),
        _ => String::new(),
    };
    match text.as_str() {
        "proceed" | "go" => Ok(Recommendation::Proceed),
        "modify" | "iterate" => Ok(Recommendation::Modify),
        "stop" | "no go" => Ok(Recommendation::Stop),
        _ => Err(MetricImportError::InvalidRecommendation {
            line: row.line,
            value: text,
        }),
    }
}

fn as_count(value: f64) -> u32 {
    COUNT_RANGE.clamp(value.round()) as u32
}
