use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::normalizer::{lenient_count, lenient_number, lenient_ratings, RawValue};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record categories tracked per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Dvf,
    Lovability,
    Analytics,
    Competitive,
}

impl ItemType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Dvf, Self::Lovability, Self::Analytics, Self::Competitive]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dvf => "DVF Assessment",
            Self::Lovability => "Lovability Metrics",
            Self::Analytics => "Project Analytics",
            Self::Competitive => "Competitive Analysis",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dvf" => Some(Self::Dvf),
            "lovability" => Some(Self::Lovability),
            "analytics" => Some(Self::Analytics),
            "competitive" => Some(Self::Competitive),
            _ => None,
        }
    }
}

/// Persistence key for a single assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub project_id: ProjectId,
    pub item_id: ItemId,
    pub item_type: ItemType,
}

/// Descriptive project metadata. Opaque to the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// One human-entered numeric field with its declared bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricInput {
    pub category: String,
    pub key: String,
    #[serde(default)]
    pub raw_value: RawValue,
    pub min: f64,
    pub max: f64,
}

impl MetricInput {
    pub fn new(
        category: impl Into<String>,
        key: impl Into<String>,
        raw_value: impl Into<RawValue>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
            raw_value: raw_value.into(),
            min,
            max,
        }
    }

    /// Value clamped into `[min, max]`.
    pub fn normalized(&self) -> f64 {
        super::normalizer::normalize_raw(self.raw_value.as_number(), self.min, self.max)
    }
}

/// Final call on the artifact. Always set by a person; the engine only carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Proceed,
    #[default]
    Modify,
    Stop,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Proceed => "Proceed",
            Self::Modify => "Modify",
            Self::Stop => "Stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PillarEvidence {
    #[serde(default)]
    pub desirability: String,
    #[serde(default)]
    pub feasibility: String,
    #[serde(default)]
    pub viability: String,
}

/// Desirability / feasibility / viability assessment, each pillar on a 0-5 scale.
///
/// Pillars are read leniently: absent, null or non-numeric entries are kept as missing and score
/// as the lowest valid value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarAssessment {
    #[serde(default, deserialize_with = "lenient_number")]
    pub desirability: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub feasibility: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub viability: f64,
    #[serde(default)]
    pub evidence: PillarEvidence,
    #[serde(default)]
    pub recommendation: Recommendation,
}

impl PillarAssessment {
    pub fn new(desirability: f64, feasibility: f64, viability: f64) -> Self {
        Self {
            desirability,
            feasibility,
            viability,
            evidence: PillarEvidence::default(),
            recommendation: Recommendation::default(),
        }
    }
}

/// Emotional response buckets as percentages. They need not add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionalDistribution {
    #[serde(default, deserialize_with = "lenient_number")]
    pub delight: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub satisfaction: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub neutral: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub frustration: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementProfile {
    #[serde(deserialize_with = "lenient_number")]
    pub nps: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub satisfaction: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub retention_rate: f64,
    /// Minutes.
    #[serde(deserialize_with = "lenient_number")]
    pub engagement_time: f64,
    pub emotional_distribution: EmotionalDistribution,
    #[serde(deserialize_with = "lenient_number")]
    pub completion_rate: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub error_rate: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub support_tickets: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub testing_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveProfile {
    #[serde(deserialize_with = "lenient_ratings")]
    pub feature_ratings: BTreeMap<String, f64>,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
}

/// Free-form analytics capture. Counted for sufficiency and forwarded to synthesis, never scored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectAnalytics {
    pub period: String,
    pub metrics: Vec<MetricInput>,
}

/// Populated record counts for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataInventory {
    pub dvf_assessments: u32,
    pub lovability_metrics: u32,
    pub project_analytics: u32,
    pub competitive_analyses: u32,
}

impl DataInventory {
    pub fn total(&self) -> u64 {
        u64::from(self.dvf_assessments)
            + u64::from(self.lovability_metrics)
            + u64::from(self.project_analytics)
            + u64::from(self.competitive_analyses)
    }

    pub fn count(&self, item_type: ItemType) -> u32 {
        match item_type {
            ItemType::Dvf => self.dvf_assessments,
            ItemType::Lovability => self.lovability_metrics,
            ItemType::Analytics => self.project_analytics,
            ItemType::Competitive => self.competitive_analyses,
        }
    }

    fn increment(&mut self, item_type: ItemType) {
        let slot = match item_type {
            ItemType::Dvf => &mut self.dvf_assessments,
            ItemType::Lovability => &mut self.lovability_metrics,
            ItemType::Analytics => &mut self.project_analytics,
            ItemType::Competitive => &mut self.competitive_analyses,
        };
        *slot = slot.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "data", rename_all = "snake_case")]
pub enum AssessmentPayload {
    Dvf(PillarAssessment),
    Lovability(EngagementProfile),
    Analytics(ProjectAnalytics),
    Competitive(CompetitiveProfile),
}

impl AssessmentPayload {
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::Dvf(_) => ItemType::Dvf,
            Self::Lovability(_) => ItemType::Lovability,
            Self::Analytics(_) => ItemType::Analytics,
            Self::Competitive(_) => ItemType::Competitive,
        }
    }
}

/// A stored record as handed over by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub project_id: ProjectId,
    pub item_id: ItemId,
    pub recorded_at: DateTime<Utc>,
    pub payload: AssessmentPayload,
}

impl AssessmentRecord {
    pub fn new(
        project_id: ProjectId,
        item_id: ItemId,
        recorded_at: DateTime<Utc>,
        payload: AssessmentPayload,
    ) -> Self {
        Self {
            project_id,
            item_id,
            recorded_at,
            payload,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            project_id: self.project_id.clone(),
            item_id: self.item_id.clone(),
            item_type: self.payload.item_type(),
        }
    }

    pub const fn item_type(&self) -> ItemType {
        self.payload.item_type()
    }
}

/// Full current state of a project's records. Scoring always starts from one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: ProjectInfo,
    #[serde(default)]
    pub records: Vec<AssessmentRecord>,
}

impl ProjectSnapshot {
    pub fn new(project: ProjectInfo) -> Self {
        Self {
            project,
            records: Vec::new(),
        }
    }

    pub fn with_record(
        mut self,
        item_id: &str,
        recorded_at: DateTime<Utc>,
        payload: AssessmentPayload,
    ) -> Self {
        self.records.push(AssessmentRecord::new(
            self.project.id.clone(),
            ItemId(item_id.to_string()),
            recorded_at,
            payload,
        ));
        self
    }

    pub fn inventory(&self) -> DataInventory {
        let mut inventory = DataInventory::default();
        for record in &self.records {
            inventory.increment(record.item_type());
        }
        inventory
    }

    pub fn records_of(&self, item_type: ItemType) -> impl Iterator<Item = &AssessmentRecord> {
        self.records
            .iter()
            .filter(move |record| record.item_type() == item_type)
    }

    /// Most recently recorded item of a category; ties resolve to the greatest item id.
    pub fn latest(&self, item_type: ItemType) -> Option<&AssessmentRecord> {
        self.records_of(item_type)
            .max_by(|a, b| {
                a.recorded_at
                    .cmp(&b.recorded_at)
                    .then_with(|| a.item_id.cmp(&b.item_id))
            })
    }

    pub fn latest_pillars(&self) -> Option<&PillarAssessment> {
        match self.latest(ItemType::Dvf).map(|record| &record.payload) {
            Some(AssessmentPayload::Dvf(assessment)) => Some(assessment),
            _ => None,
        }
    }

    pub fn latest_engagement(&self) -> Option<&EngagementProfile> {
        match self.latest(ItemType::Lovability).map(|record| &record.payload) {
            Some(AssessmentPayload::Lovability(profile)) => Some(profile),
            _ => None,
        }
    }

    pub fn latest_competitive(&self) -> Option<&CompetitiveProfile> {
        match self.latest(ItemType::Competitive).map(|record| &record.payload) {
            Some(AssessmentPayload::Competitive(profile)) => Some(profile),
            _ => None,
        }
    }
}
