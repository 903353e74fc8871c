//! Decides whether a natural-language synthesis is worth requesting and brokers the call.
//!
//! The readiness tier is re-derived from the current record counts on every request. An empty
//! project never reaches the collaborator, and a slow or failing collaborator only costs the
//! synthesis: the scores travel back to the caller either way.

mod gateway;
mod http;

pub use gateway::{
    OfflineSynthesisGateway, SynthesisBundle, SynthesisError, SynthesisGateway, SynthesisReply,
};
pub use http::HttpSynthesisGateway;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    AssessmentPayload, CompetitiveProfile, DataInventory, EngagementProfile, PillarAssessment,
    ProjectAnalytics, ProjectId, ProjectInfo, ProjectSnapshot,
};
use super::scoring::ScoreResult;
use super::sufficiency::{DataSufficiency, SufficiencyReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisConfidence {
    NotReady,
    Low,
    Medium,
    High,
}

impl SynthesisConfidence {
    pub const fn from_tier(tier: DataSufficiency) -> Self {
        match tier {
            DataSufficiency::None => Self::NotReady,
            DataSufficiency::Minimal => Self::Low,
            DataSufficiency::Partial | DataSufficiency::Substantial => Self::Medium,
            DataSufficiency::Complete => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotReady => "Not Ready",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Whether the current data justifies a synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisDecision {
    Request { confidence: SynthesisConfidence },
    InsufficientData,
}

pub fn decide(sufficiency: &SufficiencyReport) -> SynthesisDecision {
    match SynthesisConfidence::from_tier(sufficiency.tier) {
        SynthesisConfidence::NotReady => SynthesisDecision::InsufficientData,
        confidence => SynthesisDecision::Request { confidence },
    }
}

/// Every record of a project grouped by category, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategorySnapshots {
    pub dvf: Vec<PillarAssessment>,
    pub lovability: Vec<EngagementProfile>,
    pub analytics: Vec<ProjectAnalytics>,
    pub competitive: Vec<CompetitiveProfile>,
}

impl CategorySnapshots {
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        let mut records: Vec<_> = snapshot.records.iter().collect();
        records.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let mut grouped = Self::default();
        for record in records {
            match &record.payload {
                AssessmentPayload::Dvf(assessment) => grouped.dvf.push(assessment.clone()),
                AssessmentPayload::Lovability(profile) => grouped.lovability.push(profile.clone()),
                AssessmentPayload::Analytics(analytics) => {
                    grouped.analytics.push(analytics.clone())
                }
                AssessmentPayload::Competitive(profile) => {
                    grouped.competitive.push(profile.clone())
                }
            }
        }
        grouped
    }
}

/// Payload handed to the synthesis collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub project: ProjectInfo,
    pub inventory: DataInventory,
    pub confidence: SynthesisConfidence,
    pub scores: ScoreResult,
    pub categories: CategorySnapshots,
}

impl SynthesisRequest {
    pub fn new(
        snapshot: &ProjectSnapshot,
        scores: ScoreResult,
        confidence: SynthesisConfidence,
    ) -> Self {
        Self {
            project: snapshot.project.clone(),
            inventory: scores.sufficiency.inventory,
            confidence,
            scores,
            categories: CategorySnapshots::from_snapshot(snapshot),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SynthesisOutcome {
    Ready { synthesis: SynthesisBundle },
    /// No records to work from. Add data rather than retrying.
    InsufficientData,
    Unavailable { reason: String, retryable: bool },
}

impl SynthesisOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::InsufficientData => "insufficient_data",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// Result of a synthesis request. Scores are present whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub project_id: ProjectId,
    pub confidence: SynthesisConfidence,
    pub scores: ScoreResult,
    pub outcome: SynthesisOutcome,
}

/// Call the collaborator once, bounded by `timeout`. Failures become an `Unavailable` outcome.
pub async fn request_synthesis<G>(
    gateway: &G,
    request: &SynthesisRequest,
    timeout: Duration,
) -> SynthesisOutcome
where
    G: SynthesisGateway + ?Sized,
{
    info!(
        project = %request.project.id,
        confidence = request.confidence.label(),
        "requesting synthesis"
    );

    let result = match tokio::time::timeout(timeout, gateway.synthesize(request)).await {
        Ok(result) => result,
        Err(_) => Err(SynthesisError::Timeout {
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    };

    match result {
        Ok(SynthesisReply::Bundle(synthesis)) => {
            info!(project = %request.project.id, "synthesis ready");
            SynthesisOutcome::Ready { synthesis }
        }
        Ok(SynthesisReply::InsufficientData) => {
            info!(
                project = %request.project.id,
                "synthesis collaborator reported insufficient data"
            );
            SynthesisOutcome::InsufficientData
        }
        Err(error) => {
            warn!(project = %request.project.id, %error, "synthesis unavailable");
            SynthesisOutcome::Unavailable {
                retryable: error.is_retryable(),
                reason: error.to_string(),
            }
        }
    }
}
