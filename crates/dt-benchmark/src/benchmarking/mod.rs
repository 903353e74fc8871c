//! Design-thinking benchmarking: normalizes human-entered metrics, scores the DVF pillars,
//! lovability engagement and competitive position, gates on data sufficiency, and brokers the
//! optional synthesis collaborator.
//!
//! Scores are recomputed from a full project snapshot on every request. Nothing is cached.

pub mod domain;
pub mod import;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod sufficiency;
pub mod synthesis;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentPayload, AssessmentRecord, CompetitiveProfile, DataInventory, EmotionalDistribution,
    EngagementProfile, ItemId, ItemType, MetricInput, PillarAssessment, PillarEvidence,
    ProjectAnalytics, ProjectId, ProjectInfo, ProjectSnapshot, Recommendation, RecordKey,
};
pub use import::{ImportedMetrics, MetricImportError, MetricImporter};
pub use normalizer::{normalize, FieldRange, RawValue};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::{benchmark_router, RecordSubmission};
pub use scoring::{
    BenchmarkEngine, CompetitiveScore, EngagementScore, LovabilityTier, PillarScore, PillarTier,
    ScoreResult, ScoringPolicy,
};
pub use service::{BenchmarkService, BenchmarkServiceError};
pub use sufficiency::{DataSufficiency, SufficiencyReport};
pub use synthesis::{
    HttpSynthesisGateway, OfflineSynthesisGateway, SynthesisBundle, SynthesisConfidence,
    SynthesisError, SynthesisGateway, SynthesisOutcome, SynthesisReply, SynthesisReport,
    SynthesisRequest,
};
