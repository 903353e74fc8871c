use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::domain::{AssessmentRecord, ProjectId, ProjectInfo, ProjectSnapshot, RecordKey};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{BenchmarkEngine, ScoreResult, ScoringPolicy};
use super::synthesis::{
    self, SynthesisConfidence, SynthesisDecision, SynthesisGateway, SynthesisOutcome,
    SynthesisReport, SynthesisRequest,
};

/// Default bound on a single synthesis call.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(15);

/// Service composing the record store, the scoring engine, and the synthesis collaborator.
pub struct BenchmarkService<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
    engine: Arc<BenchmarkEngine>,
    synthesis_timeout: Duration,
}

impl<R, G> BenchmarkService<R, G>
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>, policy: ScoringPolicy) -> Self {
        Self {
            repository,
            gateway,
            engine: Arc::new(BenchmarkEngine::new(policy)),
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    pub fn engine(&self) -> &BenchmarkEngine {
        &self.engine
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn register_project(
        &self,
        project: ProjectInfo,
    ) -> Result<ProjectInfo, BenchmarkServiceError> {
        if project.id.0.trim().is_empty() {
            return Err(BenchmarkServiceError::InvalidProject(
                "project id must not be blank".to_string(),
            ));
        }
        let stored = self.repository.register_project(project)?;
        info!(project = %stored.id, "registered project");
        Ok(stored)
    }

    /// Store a record as entered. Inputs are kept verbatim; clamping happens at scoring time.
    pub fn record(
        &self,
        record: AssessmentRecord,
    ) -> Result<AssessmentRecord, BenchmarkServiceError> {
        self.require_project(&record.project_id)?;
        if record.item_id.0.trim().is_empty() {
            return Err(BenchmarkServiceError::InvalidRecord(
                "item id must not be blank".to_string(),
            ));
        }
        let stored = self.repository.upsert(record)?;
        Ok(stored)
    }

    pub fn remove(&self, key: &RecordKey) -> Result<(), BenchmarkServiceError> {
        self.require_project(&key.project_id)?;
        if self.repository.remove(key)? {
            Ok(())
        } else {
            Err(BenchmarkServiceError::Repository(RepositoryError::NotFound))
        }
    }

    /// Scores computed from the project's records as they are right now.
    pub fn scores(&self, project_id: &ProjectId) -> Result<ScoreResult, BenchmarkServiceError> {
        let snapshot = self.snapshot(project_id)?;
        Ok(self.engine.score(&snapshot))
    }

    /// Request a synthesis if the current data supports one.
    ///
    /// An empty project short-circuits to `InsufficientData` without calling the collaborator.
    /// Collaborator failures surface as `Unavailable` next to fully computed scores.
    pub async fn synthesize(
        &self,
        project_id: &ProjectId,
    ) -> Result<SynthesisReport, BenchmarkServiceError> {
        let snapshot = self.snapshot(project_id)?;
        let scores = self.engine.score(&snapshot);

        let (confidence, outcome) = match synthesis::decide(&scores.sufficiency) {
            SynthesisDecision::InsufficientData => {
                info!(project = %project_id, "synthesis skipped: no recorded data");
                (
                    SynthesisConfidence::NotReady,
                    SynthesisOutcome::InsufficientData,
                )
            }
            SynthesisDecision::Request { confidence } => {
                let request = SynthesisRequest::new(&snapshot, scores.clone(), confidence);
                let outcome = synthesis::request_synthesis(
                    self.gateway.as_ref(),
                    &request,
                    self.synthesis_timeout,
                )
                .await;
                (confidence, outcome)
            }
        };

        Ok(SynthesisReport {
            project_id: project_id.clone(),
            confidence,
            scores,
            outcome,
        })
    }

    fn snapshot(&self, project_id: &ProjectId) -> Result<ProjectSnapshot, BenchmarkServiceError> {
        self.repository
            .snapshot(project_id)?
            .ok_or_else(|| BenchmarkServiceError::UnknownProject(project_id.clone()))
    }

    fn require_project(&self, project_id: &ProjectId) -> Result<(), BenchmarkServiceError> {
        match self.repository.project(project_id)? {
            Some(_) => Ok(()),
            None => Err(BenchmarkServiceError::UnknownProject(project_id.clone())),
        }
    }
}

/// Error raised by the benchmark service.
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkServiceError {
    #[error("unknown project '{0}'")]
    UnknownProject(ProjectId),
    #[error("invalid project: {0}")]
    InvalidProject(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
