use super::domain::{AssessmentRecord, ProjectId, ProjectInfo, ProjectSnapshot, RecordKey};

/// Storage abstraction for projects and their assessment records.
///
/// Implementations hand back full snapshots; the engine never works from partial deltas.
pub trait AssessmentRepository: Send + Sync {
    fn register_project(&self, project: ProjectInfo) -> Result<ProjectInfo, RepositoryError>;
    fn project(&self, id: &ProjectId) -> Result<Option<ProjectInfo>, RepositoryError>;
    /// Insert or replace the record stored under the same key.
    fn upsert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    /// Returns whether a record was removed.
    fn remove(&self, key: &RecordKey) -> Result<bool, RepositoryError>;
    fn snapshot(&self, id: &ProjectId) -> Result<Option<ProjectSnapshot>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
