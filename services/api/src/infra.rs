use async_trait::async_trait;
use dt_benchmark::benchmarking::domain::{
    AssessmentRecord, ProjectId, ProjectInfo, ProjectSnapshot, RecordKey,
};
use dt_benchmark::benchmarking::repository::{AssessmentRepository, RepositoryError};
use dt_benchmark::benchmarking::scoring::{BenchmarkEngine, ScoringPolicy};
use dt_benchmark::benchmarking::service::BenchmarkService;
use dt_benchmark::benchmarking::synthesis::{
    HttpSynthesisGateway, OfflineSynthesisGateway, SynthesisError, SynthesisGateway,
    SynthesisReply, SynthesisRequest,
};
use dt_benchmark::config::SynthesisConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub(crate) type AppService = BenchmarkService<InMemoryAssessmentRepository, ConfiguredGateway>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Scores ad-hoc previews with the same policy as the project routes.
    pub(crate) engine: Arc<BenchmarkEngine>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    projects: Arc<Mutex<HashMap<ProjectId, ProjectInfo>>>,
    records: Arc<Mutex<BTreeMap<RecordKey, AssessmentRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn register_project(&self, project: ProjectInfo) -> Result<ProjectInfo, RepositoryError> {
        let mut guard = lock(&self.projects)?;
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn project(&self, id: &ProjectId) -> Result<Option<ProjectInfo>, RepositoryError> {
        Ok(lock(&self.projects)?.get(id).cloned())
    }

    fn upsert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        guard.insert(record.key(), record.clone());
        Ok(record)
    }

    fn remove(&self, key: &RecordKey) -> Result<bool, RepositoryError> {
        Ok(lock(&self.records)?.remove(key).is_some())
    }

    fn snapshot(&self, id: &ProjectId) -> Result<Option<ProjectSnapshot>, RepositoryError> {
        let Some(project) = self.project(id)? else {
            return Ok(None);
        };
        let records = lock(&self.records)?
            .values()
            .filter(|record| &record.project_id == id)
            .cloned()
            .collect();
        Ok(Some(ProjectSnapshot { project, records }))
    }
}

/// Synthesis collaborator picked at startup from `SYNTHESIS_ENDPOINT`.
pub(crate) enum ConfiguredGateway {
    Http(HttpSynthesisGateway),
    Offline(OfflineSynthesisGateway),
}

impl ConfiguredGateway {
    pub(crate) fn from_config(config: &SynthesisConfig) -> Self {
        let Some(endpoint) = config.endpoint.as_deref() else {
            return Self::Offline(OfflineSynthesisGateway);
        };

        match HttpSynthesisGateway::new(endpoint, config.timeout()) {
            Ok(gateway) => Self::Http(gateway),
            Err(err) => {
                warn!(%endpoint, error = %err, "synthesis client unavailable; running offline");
                Self::Offline(OfflineSynthesisGateway)
            }
        }
    }

    pub(crate) fn describe(&self) -> &str {
        match self {
            Self::Http(gateway) => gateway.endpoint(),
            Self::Offline(_) => "offline",
        }
    }
}

#[async_trait]
impl SynthesisGateway for ConfiguredGateway {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisReply, SynthesisError> {
        match self {
            Self::Http(gateway) => gateway.synthesize(request).await,
            Self::Offline(gateway) => gateway.synthesize(request).await,
        }
    }
}

pub(crate) fn build_service(policy: ScoringPolicy, synthesis: &SynthesisConfig) -> AppService {
    BenchmarkService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(ConfiguredGateway::from_config(synthesis)),
        policy,
    )
    .with_synthesis_timeout(synthesis.timeout())
}
