use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::benchmarking::domain::{
    AssessmentPayload, AssessmentRecord, CompetitiveProfile, EmotionalDistribution,
    EngagementProfile, ItemId, PillarAssessment, ProjectAnalytics, ProjectId, ProjectInfo,
    ProjectSnapshot, RecordKey,
};
use crate::benchmarking::repository::{AssessmentRepository, RepositoryError};
use crate::benchmarking::scoring::ScoringPolicy;
use crate::benchmarking::service::BenchmarkService;
use crate::benchmarking::synthesis::{
    SynthesisBundle, SynthesisError, SynthesisGateway, SynthesisReply, SynthesisRequest,
};

pub(super) const PROJECT: &str = "onboarding-redesign";

pub(super) fn project_id() -> ProjectId {
    ProjectId(PROJECT.to_string())
}

pub(super) fn project() -> ProjectInfo {
    ProjectInfo {
        id: project_id(),
        name: "Onboarding redesign".to_string(),
        description: "Guided first-run flow for new workspaces".to_string(),
        industry: Some("SaaS".to_string()),
        stage: Some("prototype".to_string()),
    }
}

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn scenario_a_pillars() -> PillarAssessment {
    PillarAssessment::new(4.5, 3.0, 4.0)
}

pub(super) fn scenario_b_profile() -> EngagementProfile {
    EngagementProfile {
        nps: 50.0,
        satisfaction: 8.0,
        retention_rate: 70.0,
        engagement_time: 40.0,
        emotional_distribution: EmotionalDistribution {
            delight: 60.0,
            satisfaction: 20.0,
            neutral: 10.0,
            frustration: 10.0,
        },
        completion_rate: 90.0,
        error_rate: 5.0,
        support_tickets: 2,
        testing_sessions: 6,
    }
}

pub(super) fn competitive_profile() -> CompetitiveProfile {
    CompetitiveProfile {
        feature_ratings: BTreeMap::from([
            ("Guided setup".to_string(), 4.0),
            ("Integrations".to_string(), 3.0),
        ]),
        advantages: vec![
            "Fastest time to first value".to_string(),
            "Inline help".to_string(),
        ],
        disadvantages: vec!["No SSO yet".to_string()],
    }
}

pub(super) fn analytics() -> ProjectAnalytics {
    ProjectAnalytics {
        period: "2024-Q1".to_string(),
        metrics: Vec::new(),
    }
}

pub(super) fn record(item_id: &str, day: u32, payload: AssessmentPayload) -> AssessmentRecord {
    AssessmentRecord::new(project_id(), ItemId(item_id.to_string()), at(day), payload)
}

pub(super) fn bundle() -> SynthesisBundle {
    SynthesisBundle {
        overall_assessment: "Strong desirability with a clear feasibility path".to_string(),
        key_insights: vec!["Delight is concentrated in the setup wizard".to_string()],
        actionable_recommendations: vec!["Ship SSO before the pilot".to_string()],
        competitive_advantages: vec!["Time to first value".to_string()],
        improvement_areas: vec!["Integrations depth".to_string()],
        next_steps: vec!["Run five more moderated sessions".to_string()],
    }
}

pub(super) fn build_service<G>(
    gateway: G,
) -> (
    BenchmarkService<MemoryRepository, G>,
    Arc<MemoryRepository>,
    Arc<G>,
)
where
    G: SynthesisGateway + 'static,
{
    let repository = Arc::new(MemoryRepository::default());
    let gateway = Arc::new(gateway);
    let service =
        BenchmarkService::new(repository.clone(), gateway.clone(), ScoringPolicy::default());
    service
        .register_project(project())
        .expect("project registers");
    (service, repository, gateway)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    projects: Arc<Mutex<HashMap<ProjectId, ProjectInfo>>>,
    records: Arc<Mutex<BTreeMap<RecordKey, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn register_project(&self, project: ProjectInfo) -> Result<ProjectInfo, RepositoryError> {
        let mut guard = self.projects.lock().expect("repository mutex poisoned");
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn project(&self, id: &ProjectId) -> Result<Option<ProjectInfo>, RepositoryError> {
        let guard = self.projects.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.key(), record.clone());
        Ok(record)
    }

    fn remove(&self, key: &RecordKey) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(key).is_some())
    }

    fn snapshot(&self, id: &ProjectId) -> Result<Option<ProjectSnapshot>, RepositoryError> {
        let Some(project) = self.project(id)? else {
            return Ok(None);
        };
        let guard = self.records.lock().expect("repository mutex poisoned");
        let records = guard
            .values()
            .filter(|record| &record.project_id == id)
            .cloned()
            .collect();
        Ok(Some(ProjectSnapshot { project, records }))
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn register_project(&self, _project: ProjectInfo) -> Result<ProjectInfo, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn project(&self, _id: &ProjectId) -> Result<Option<ProjectInfo>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _key: &RecordKey) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn snapshot(&self, _id: &ProjectId) -> Result<Option<ProjectSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Gateway double that records every request and answers with a fixed reply.
pub(super) struct RecordingGateway {
    reply: Result<SynthesisReply, SynthesisError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl RecordingGateway {
    pub(super) fn replying(reply: SynthesisReply) -> Self {
        Self::with_result(Ok(reply))
    }

    pub(super) fn failing(error: SynthesisError) -> Self {
        Self::with_result(Err(error))
    }

    pub(super) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(SynthesisReply::Bundle(bundle()))
        }
    }

    fn with_result(reply: Result<SynthesisReply, SynthesisError>) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl SynthesisGateway for RecordingGateway {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisReply, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
