use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    AssessmentPayload, AssessmentRecord, ItemId, ItemType, ProjectId, ProjectInfo, RecordKey,
};
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{BenchmarkService, BenchmarkServiceError};
use super::synthesis::{SynthesisGateway, SynthesisOutcome};

/// Body accepted when creating or editing a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub payload: AssessmentPayload,
}

/// Router builder exposing project records, scores, and synthesis over HTTP.
pub fn benchmark_router<R, G>(service: Arc<BenchmarkService<R, G>>) -> Router
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    Router::new()
        .route("/api/v1/projects", post(register_handler::<R, G>))
        .route(
            "/api/v1/projects/:project_id/records/:item_id",
            put(record_handler::<R, G>),
        )
        .route(
            "/api/v1/projects/:project_id/records/:item_type/:item_id",
            axum::routing::delete(remove_handler::<R, G>),
        )
        .route(
            "/api/v1/projects/:project_id/scores",
            get(scores_handler::<R, G>),
        )
        .route(
            "/api/v1/projects/:project_id/synthesis",
            post(synthesis_handler::<R, G>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<R, G>(
    State(service): State<Arc<BenchmarkService<R, G>>>,
    axum::Json(project): axum::Json<ProjectInfo>,
) -> Response
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    match service.register_project(project) {
        Ok(project) => (StatusCode::CREATED, axum::Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<R, G>(
    State(service): State<Arc<BenchmarkService<R, G>>>,
    Path((project_id, item_id)): Path<(String, String)>,
    axum::Json(submission): axum::Json<RecordSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    let record = AssessmentRecord::new(
        ProjectId(project_id),
        ItemId(item_id),
        submission.recorded_at.unwrap_or_else(Utc::now),
        submission.payload,
    );

    match service.record(record) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<R, G>(
    State(service): State<Arc<BenchmarkService<R, G>>>,
    Path((project_id, item_type, item_id)): Path<(String, String, String)>,
) -> Response
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    let Some(item_type) = ItemType::parse(&item_type) else {
        let payload = json!({
            "error": format!("unknown item type '{item_type}'"),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let key = RecordKey {
        project_id: ProjectId(project_id),
        item_id: ItemId(item_id),
        item_type,
    };

    match service.remove(&key) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scores_handler<R, G>(
    State(service): State<Arc<BenchmarkService<R, G>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    match service.scores(&ProjectId(project_id)) {
        Ok(scores) => (StatusCode::OK, axum::Json(scores)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn synthesis_handler<R, G>(
    State(service): State<Arc<BenchmarkService<R, G>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    match service.synthesize(&ProjectId(project_id)).await {
        Ok(report) => {
            let status = match report.outcome {
                SynthesisOutcome::Ready { .. } => StatusCode::OK,
                SynthesisOutcome::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
                SynthesisOutcome::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, axum::Json(report)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: BenchmarkServiceError) -> Response {
    let status = match &error {
        BenchmarkServiceError::UnknownProject(_)
        | BenchmarkServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BenchmarkServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        BenchmarkServiceError::InvalidProject(_) | BenchmarkServiceError::InvalidRecord(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BenchmarkServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
