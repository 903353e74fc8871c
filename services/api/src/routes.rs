use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use dt_benchmark::benchmarking::domain::ProjectInfo;
use dt_benchmark::benchmarking::import::MetricImporter;
use dt_benchmark::benchmarking::repository::AssessmentRepository;
use dt_benchmark::benchmarking::router::benchmark_router;
use dt_benchmark::benchmarking::scoring::ScoreResult;
use dt_benchmark::benchmarking::service::BenchmarkService;
use dt_benchmark::benchmarking::synthesis::SynthesisGateway;
use dt_benchmark::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// One-off scoring of a metric export without storing anything.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) project: ProjectInfo,
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) recorded_at: Option<DateTime<Utc>>,
}

pub(crate) fn with_benchmark_routes<R, G>(service: Arc<BenchmarkService<R, G>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
    G: SynthesisGateway + 'static,
{
    benchmark_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/benchmark/preview",
            axum::routing::post(preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    let PreviewRequest {
        project,
        csv,
        recorded_at,
    } = payload;

    let imported = MetricImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let snapshot = imported.into_snapshot(project, recorded_at.unwrap_or_else(Utc::now));

    Ok(Json(state.engine.score(&snapshot)))
}
