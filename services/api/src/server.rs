use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_benchmark_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dt_benchmark::benchmarking::scoring::BenchmarkEngine;
use dt_benchmark::config::AppConfig;
use dt_benchmark::error::AppError;
use dt_benchmark::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(BenchmarkEngine::new(config.scoring.clone())),
    };

    let service = Arc::new(build_service(config.scoring.clone(), &config.synthesis));
    info!(
        synthesis = service.gateway().describe(),
        timeout_ms = config.synthesis.timeout_ms,
        "synthesis collaborator configured"
    );

    let app = with_benchmark_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "benchmark service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
