use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use dt_benchmark::benchmarking::domain::{
    AssessmentPayload, PillarAssessment, ProjectId, ProjectInfo, ProjectSnapshot,
};
use dt_benchmark::benchmarking::scoring::BenchmarkEngine;
use dt_benchmark::benchmarking::synthesis::{
    HttpSynthesisGateway, SynthesisConfidence, SynthesisError, SynthesisGateway, SynthesisReply,
    SynthesisRequest,
};
use serde_json::{json, Value};
use std::time::Duration;

async fn spawn_collaborator(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener binds");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    format!("http://{addr}/synthesize")
}

fn request() -> SynthesisRequest {
    let project = ProjectInfo {
        id: ProjectId("meal-kit".to_string()),
        name: "Meal kit subscription".to_string(),
        description: String::new(),
        industry: None,
        stage: None,
    };
    let snapshot = ProjectSnapshot::new(project).with_record(
        "dvf-1",
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        AssessmentPayload::Dvf(PillarAssessment::new(4.0, 3.5, 2.5)),
    );
    let scores = BenchmarkEngine::default().score(&snapshot);
    SynthesisRequest::new(&snapshot, scores, SynthesisConfidence::Low)
}

fn gateway(endpoint: String) -> HttpSynthesisGateway {
    HttpSynthesisGateway::new(endpoint, Duration::from_secs(2)).expect("client builds")
}

#[tokio::test]
async fn posts_request_and_decodes_bundle() {
    let router = Router::new().route(
        "/synthesize",
        post(|Json(body): Json<Value>| async move {
            let project = body["project"]["name"].as_str().unwrap_or_default().to_string();
            let overall = body["scores"]["pillars"]["overall"].clone();
            Json(json!({
                "status": "ok",
                "synthesis": {
                    "overall_assessment": format!("{project} scored {overall}"),
                    "next_steps": ["Validate pricing"],
                }
            }))
        }),
    );
    let endpoint = spawn_collaborator(router).await;

    let reply = gateway(endpoint)
        .synthesize(&request())
        .await
        .expect("collaborator answers");

    match reply {
        SynthesisReply::Bundle(bundle) => {
            assert_eq!(bundle.overall_assessment, "Meal kit subscription scored 3.3");
            assert_eq!(bundle.next_steps, vec!["Validate pricing".to_string()]);
            assert!(bundle.key_insights.is_empty());
        }
        other => panic!("expected bundle, got {other:?}"),
    }
}

#[tokio::test]
async fn decodes_insufficient_data_reply() {
    let router = Router::new().route(
        "/synthesize",
        post(|| async { Json(json!({ "status": "insufficient_data" })) }),
    );
    let endpoint = spawn_collaborator(router).await;

    let reply = gateway(endpoint)
        .synthesize(&request())
        .await
        .expect("collaborator answers");

    assert_eq!(reply, SynthesisReply::InsufficientData);
}

#[tokio::test]
async fn non_success_status_is_rejected() {
    let router = Router::new().route(
        "/synthesize",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream model offline") }),
    );
    let endpoint = spawn_collaborator(router).await;

    let err = gateway(endpoint)
        .synthesize(&request())
        .await
        .expect_err("request is rejected");

    assert_eq!(err, SynthesisError::Rejected { status: 502 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let router = Router::new().route("/synthesize", post(|| async { "not json" }));
    let endpoint = spawn_collaborator(router).await;

    let err = gateway(endpoint)
        .synthesize(&request())
        .await
        .expect_err("payload is malformed");

    assert!(matches!(err, SynthesisError::MalformedPayload(_)));
}

#[tokio::test]
async fn slow_collaborator_surfaces_as_timeout() {
    let router = Router::new().route(
        "/synthesize",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "status": "insufficient_data" }))
        }),
    );
    let endpoint = spawn_collaborator(router).await;
    let gateway =
        HttpSynthesisGateway::new(endpoint, Duration::from_millis(100)).expect("client builds");

    let err = gateway
        .synthesize(&request())
        .await
        .expect_err("request times out");

    assert_eq!(err, SynthesisError::Timeout { after_ms: 100 });
}

#[tokio::test]
async fn unreachable_collaborator_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener binds");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = gateway(format!("http://{addr}/synthesize"))
        .synthesize(&request())
        .await
        .expect_err("connection is refused");

    assert!(matches!(err, SynthesisError::Transport(_)));
}
