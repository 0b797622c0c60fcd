//! Tests for the gateway router: status codes, bodies and query validation.

use axum::{Router, body::Body, body::Bytes, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

use crate::dedup::DedupCacheHandle;
use crate::domain::{Leader, Leaders};
use crate::gateway::create_router_with_state;
use crate::gateway::error::ErrorResponse;
use crate::gateway::payload::SeedResponse;
use crate::gateway::state::HandlerState;
use crate::ingest::EventIngestor;
use crate::leaderboard::LeaderboardHandle;
use crate::metrics::{EventOutcome, RecordingMetrics};
use crate::scoring::{MockScorer, PipelineConfig, ScoredEvent, ScoringPipeline};

struct TestHarness {
    router: Router,
    pipeline: ScoringPipeline,
    scored: mpsc::Receiver<ScoredEvent>,
    leaderboard: LeaderboardHandle,
    metrics: Arc<RecordingMetrics>,
}

fn create_test_harness() -> TestHarness {
    let config = PipelineConfig {
        input_capacity: 64,
        output_capacity: 64,
        workers: 2,
        score_timeout: None,
    };
    let (pipeline, scored) =
        ScoringPipeline::start(config, Arc::new(MockScorer::identity())).unwrap();

    let metrics = Arc::new(RecordingMetrics::new());
    let ingestor = EventIngestor::new(DedupCacheHandle::new(), pipeline.handle(), metrics.clone());
    let leaderboard = LeaderboardHandle::new();
    let router = create_router_with_state(HandlerState::new(ingestor, leaderboard.clone()));

    TestHarness {
        router,
        pipeline,
        scored,
        leaderboard,
        metrics,
    }
}

fn event_json(event_id: &str) -> serde_json::Value {
    serde_json::json!({
        "event_id": event_id,
        "talent_id": "t-042",
        "raw_metric": 57.5,
        "skill": "dribble",
        "ts": "2024-05-01T12:30:00Z"
    })
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let harness = create_test_harness();
    let (status, body) = send(&harness.router, get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_post_event_new_then_duplicate() {
    let mut harness = create_test_harness();
    let body = event_json("6f1c2b9e-4a55-4c1e-9d4b-2f8e7a3c1d00").to_string();

    let (first, _) = send(&harness.router, post_json("/events", body.clone())).await;
    let (second, _) = send(&harness.router, post_json("/events", body)).await;

    assert_eq!(first, StatusCode::ACCEPTED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(harness.metrics.count(EventOutcome::Accepted), 1);
    assert_eq!(harness.metrics.count(EventOutcome::Duplicate), 1);

    let scored = harness.scored.recv().await.unwrap();
    assert_eq!(scored.event().talent_id, "t-042");
    assert_eq!(scored.event().skill, "dribble");
    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_post_event_malformed_is_bad_request() {
    let harness = create_test_harness();

    let cases = [
        ("not json", "{not json".to_string()),
        ("bad uuid", event_json("not-a-uuid").to_string()),
        (
            "missing field",
            serde_json::json!({"event_id": "6f1c2b9e-4a55-4c1e-9d4b-2f8e7a3c1d01"}).to_string(),
        ),
        (
            "bad timestamp",
            serde_json::json!({
                "event_id": "6f1c2b9e-4a55-4c1e-9d4b-2f8e7a3c1d02",
                "talent_id": "t-1",
                "raw_metric": 1.0,
                "skill": "pass",
                "ts": "yesterday"
            })
            .to_string(),
        ),
    ];

    for (name, body) in cases {
        let (status, body) = send(&harness.router, post_json("/events", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, 400, "{name}");
    }

    assert_eq!(harness.metrics.count(EventOutcome::Accepted), 0);
    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_post_event_after_pipeline_shutdown_is_internal_error() {
    let harness = create_test_harness();
    let router = harness.router.clone();
    harness.pipeline.shutdown().await;

    let body = event_json("6f1c2b9e-4a55-4c1e-9d4b-2f8e7a3c1d03").to_string();
    let (status, body) = send(&router, post_json("/events", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.code, 500);
}

#[tokio::test]
async fn test_leaderboard_limits() {
    let harness = create_test_harness();
    for i in 0..20 {
        harness
            .leaderboard
            .update_if_better(&format!("t-{i:03}"), f64::from(i));
    }

    let cases = [
        ("/leaderboard", StatusCode::OK, Some(10)),
        ("/leaderboard?limit=3", StatusCode::OK, Some(3)),
        ("/leaderboard?limit=100", StatusCode::OK, Some(20)),
        ("/leaderboard?limit=0", StatusCode::BAD_REQUEST, None),
        ("/leaderboard?limit=101", StatusCode::BAD_REQUEST, None),
        ("/leaderboard?limit=-5", StatusCode::BAD_REQUEST, None),
        ("/leaderboard?limit=ten", StatusCode::BAD_REQUEST, None),
    ];

    for (uri, want_status, want_len) in cases {
        let (status, body) = send(&harness.router, get(uri)).await;
        assert_eq!(status, want_status, "{uri}");
        if let Some(len) = want_len {
            let leaders: Leaders = serde_json::from_slice(&body).unwrap();
            assert_eq!(leaders.len(), len, "{uri}");
            assert_eq!(leaders[0], Leader::new(1, "t-019", 19.0), "{uri}");
        }
    }

    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_leaderboard_all_is_ascending() {
    let harness = create_test_harness();
    harness.leaderboard.update_if_better("t1", 10.0);
    harness.leaderboard.update_if_better("t2", 30.0);
    harness.leaderboard.update_if_better("t3", 20.0);

    let (status, body) = send(&harness.router, get("/leaderboard/all")).await;
    assert_eq!(status, StatusCode::OK);

    let leaders: Leaders = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        leaders,
        vec![
            Leader::new(1, "t1", 10.0),
            Leader::new(2, "t3", 20.0),
            Leader::new(3, "t2", 30.0),
        ]
    );
    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_rank_known_and_unknown() {
    let harness = create_test_harness();
    harness.leaderboard.update_if_better("t1", 10.0);
    harness.leaderboard.update_if_better("t2", 30.0);

    let (status, body) = send(&harness.router, get("/rank/t1")).await;
    assert_eq!(status, StatusCode::OK);
    let leader: Leader = serde_json::from_slice(&body).unwrap();
    assert_eq!(leader, Leader::new(2, "t1", 10.0));

    let (status, body) = send(&harness.router, get("/rank/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.code, 404);

    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_seed() {
    let mut harness = create_test_harness();

    let (status, body) = send(&harness.router, get("/seed?count=5")).await;
    assert_eq!(status, StatusCode::OK);
    let resp: SeedResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp, SeedResponse { seeded: 5 });

    for _ in 0..5 {
        assert!(harness.scored.recv().await.is_some());
    }

    let (status, body) = send(&harness.router, get("/seed")).await;
    assert_eq!(status, StatusCode::OK);
    let resp: SeedResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.seeded, crate::constants::DEFAULT_SEED_COUNT);

    let over_limit_count = format!("/seed?count={}", crate::constants::MAX_SEED_COUNT + 1);
    for uri in [
        "/seed?count=0",
        "/seed?count=-1",
        "/seed?count=many",
        "/seed?count=9223372036854775807",
        over_limit_count.as_str(),
    ] {
        let (status, _) = send(&harness.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }

    harness.pipeline.shutdown().await;
}

#[tokio::test]
async fn test_seed_count_above_limit_submits_nothing() {
    let mut harness = create_test_harness();

    let (status, body) = send(&harness.router, get("/seed?count=9223372036854775807")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.code, 400);
    assert!(err.error.contains("count"));

    harness.pipeline.shutdown().await;
    assert!(harness.scored.recv().await.is_none());
}

#[tokio::test]
async fn test_metrics_without_recorder_is_not_found() {
    let harness = create_test_harness();
    let (status, _) = send(&harness.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    harness.pipeline.shutdown().await;
}
