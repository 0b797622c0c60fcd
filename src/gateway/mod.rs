//! HTTP gateway (Axum) over the ingest path and the leaderboard queries.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{
    leaderboard_all_handler, leaderboard_handler, post_event_handler, rank_handler, seed_handler,
};
pub use payload::EventRequest;
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/events", post(post_event_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/leaderboard/all", get(leaderboard_all_handler))
        .route("/rank/{talent_id}", get(rank_handler))
        .route("/seed", get(seed_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn metrics_handler(State(state): State<HandlerState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => GatewayError::NotFound("metrics recorder not installed".to_string()).into_response(),
    }
}
