use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, instrument};

use crate::constants::{DEFAULT_SEED_COUNT, DEFAULT_TOP_LIMIT, MAX_SEED_COUNT, MAX_TOP_LIMIT};
use crate::domain::{Event, Leader, Leaders};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{EventRequest, LimitQuery, SeedQuery, SeedResponse};
use crate::gateway::state::HandlerState;

#[instrument(skip(state, request))]
pub async fn post_event_handler(
    State(state): State<HandlerState>,
    request: Result<Json<EventRequest>, JsonRejection>,
) -> Result<StatusCode, GatewayError> {
    let Json(request) = request?;
    let event = Event::from(request);

    let admission = state.ingestor.admit(event).await.map_err(|e| {
        error!(error = %e, "failed to admit event");
        GatewayError::from(e)
    })?;

    if admission.duplicate {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::ACCEPTED)
    }
}

#[instrument(skip(state, query))]
pub async fn leaderboard_handler(
    State(state): State<HandlerState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Leaders>, GatewayError> {
    let Query(query) = query?;
    let limit = match query.limit {
        None => DEFAULT_TOP_LIMIT,
        Some(n) if (1..=MAX_TOP_LIMIT as i64).contains(&n) => n as usize,
        Some(_) => {
            return Err(GatewayError::InvalidRequest(format!(
                "limit must be 1..{MAX_TOP_LIMIT}"
            )));
        }
    };

    Ok(Json(state.leaderboard.top_n(limit)))
}

#[instrument(skip(state))]
pub async fn leaderboard_all_handler(State(state): State<HandlerState>) -> Json<Leaders> {
    Json(state.leaderboard.all())
}

#[instrument(skip(state))]
pub async fn rank_handler(
    State(state): State<HandlerState>,
    Path(talent_id): Path<String>,
) -> Result<Json<Leader>, GatewayError> {
    state
        .leaderboard
        .rank_of(&talent_id)
        .map(Json)
        .ok_or_else(|| GatewayError::NotFound(format!("talent {talent_id} is not ranked")))
}

#[instrument(skip(state, query))]
pub async fn seed_handler(
    State(state): State<HandlerState>,
    query: Result<Query<SeedQuery>, QueryRejection>,
) -> Result<Response, GatewayError> {
    let Query(query) = query?;
    let count = match query.count {
        None => DEFAULT_SEED_COUNT,
        Some(n) if (1..=MAX_SEED_COUNT as i64).contains(&n) => n as usize,
        Some(_) => {
            return Err(GatewayError::InvalidRequest(format!(
                "count must be 1..{MAX_SEED_COUNT}"
            )));
        }
    };

    let seeded = state.ingestor.seed(count).await?;
    debug!(seeded, "seeded events");

    Ok((StatusCode::OK, Json(SeedResponse { seeded })).into_response())
}
