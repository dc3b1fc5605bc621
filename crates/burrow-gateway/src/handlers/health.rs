use crate::error::{AppError, Result};
use crate::model::ReadyResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use jiff::Timestamp;

/// Liveness: the process is up.
pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn ready_handler(State(state): State<AppState>) -> Result<Json<ReadyResponse>> {
    let report = state
        .shortener()
        .health()
        .await
        .map_err(AppError::NotReady)?;

    Ok(Json(ReadyResponse {
        status: "ready",
        cache: report.cache,
        timestamp: Timestamp::now(),
    }))
}
