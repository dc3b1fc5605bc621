use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, UrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

pub async fn shorten_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let Json(request) = request.map_err(|e| {
        warn!(error = %e, "Failed to decode request");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let response = state.shortener().create_short_url(&request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let record = state.shortener().redirect(&short_code).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, record.original_url)],
    )
        .into_response())
}
