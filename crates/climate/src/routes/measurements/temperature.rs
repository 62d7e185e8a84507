use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use std::sync::Arc;

use crate::{climate::Error, AppState};

pub const START_FALLBACK: &str = "Something went wrong. Try a different start date.";
pub const RANGE_FALLBACK: &str = "Something went wrong. Try a different start and/or end date.";

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First day to include, YYYYMMDD with any separators"),
    ),
    responses(
        (status = OK, description = "[min, avg, max] temperature from start onwards, or a plain text message when the date is invalid or matches nothing", body = [f64]),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations")
    ))]
pub async fn start_date(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Response {
    match state.climate.temperature_summary(&start, None).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => soft_failure(e, START_FALLBACK),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First day to include, YYYYMMDD with any separators"),
        ("end" = String, Path, description = "Last day to include, YYYYMMDD with any separators"),
    ),
    responses(
        (status = OK, description = "[min, avg, max] temperature between start and end inclusive, or a plain text message when a date is invalid or the range matches nothing", body = [f64]),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations")
    ))]
pub async fn start_end_date(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Response {
    match state.climate.temperature_summary(&start, Some(&end)).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => soft_failure(e, RANGE_FALLBACK),
    }
}

// Bad input and empty ranges answer 200 with text, clients rely on this body.
fn soft_failure(err: Error, message: &'static str) -> Response {
    match err {
        Error::InvalidDate(_) | Error::NoMatchingRows => {
            warn!("temperature summary unavailable: {}", err);
            message.into_response()
        }
        other => other.into_response(),
    }
}
