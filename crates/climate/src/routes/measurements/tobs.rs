use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{climate::Error, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperatures recorded by the most active station over the last year of data", body = Vec<f64>),
        (status = SERVICE_UNAVAILABLE, description = "No observations have been recorded"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations")
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<f64>>, Error> {
    Ok(Json(state.climate.most_active_temperatures().await?))
}
