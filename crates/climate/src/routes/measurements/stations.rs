use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{climate::Error, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station that has recorded an observation", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    Ok(Json(state.climate.stations().await?))
}
