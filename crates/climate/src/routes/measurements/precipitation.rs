use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{climate::Error, AppState, PrecipitationByDate};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date over the year leading up to the latest observation", body = std::collections::BTreeMap<String, Option<f64>>),
        (status = SERVICE_UNAVAILABLE, description = "No observations have been recorded"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, Error> {
    let by_date = state.climate.precipitation().await?;
    Ok(Json(by_date))
}
