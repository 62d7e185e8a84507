use crate::{
    climate::Climate, db::ObservationStore, index_handler, precipitation, routes, start_date,
    start_end_date, stations, tobs, SqliteStore,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use climate_core::is_file;
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared by every handler. The store behind `climate` is `Send + Sync`
/// and pooled, so requests never contend on a single connection.
#[derive(Clone)]
pub struct AppState {
    pub climate: Arc<Climate>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::measurements::precipitation::precipitation,
        routes::measurements::stations::stations,
        routes::measurements::tobs::tobs,
        routes::measurements::temperature::start_date,
        routes::measurements::temperature::start_end_date,
    ),
    tags(
        (name = "climate api", description = "a read-only api over weather station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    database: String,
    max_connections: u32,
) -> Result<AppState, anyhow::Error> {
    if !is_file(&database) {
        return Err(anyhow!("observation database not found: {}", database));
    }

    let store = SqliteStore::new(&database, max_connections).await?;
    store.health_check().await?;

    Ok(app_state(Arc::new(store)))
}

pub fn app_state(store: Arc<dyn ObservationStore>) -> AppState {
    AppState {
        climate: Arc::new(Climate::new(store)),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(start_date))
        .route("/api/v1.0/{start}/{end}", get(start_end_date))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
