use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use climate::{
    app, app_state,
    db::{sqlite::MEASUREMENT_SCHEMA, Error as StoreError},
    DateRange, Observation, ObservationStore, PrecipitationReading, SqliteStore,
    StationActivity, TemperatureSummary,
};
use hyper::{header, Method};
use mockall::mock;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};
use time::Date;
use tower::ServiceExt;

mock! {
    pub ObservationAccess {}

    #[async_trait]
    impl ObservationStore for ObservationAccess {
        async fn latest_date(&self) -> Result<Option<Date>, StoreError>;
        async fn precipitation_since(&self, start: Date) -> Result<Vec<PrecipitationReading>, StoreError>;
        async fn station_ids(&self) -> Result<Vec<String>, StoreError>;
        async fn station_activity(&self) -> Result<Vec<StationActivity>, StoreError>;
        async fn station_temperatures(&self, station_id: &str, start: Date) -> Result<Vec<f64>, StoreError>;
        async fn temperature_summary(&self, range: &DateRange) -> Result<Option<TemperatureSummary>, StoreError>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(store: Arc<dyn ObservationStore>) -> TestApp {
    TestApp {
        app: app(app_state(store)),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn observation(station_id: &str, date: &str, precipitation: Option<f64>, temperature: f64) -> Observation {
    Observation {
        station_id: station_id.to_string(),
        date: date.to_string(),
        precipitation,
        temperature,
    }
}

/// In-memory database seeded in the given order, so row ids follow the slice.
/// A single connection that never expires keeps the in-memory data alive.
pub async fn seeded_store(observations: &[Observation]) -> SqliteStore {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::query(MEASUREMENT_SCHEMA).execute(&pool).await.unwrap();

    for obs in observations {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(&obs.station_id)
            .bind(&obs.date)
            .bind(obs.precipitation)
            .bind(obs.temperature)
            .execute(&pool)
            .await
            .unwrap();
    }

    SqliteStore::from_pool(pool)
}
