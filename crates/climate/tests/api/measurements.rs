use crate::helpers::{body_bytes, body_text, spawn_app, MockObservationAccess};
use axum::http::StatusCode;
use climate::{db::Error as StoreError, PrecipitationReading, StationActivity};
use serde_json::from_slice;
use std::{collections::BTreeMap, sync::Arc};
use time::macros::date;

fn reading(date: &str, precipitation: Option<f64>) -> PrecipitationReading {
    PrecipitationReading {
        date: date.to_string(),
        precipitation,
    }
}

fn activity(station_id: &str, observations: i64) -> StationActivity {
    StationActivity {
        station_id: station_id.to_string(),
        observations,
    }
}

#[tokio::test]
async fn index_lists_available_routes() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    let response = test_app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Available Routes:"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/start/end"));
}

#[tokio::test]
async fn precipitation_covers_trailing_year_and_last_row_wins() {
    let mut store = MockObservationAccess::new();
    store
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(Some(date!(2017 - 08 - 23))));
    store
        .expect_precipitation_since()
        .withf(|start| *start == date!(2016 - 08 - 23))
        .times(1)
        .returning(|_| {
            Ok(vec![
                reading("2016-08-23", Some(0.0)),
                reading("2016-08-24", None),
                reading("2016-08-23", Some(1.79)),
                reading("2017-08-23", Some(0.45)),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(response.status(), StatusCode::OK);

    let by_date: BTreeMap<String, Option<f64>> = from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(by_date.len(), 3);
    assert_eq!(by_date["2016-08-23"], Some(1.79));
    assert_eq!(by_date["2016-08-24"], None);
    assert_eq!(by_date["2017-08-23"], Some(0.45));
}

#[tokio::test]
async fn precipitation_on_empty_store_is_unavailable() {
    let mut store = MockObservationAccess::new();
    store.expect_latest_date().times(1).returning(|| Ok(None));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "No observations have been recorded.");
}

#[tokio::test]
async fn stations_are_returned_in_store_order() {
    let mut store = MockObservationAccess::new();
    store.expect_station_ids().times(1).returning(|| {
        Ok(vec![
            String::from("USC00519397"),
            String::from("USC00513117"),
            String::from("USC00514830"),
        ])
    });

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/stations").await;
    assert_eq!(response.status(), StatusCode::OK);

    let stations: Vec<String> = from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stations, ["USC00519397", "USC00513117", "USC00514830"]);
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let mut store = MockObservationAccess::new();
    store
        .expect_station_ids()
        .times(1)
        .returning(|| Err(StoreError::Schema(String::from("station"))));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/stations").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to read observations.");
}

#[tokio::test]
async fn tobs_uses_most_active_station_within_window() {
    let mut store = MockObservationAccess::new();
    store.expect_station_activity().times(1).returning(|| {
        Ok(vec![
            activity("USC00519397", 2724),
            activity("USC00519281", 2772),
            activity("USC00513117", 2772),
        ])
    });
    store
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(Some(date!(2017 - 08 - 23))));
    store
        .expect_station_temperatures()
        .withf(|station_id, start| station_id == "USC00513117" && *start == date!(2016 - 08 - 23))
        .times(1)
        .returning(|_, _| Ok(vec![77.0, 76.0, 80.0]));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(response.status(), StatusCode::OK);

    let temperatures: Vec<f64> = from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(temperatures, vec![77.0, 76.0, 80.0]);
}

#[tokio::test]
async fn tobs_on_empty_store_is_unavailable() {
    let mut store = MockObservationAccess::new();
    store
        .expect_station_activity()
        .times(1)
        .returning(|| Ok(vec![]));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/tobs").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn docs_are_served() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    let response = test_app.get("/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
}
