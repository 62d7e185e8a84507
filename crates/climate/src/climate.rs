use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, error, info};
use std::{collections::BTreeMap, sync::Arc};
use time::Date;

use crate::{
    db::{self, most_active, DateRange, ObservationStore, TemperatureSummary},
    dates::{normalize_date_input, year_ago, DateInputError},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No observations have been recorded.")]
    EmptyStore,
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] DateInputError),
    #[error("No observations match the requested dates.")]
    NoMatchingRows,
    #[error("{0}")]
    Store(#[from] db::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::EmptyStore => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Error::InvalidDate(_) | Error::NoMatchingRows => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Store(e) => {
                error!("observation store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Failed to read observations."),
                )
            }
        }
        .into_response()
    }
}

/// Date keyed precipitation. A later row for the same date replaces the earlier one.
pub type PrecipitationByDate = BTreeMap<String, Option<f64>>;

/// Query and derivation layer over the observation store.
pub struct Climate {
    store: Arc<dyn ObservationStore>,
}

impl Climate {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    pub async fn most_recent_date(&self) -> Result<Date, Error> {
        self.store.latest_date().await?.ok_or(Error::EmptyStore)
    }

    /// First day of the trailing 365 day window ending on the most recent observation.
    pub async fn window_start(&self) -> Result<Date, Error> {
        let latest = self.most_recent_date().await?;
        let start = year_ago(latest);
        debug!("trailing window {} .. {}", start, latest);
        Ok(start)
    }

    pub async fn precipitation(&self) -> Result<PrecipitationByDate, Error> {
        let start = self.window_start().await?;
        let readings = self.store.precipitation_since(start).await?;

        let mut by_date = PrecipitationByDate::new();
        for reading in readings {
            by_date.insert(reading.date, reading.precipitation);
        }
        Ok(by_date)
    }

    pub async fn stations(&self) -> Result<Vec<String>, Error> {
        Ok(self.store.station_ids().await?)
    }

    pub async fn most_active_station(&self) -> Result<String, Error> {
        let activity = self.store.station_activity().await?;
        let top = most_active(activity).ok_or(Error::EmptyStore)?;
        info!(
            "most active station {} with {} observations",
            top.station_id, top.observations
        );
        Ok(top.station_id)
    }

    /// Temperatures of the most active station inside the trailing window.
    pub async fn most_active_temperatures(&self) -> Result<Vec<f64>, Error> {
        let station_id = self.most_active_station().await?;
        let start = self.window_start().await?;
        Ok(self.store.station_temperatures(&station_id, start).await?)
    }

    /// `[min, avg, max]` over `start..=end`, or everything from `start` on when `end` is absent.
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureSummary, Error> {
        let start = normalize_date_input(start)?;
        let range = match end {
            Some(end) => DateRange::between(start, normalize_date_input(end)?),
            None => DateRange::since(start),
        };

        self.store
            .temperature_summary(&range)
            .await?
            .ok_or(Error::NoMatchingRows)
    }
}
