pub mod activity;
pub mod sqlite;

pub use activity::most_active;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

/// Canonical on-disk date layout, zero padded so string order is date order.
pub const ISO_DATE: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query observation store: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to parse stored date: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Observation table is missing columns: {0}")]
    Schema(String),
}

/// One row of the `measurement` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station_id: String,
    /// Stored as `YYYY-MM-DD`
    pub date: String,
    /// Precipitation in inches, missing on some days
    pub precipitation: Option<f64>,
    /// Observed temperature in degrees fahrenheit
    pub temperature: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// Number of observations recorded by a single station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StationActivity {
    pub station_id: String,
    pub observations: i64,
}

/// Inclusive date range, open ended when `end` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn since(start: Date) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Temperature aggregate, serialized as `[min, avg, max]`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(into = "[f64; 3]")]
pub struct TemperatureSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl From<TemperatureSummary> for [f64; 3] {
    fn from(summary: TemperatureSummary) -> Self {
        [summary.min, summary.avg, summary.max]
    }
}

/// Read-only access to recorded observations.
///
/// Every method that returns rows yields them in store enumeration order,
/// which for the SQLite store is ascending row id.
#[async_trait]
pub trait ObservationStore: Sync + Send {
    /// Latest observation date, `None` when nothing has been recorded.
    async fn latest_date(&self) -> Result<Option<Date>, Error>;
    async fn precipitation_since(&self, start: Date) -> Result<Vec<PrecipitationReading>, Error>;
    /// Distinct station ids in order of first appearance.
    async fn station_ids(&self) -> Result<Vec<String>, Error>;
    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error>;
    async fn station_temperatures(
        &self,
        station_id: &str,
        start: Date,
    ) -> Result<Vec<f64>, Error>;
    /// `None` when no observation falls inside the range.
    async fn temperature_summary(
        &self,
        range: &DateRange,
    ) -> Result<Option<TemperatureSummary>, Error>;
}
