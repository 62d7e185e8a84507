use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::{str::FromStr, time::Duration};
use time::Date;

use super::{
    DateRange, Error, ObservationStore, PrecipitationReading, StationActivity,
    TemperatureSummary, ISO_DATE,
};

/// Columns the service reads from the `measurement` table.
pub const MEASUREMENT_COLUMNS: [&str; 5] = ["id", "station", "date", "prcp", "tobs"];

/// Layout of the `measurement` table, matching the published hawaii dataset.
pub const MEASUREMENT_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS measurement (
    id INTEGER NOT NULL PRIMARY KEY,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
)";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the observation database read-only; the file is never created or written.
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open observation database: {}", path))?;

        info!("Observation database opened read-only at: {}", path);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check connectivity and that `measurement` has every column we query.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        self.verify_schema()
            .await
            .context("Database schema check failed")?;

        Ok(())
    }

    async fn verify_schema(&self) -> Result<(), Error> {
        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('measurement')")
                .fetch_all(&self.pool)
                .await?;

        let missing: Vec<&str> = MEASUREMENT_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(Error::Schema(missing.join(", ")));
        }
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn latest_date(&self) -> Result<Option<Date>, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        match latest {
            Some(date) => Ok(Some(Date::parse(&date, ISO_DATE)?)),
            None => Ok(None),
        }
    }

    async fn precipitation_since(&self, start: Date) -> Result<Vec<PrecipitationReading>, Error> {
        let start = start.format(ISO_DATE)?;
        let rows = sqlx::query(
            "SELECT DATE(date) AS date, CAST(prcp AS REAL) AS prcp
             FROM measurement WHERE DATE(date) >= ? ORDER BY id",
        )
        .bind(&start)
        .fetch_all(&self.pool)
        .await?;

        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            readings.push(PrecipitationReading {
                date: row.try_get("date")?,
                precipitation: row.try_get("prcp")?,
            });
        }
        debug!("{} precipitation rows since {}", readings.len(), start);

        Ok(readings)
    }

    async fn station_ids(&self) -> Result<Vec<String>, Error> {
        let stations: Vec<String> = sqlx::query_scalar(
            "SELECT station FROM measurement
             WHERE station IS NOT NULL
             GROUP BY station ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    async fn station_activity(&self) -> Result<Vec<StationActivity>, Error> {
        let rows = sqlx::query(
            "SELECT station, COUNT(*) AS observations FROM measurement
             WHERE station IS NOT NULL
             GROUP BY station ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut activity = Vec::with_capacity(rows.len());
        for row in rows {
            activity.push(StationActivity {
                station_id: row.try_get("station")?,
                observations: row.try_get("observations")?,
            });
        }

        Ok(activity)
    }

    async fn station_temperatures(
        &self,
        station_id: &str,
        start: Date,
    ) -> Result<Vec<f64>, Error> {
        let temperatures: Vec<f64> = sqlx::query_scalar(
            "SELECT CAST(tobs AS REAL) FROM measurement
             WHERE DATE(date) >= ? AND station = ? AND tobs IS NOT NULL
             ORDER BY id",
        )
        .bind(start.format(ISO_DATE)?)
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(temperatures)
    }

    async fn temperature_summary(
        &self,
        range: &DateRange,
    ) -> Result<Option<TemperatureSummary>, Error> {
        let mut sql = String::from(
            "SELECT CAST(MIN(tobs) AS REAL) AS min_temp,
                    AVG(tobs) AS avg_temp,
                    CAST(MAX(tobs) AS REAL) AS max_temp
             FROM measurement WHERE DATE(date) >= ?",
        );
        if range.end.is_some() {
            sql.push_str(" AND DATE(date) <= ?");
        }

        let mut query = sqlx::query(&sql).bind(range.start.format(ISO_DATE)?);
        if let Some(end) = range.end {
            query = query.bind(end.format(ISO_DATE)?);
        }
        let row = query.fetch_one(&self.pool).await?;

        let min: Option<f64> = row.try_get("min_temp")?;
        let avg: Option<f64> = row.try_get("avg_temp")?;
        let max: Option<f64> = row.try_get("max_temp")?;

        Ok(match (min, avg, max) {
            (Some(min), Some(avg), Some(max)) => Some(TemperatureSummary { min, avg, max }),
            _ => None,
        })
    }
}
