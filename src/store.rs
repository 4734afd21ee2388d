//! Storage seam used by the forecast engine.
//!
//! The engine only ever needs two queries: the latest readings of a sensor and
//! one insert for the derived forecast. Putting them behind [`ForecastStore`]
//! lets the engine run against PostgreSQL in the service and against an
//! in-memory table in tests.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewForecast, SensorReading};

// ---

#[async_trait]
pub trait ForecastStore: Send + Sync {
    // ---
    /// Up to `limit` most recent readings of `sensor_id`, newest first.
    /// Returns an empty vector for unknown sensors.
    async fn fetch_recent_readings(
        &self,
        sensor_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SensorReading>, sqlx::Error>;

    /// Append one forecast row and return its assigned id.
    async fn insert_forecast(&self, forecast: &NewForecast) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl ForecastStore for PgPool {
    // ---
    async fn fetch_recent_readings(
        &self,
        sensor_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, sensor_id, temperature, humidity, pressure, created_at
            FROM sensor_readings
            WHERE sensor_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(sensor_id)
        .bind(limit)
        .fetch_all(self)
        .await
    }

    async fn insert_forecast(&self, forecast: &NewForecast) -> Result<i64, sqlx::Error> {
        // ---
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO local_forecasts (
                sensor_id, forecast_time,
                predicted_temp, predicted_humidity, predicted_pressure
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(forecast.sensor_id)
        .bind(forecast.forecast_time)
        .bind(forecast.predicted_temp)
        .bind(forecast.predicted_humidity)
        .bind(forecast.predicted_pressure)
        .fetch_one(self)
        .await
    }
}
