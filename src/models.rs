//! Data models for sensors, their readings, locations and forecasts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// A registered sensor, including its API key.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sensor {
    // ---
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub api_key: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// One stored measurement. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SensorReading {
    // ---
    pub id: i64,
    pub sensor_id: Uuid,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Atmospheric pressure, hPa.
    pub pressure: f64,
    pub created_at: DateTime<Utc>,
}

/// Geographic placement of a sensor (one per sensor).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocatedSensor {
    // ---
    pub id: Uuid,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub city_name: String,
    pub country: Option<String>,
}

/// Request body for `POST /sensors`.
#[derive(Debug, Deserialize)]
pub struct RegisterSensor {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Request body for `POST /readings`.
///
/// Fields are optional so that a missing value is reported as a 400 with a
/// readable message instead of a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

/// Request body for `POST /sensor_locations`.
#[derive(Debug, Deserialize)]
pub struct SubmitLocation {
    pub city_name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A forecast row as handed to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewForecast {
    // ---
    pub sensor_id: Uuid,
    pub forecast_time: DateTime<Utc>,
    pub predicted_temp: f64,
    pub predicted_humidity: f64,
    pub predicted_pressure: f64,
}

/// A persisted forecast as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalForecast {
    // ---
    pub id: i64,
    pub sensor_id: Uuid,
    pub forecast_time: DateTime<Utc>,
    pub hours_ahead: u32,
    pub predicted_temp: f64,
    pub predicted_humidity: f64,
    pub predicted_pressure: f64,
    pub note: &'static str,
}

impl LocalForecast {
    // ---
    pub fn from_stored(id: i64, stored: NewForecast, hours_ahead: u32, note: &'static str) -> Self {
        // ---
        LocalForecast {
            id,
            sensor_id: stored.sensor_id,
            forecast_time: stored.forecast_time,
            hours_ahead,
            predicted_temp: stored.predicted_temp,
            predicted_humidity: stored.predicted_humidity,
            predicted_pressure: stored.predicted_pressure,
            note,
        }
    }
}
