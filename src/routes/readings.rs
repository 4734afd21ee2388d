//! `POST /readings` – record a measurement from an authenticated sensor.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::debug;

use crate::{ApiError, AuthenticatedSensor, Config, SubmitReading};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new().route("/readings", post(handler))
}

async fn handler(
    State((pool, _config)): State<(PgPool, Config)>,
    AuthenticatedSensor(sensor): AuthenticatedSensor,
    WithRejection(Json(body), _): WithRejection<Json<SubmitReading>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // ---
    let (temperature, humidity, pressure) = require_measurements(&body)?;

    let id = store_reading(&pool, sensor.id, temperature, humidity, pressure)
        .await
        .map_err(ApiError::database("Failed to record sensor reading"))?;

    debug!("Recorded reading {} for sensor {}", id, sensor.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Sensor reading recorded", "id": id })),
    ))
}

/// All three measurements, or a 400 naming what is required.
fn require_measurements(body: &SubmitReading) -> Result<(f64, f64, f64), ApiError> {
    // ---
    match (body.temperature, body.humidity, body.pressure) {
        (Some(temperature), Some(humidity), Some(pressure)) => {
            Ok((temperature, humidity, pressure))
        }
        _ => Err(ApiError::BadRequest(
            "Temperature, humidity, and pressure are required".to_string(),
        )),
    }
}

/// Insert the reading and bump the sensor's `last_seen_at` atomically.
async fn store_reading(
    pool: &PgPool,
    sensor_id: uuid::Uuid,
    temperature: f64,
    humidity: f64,
    pressure: f64,
) -> Result<i64, sqlx::Error> {
    // ---
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO sensor_readings (sensor_id, temperature, humidity, pressure)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(sensor_id)
    .bind(temperature)
    .bind(humidity)
    .bind(pressure)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE sensors SET last_seen_at = NOW() WHERE id = $1")
        .bind(sensor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(id)
}
