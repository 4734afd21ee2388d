//! Administrative sensor management under `/admin`.

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, Config, Sensor, SensorReading};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new()
        .route("/admin/sensors", get(list_sensors))
        .route("/admin/sensors/{id}", delete(delete_sensor))
        .route("/admin/sensors/{id}/readings", get(sensor_readings))
}

async fn list_sensors(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Sensor>>, ApiError> {
    // ---
    let sensors = sqlx::query_as::<_, Sensor>(
        r#"
        SELECT id, name, location, api_key, created_at, last_seen_at
        FROM sensors
        ORDER BY created_at
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(ApiError::database("Failed to retrieve sensors"))?;

    Ok(Json(sensors))
}

async fn delete_sensor(
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let result = sqlx::query("DELETE FROM sensors WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(ApiError::database("Failed to delete sensor"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Sensor not found".to_string()));
    }

    info!("Deleted sensor {}", id);
    Ok(Json(json!({ "message": "Sensor deleted successfully" })))
}

async fn sensor_readings(
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    // ---
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM sensors WHERE id = $1)")
            .bind(id)
            .fetch_one(&pool)
            .await
            .map_err(ApiError::database("Failed to retrieve sensor readings"))?;

    if !exists {
        return Err(ApiError::NotFound("Sensor not found".to_string()));
    }

    let readings = sqlx::query_as::<_, SensorReading>(
        r#"
        SELECT id, sensor_id, temperature, humidity, pressure, created_at
        FROM sensor_readings
        WHERE sensor_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await
    .map_err(ApiError::database("Failed to retrieve sensor readings"))?;

    Ok(Json(readings))
}
