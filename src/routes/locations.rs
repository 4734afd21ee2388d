//! Sensor placement: sensors report their city, clients look sensors up by it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{ApiError, AuthenticatedSensor, Config, LocatedSensor, SubmitLocation};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new()
        .route("/sensor_locations", post(upsert_location))
        .route("/locations/{location_name}", get(sensors_in_city))
}

async fn upsert_location(
    State((pool, _config)): State<(PgPool, Config)>,
    AuthenticatedSensor(sensor): AuthenticatedSensor,
    WithRejection(Json(body), _): WithRejection<Json<SubmitLocation>, ApiError>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // ---
    let Some(city_name) = body.city_name.filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::BadRequest("city_name is required".to_string()));
    };

    sqlx::query(
        r#"
        INSERT INTO sensor_locations (sensor_id, city_name, country, lat, lon)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (sensor_id) DO UPDATE SET
            city_name  = EXCLUDED.city_name,
            country    = EXCLUDED.country,
            lat        = EXCLUDED.lat,
            lon        = EXCLUDED.lon,
            updated_at = NOW()
        "#,
    )
    .bind(sensor.id)
    .bind(&city_name)
    .bind(&body.country)
    .bind(body.lat)
    .bind(body.lon)
    .execute(&pool)
    .await
    .map_err(ApiError::database("Failed to record sensor location"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Sensor location recorded", "sensor_id": sensor.id })),
    ))
}

async fn sensors_in_city(
    WithRejection(Path(location_name), _): WithRejection<Path<String>, ApiError>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<LocatedSensor>>, ApiError> {
    // ---
    let sensors = sqlx::query_as::<_, LocatedSensor>(
        r#"
        SELECT s.id, s.last_seen_at, sl.city_name, sl.country
        FROM sensors s
        JOIN sensor_locations sl ON s.id = sl.sensor_id
        WHERE sl.city_name = $1
        "#,
    )
    .bind(&location_name)
    .fetch_all(&pool)
    .await
    .map_err(ApiError::database("Failed to retrieve sensors"))?;

    if sensors.is_empty() {
        return Err(ApiError::NotFound(
            "No sensors found for this location".to_string(),
        ));
    }
    Ok(Json(sensors))
}
