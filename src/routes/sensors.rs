//! `POST /sensors` – register a sensor and issue its API key.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, Config, RegisterSensor};

// ---

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new().route("/sensors", post(handler))
}

#[derive(Debug, Serialize)]
struct RegisteredSensor {
    id: Uuid,
    name: String,
    location: String,
    api_key: Uuid,
}

async fn handler(
    State((pool, _config)): State<(PgPool, Config)>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterSensor>, ApiError>,
) -> Result<(StatusCode, Json<RegisteredSensor>), ApiError> {
    // ---
    let (Some(name), Some(location)) = (non_blank(body.name), non_blank(body.location)) else {
        return Err(ApiError::BadRequest(
            "Name and location are required".to_string(),
        ));
    };

    let sensor = RegisteredSensor {
        id: Uuid::new_v4(),
        name,
        location,
        api_key: Uuid::new_v4(),
    };

    sqlx::query(
        r#"
        INSERT INTO sensors (id, name, location, api_key)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(sensor.id)
    .bind(&sensor.name)
    .bind(&sensor.location)
    .bind(sensor.api_key)
    .execute(&pool)
    .await
    .map_err(ApiError::database("Failed to register sensor"))?;

    info!("Registered sensor {} ({})", sensor.id, sensor.name);
    Ok((StatusCode::CREATED, Json(sensor)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
