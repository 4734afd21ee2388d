//! Per-sensor API-key authentication.
//!
//! Sensors authenticate with the `x-api-key` header issued at registration.
//! Handlers take [`AuthenticatedSensor`] as an argument to require it.

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiError, Config, Sensor};

// ---

pub const API_KEY_HEADER: &str = "x-api-key";

/// The sensor owning the API key presented with the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedSensor(pub Sensor);

impl FromRequestParts<(PgPool, Config)> for AuthenticatedSensor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        (pool, _config): &(PgPool, Config),
    ) -> Result<Self, Self::Rejection> {
        // ---
        let Some(header) = parts.headers.get(API_KEY_HEADER) else {
            return Err(ApiError::Unauthorized("API Key is required".to_string()));
        };

        // Keys are UUIDs; anything else cannot match a stored key.
        let Some(api_key) = header
            .to_str()
            .ok()
            .and_then(|key| Uuid::parse_str(key.trim()).ok())
        else {
            debug!("Rejecting malformed API key");
            return Err(ApiError::Forbidden("Invalid API Key".to_string()));
        };

        let sensor = sqlx::query_as::<_, Sensor>(
            r#"
            SELECT id, name, location, api_key, created_at, last_seen_at
            FROM sensors
            WHERE api_key = $1
            "#,
        )
        .bind(api_key)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::database("Internal server error"))?;

        sensor
            .map(AuthenticatedSensor)
            .ok_or_else(|| ApiError::Forbidden("Invalid API Key".to_string()))
    }
}
