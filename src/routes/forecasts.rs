//! `GET /local-forecasts/{sensor_id}` – generate, store and return a forecast.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{forecast, ApiError, Config, LocalForecast};

// ---

const DEFAULT_HOURS_AHEAD: u32 = 1;

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new().route("/local-forecasts/{sensor_id}", get(handler))
}

/// Query parameters for a forecast request.
///
/// Kept as a raw string so an unparsable value is reported with the same
/// message as a non-positive one.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    hours_ahead: Option<String>,
}

async fn handler(
    WithRejection(Path(sensor_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(params), _): WithRejection<Query<ForecastQuery>, ApiError>,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<LocalForecast>, ApiError> {
    // ---
    let hours_ahead = parse_hours_ahead(params.hours_ahead.as_deref())?;
    info!("GET /local-forecasts/{} - hours_ahead={}", sensor_id, hours_ahead);

    let forecast = forecast::generate_forecast(&pool, sensor_id, hours_ahead).await?;
    Ok(Json(forecast))
}

/// Accept a missing or empty value (default 1) or a positive integer.
fn parse_hours_ahead(raw: Option<&str>) -> Result<u32, ApiError> {
    // ---
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(DEFAULT_HOURS_AHEAD);
    }
    match raw.parse::<u32>() {
        Ok(hours) if hours > 0 => Ok(hours),
        _ => Err(ApiError::BadRequest(
            "Invalid hours_ahead parameter. Must be a positive number.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_hours_ahead_defaults_to_one() {
        // ---
        assert_eq!(parse_hours_ahead(None).unwrap(), 1);
        assert_eq!(parse_hours_ahead(Some("")).unwrap(), 1);
        assert_eq!(parse_hours_ahead(Some("  ")).unwrap(), 1);
    }

    #[test]
    fn test_hours_ahead_accepts_positive_integers() {
        // ---
        assert_eq!(parse_hours_ahead(Some("1")).unwrap(), 1);
        assert_eq!(parse_hours_ahead(Some("48")).unwrap(), 48);
        assert_eq!(parse_hours_ahead(Some(" 6 ")).unwrap(), 6);
    }

    #[test]
    fn test_hours_ahead_rejects_everything_else() {
        // ---
        for raw in ["0", "-3", "abc", "1.5", "99999999999"] {
            assert!(
                matches!(parse_hours_ahead(Some(raw)), Err(ApiError::BadRequest(_))),
                "hours_ahead={raw:?} should be rejected"
            );
        }
    }
}
