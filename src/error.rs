//! HTTP-facing error type.
//!
//! Every handler failure is rendered as `{"error": "<message>"}` with the
//! matching status code. Database details are logged, never returned.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::forecast::ForecastError;

// ---

#[derive(Error, Debug)]
pub enum ApiError {
    // ---
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// An extractor refused the request (bad path segment, query or body).
    #[error("Rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    /// `context` is what the client sees; `source` only goes to the log.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    // ---
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
        move |source| ApiError::Database { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Rejected { status, message } => (status, message),
            ApiError::Database { context, source } => {
                tracing::error!("{}: {}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Extractor rejections keep axum's status and text but use the JSON error body.
macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        // ---
        match err {
            ForecastError::InsufficientData { .. } | ForecastError::DegenerateWindow => {
                ApiError::NotFound(
                    "Not enough data to generate a local forecast. At least 2 readings are required."
                        .to_string(),
                )
            }
            ForecastError::HorizonOutOfRange(hours) => {
                ApiError::BadRequest(format!("hours_ahead={hours} is too far in the future"))
            }
            ForecastError::Storage(source) => ApiError::Database {
                context: "Failed to generate local forecast",
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_forecast_errors_map_to_status() {
        // ---
        let cases = [
            (ForecastError::InsufficientData { found: 1 }, StatusCode::NOT_FOUND),
            (ForecastError::DegenerateWindow, StatusCode::NOT_FOUND),
            (ForecastError::HorizonOutOfRange(u32::MAX), StatusCode::BAD_REQUEST),
            (
                ForecastError::Storage(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
