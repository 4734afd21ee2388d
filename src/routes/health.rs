// src/routes/health.rs
//! Liveness endpoint for the sensorcast backend.
//!
//! `GET /health` lets container orchestrators and CI check that the process
//! is up and serving HTTP. Like the other route files it exports a subrouter
//! that the gateway (`mod.rs`) merges, following the Explicit Module Boundary
//! Pattern (EMBP).

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
///
/// Does not touch the database, so it stays green while PostgreSQL is
/// unreachable.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Subrouter with the `/health` route, generic over the gateway state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
