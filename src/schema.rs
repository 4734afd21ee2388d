//! Database schema management for `sensorcast`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates `sensors`, `sensor_readings`, `sensor_locations` and
/// `local_forecasts`. Everything hanging off a sensor is removed with it.
/// Safe to call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            id           UUID        PRIMARY KEY,
            name         TEXT        NOT NULL,
            location     TEXT        NOT NULL,
            api_key      UUID        NOT NULL UNIQUE,
            created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_seen_at TIMESTAMPTZ
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            id          BIGSERIAL        PRIMARY KEY,
            sensor_id   UUID             NOT NULL REFERENCES sensors (id) ON DELETE CASCADE,
            temperature DOUBLE PRECISION NOT NULL,
            humidity    DOUBLE PRECISION NOT NULL,
            pressure    DOUBLE PRECISION NOT NULL,
            created_at  TIMESTAMPTZ      NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_locations (
            sensor_id  UUID             PRIMARY KEY REFERENCES sensors (id) ON DELETE CASCADE,
            city_name  TEXT             NOT NULL,
            country    TEXT,
            lat        DOUBLE PRECISION,
            lon        DOUBLE PRECISION,
            updated_at TIMESTAMPTZ      NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS local_forecasts (
            id                 BIGSERIAL        PRIMARY KEY,
            sensor_id          UUID             NOT NULL REFERENCES sensors (id) ON DELETE CASCADE,
            forecast_time      TIMESTAMPTZ      NOT NULL,
            predicted_temp     DOUBLE PRECISION NOT NULL,
            predicted_humidity DOUBLE PRECISION NOT NULL,
            predicted_pressure DOUBLE PRECISION NOT NULL,
            created_at         TIMESTAMPTZ      NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Serves the forecast window query (latest N readings per sensor)
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_sensor_created
            ON sensor_readings (sensor_id, created_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_locations_city
            ON sensor_locations (city_name);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
