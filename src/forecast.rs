//! Local forecast engine.
//!
//! A forecast is a straight-line extrapolation of the latest readings of one
//! sensor. Temperature, humidity and pressure each get an independent
//! ordinary-least-squares fit against a shared time axis measured in seconds
//! since the oldest reading of the window. The fitted lines are evaluated
//! `hours_ahead` hours past the newest reading, and the result is stored as a
//! new `local_forecasts` row.
//!
//! The reported `forecast_time` is wall-clock invocation time plus the horizon.
//! It is not derived from the regression axis.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::{LocalForecast, NewForecast, SensorReading};
use crate::store::ForecastStore;

// ---

/// Number of most recent readings a forecast is fitted on.
pub const FORECAST_WINDOW: i64 = 50;

/// Smallest window a line can be fitted through.
pub const MIN_READINGS: usize = 2;

pub const FORECAST_NOTE: &str = "This forecast is based on a linear regression of the last 50 \
    sensor readings. Its accuracy decreases with the forecast horizon.";

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Error)]
pub enum ForecastError {
    // ---
    #[error("not enough data to generate a forecast: {found} reading(s), at least 2 required")]
    InsufficientData { found: usize },

    /// Every reading of the window carries the same timestamp, so no trend exists.
    #[error("not enough data to generate a forecast: readings share a single timestamp")]
    DegenerateWindow,

    #[error("forecast horizon of {0} hours is out of range")]
    HorizonOutOfRange(u32),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Slope and intercept of one fitted field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    // ---
    /// Change per second since the start of the window.
    pub slope: f64,
    /// Fitted value at the start of the window.
    pub intercept: f64,
}

impl Trend {
    // ---
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Ordinary least squares over `(x, y)` points.
///
/// Returns `None` when fewer than two points are given or when the x values
/// have no variance.
pub fn fit_line<I>(points: I) -> Option<Trend>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    // ---
    let (mut n, mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0usize, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in points {
        n += 1;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    if n < MIN_READINGS {
        return None;
    }

    let n = n as f64;
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    (slope.is_finite() && intercept.is_finite()).then_some(Trend { slope, intercept })
}

/// Reorder a newest-first window to oldest-first.
pub fn oldest_first(newest_first: Vec<SensorReading>) -> Vec<SensorReading> {
    newest_first.into_iter().rev().collect()
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Seconds elapsed since the first (oldest) reading, one value per reading.
pub fn normalize_times(window: &[SensorReading]) -> Vec<f64> {
    // ---
    let Some(first) = window.first() else {
        return Vec::new();
    };
    window
        .iter()
        .map(|r| seconds_between(first.created_at, r.created_at))
        .collect()
}

/// Point on the normalized time axis `hours_ahead` hours after the newest reading.
pub fn future_offset(window: &[SensorReading], hours_ahead: u32) -> f64 {
    // ---
    let span = match (window.first(), window.last()) {
        (Some(first), Some(last)) => seconds_between(first.created_at, last.created_at),
        _ => 0.0,
    };
    span + f64::from(hours_ahead) * SECONDS_PER_HOUR
}

fn fit_field<F>(xs: &[f64], window: &[SensorReading], field: F) -> Result<Trend, ForecastError>
where
    F: Fn(&SensorReading) -> f64,
{
    fit_line(xs.iter().copied().zip(window.iter().map(field)))
        .ok_or(ForecastError::DegenerateWindow)
}

/// Generate and persist a forecast for `sensor_id`, anchored at the current time.
pub async fn generate_forecast<S>(
    store: &S,
    sensor_id: Uuid,
    hours_ahead: u32,
) -> Result<LocalForecast, ForecastError>
where
    S: ForecastStore + ?Sized,
{
    generate_forecast_at(store, sensor_id, hours_ahead, Utc::now()).await
}

/// Generate and persist a forecast with `now` as the invocation time.
///
/// Nothing is written unless all three predictions are finite.
#[instrument(skip(store, now))]
pub async fn generate_forecast_at<S>(
    store: &S,
    sensor_id: Uuid,
    hours_ahead: u32,
    now: DateTime<Utc>,
) -> Result<LocalForecast, ForecastError>
where
    S: ForecastStore + ?Sized,
{
    // ---
    let window = oldest_first(
        store
            .fetch_recent_readings(sensor_id, FORECAST_WINDOW)
            .await?,
    );
    debug!("Fetched forecast window of {} readings", window.len());

    if window.len() < MIN_READINGS {
        return Err(ForecastError::InsufficientData {
            found: window.len(),
        });
    }

    let xs = normalize_times(&window);
    let temperature = fit_field(&xs, &window, |r| r.temperature)?;
    let humidity = fit_field(&xs, &window, |r| r.humidity)?;
    let pressure = fit_field(&xs, &window, |r| r.pressure)?;

    let offset = future_offset(&window, hours_ahead);
    let forecast_time = now
        .checked_add_signed(Duration::hours(i64::from(hours_ahead)))
        .ok_or(ForecastError::HorizonOutOfRange(hours_ahead))?;

    let stored = NewForecast {
        sensor_id,
        forecast_time,
        predicted_temp: temperature.at(offset),
        predicted_humidity: humidity.at(offset),
        predicted_pressure: pressure.at(offset),
    };
    let predictions = [
        stored.predicted_temp,
        stored.predicted_humidity,
        stored.predicted_pressure,
    ];
    if !predictions.iter().all(|v| v.is_finite()) {
        return Err(ForecastError::DegenerateWindow);
    }

    let id = store.insert_forecast(&stored).await?;
    info!(
        "Stored forecast {} for sensor {} ({}h ahead, offset {:.0}s)",
        id, sensor_id, hours_ahead, offset
    );

    Ok(LocalForecast::from_stored(id, stored, hours_ahead, FORECAST_NOTE))
}
