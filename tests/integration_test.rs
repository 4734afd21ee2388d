//! End-to-end checks against a running server (`BASE_URL`, default
//! `http://localhost:8080`) backed by a real PostgreSQL database.
//!
//! Run with `cargo test -- --ignored` once the service is up.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct RegisteredSensor {
    id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LocalForecast {
    id: i64,
    sensor_id: String,
    forecast_time: DateTime<Utc>,
    hours_ahead: u32,
    predicted_temp: f64,
    predicted_humidity: f64,
    predicted_pressure: f64,
    note: String,
}

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into())
}

async fn register_sensor(client: &Client, base: &str) -> Result<RegisteredSensor> {
    // ---
    let response = client
        .post(format!("{}/sensors", base))
        .json(&json!({ "name": "Weather Station Alpha", "location": "Rooftop" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(response.json().await?)
}

#[tokio::test]
#[ignore = "requires a running server (BASE_URL)"]
async fn forecast_follows_submitted_readings() -> Result<()> {
    // ---
    let base = base_url();
    let client = Client::new();
    let sensor = register_sensor(&client, &base).await?;

    // No readings yet: a forecast is impossible
    let url = format!("{}/local-forecasts/{}", base, sensor.id);
    let response = client.get(&url).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let samples = [(20.0, 50.0, 1013.0), (21.0, 49.0, 1012.5), (22.0, 48.0, 1012.0)];
    for (temperature, humidity, pressure) in samples {
        let body = json!({ "temperature": temperature, "humidity": humidity, "pressure": pressure });
        let response = client
            .post(format!("{}/readings", base))
            .header("x-api-key", &sensor.api_key)
            .json(&body)
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let before = Utc::now();
    let forecast: LocalForecast = client
        .get(format!("{}?hours_ahead=2", url))
        .send()
        .await?
        .json()
        .await?;

    assert!(forecast.id > 0);
    assert_eq!(forecast.sensor_id, sensor.id);
    assert_eq!(forecast.hours_ahead, 2);
    assert!(forecast.forecast_time >= before + chrono::Duration::hours(2));
    assert!(!forecast.note.is_empty());

    // Rising temperature, falling humidity and pressure
    assert!(forecast.predicted_temp > 22.0, "temp {}", forecast.predicted_temp);
    assert!(forecast.predicted_humidity < 48.0, "humidity {}", forecast.predicted_humidity);
    assert!(forecast.predicted_pressure < 1012.0, "pressure {}", forecast.predicted_pressure);

    // Every call appends a new forecast
    let again: LocalForecast = client.get(&url).send().await?.json().await?;
    assert_ne!(again.id, forecast.id);

    let response = client
        .delete(format!("{}/admin/sensors/{}", base, sensor.id))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running server (BASE_URL)"]
async fn unknown_api_key_is_forbidden() -> Result<()> {
    // ---
    let response = Client::new()
        .post(format!("{}/readings", base_url()))
        .header("x-api-key", uuid_like_key())
        .json(&json!({ "temperature": 1.0, "humidity": 1.0, "pressure": 1.0 }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running server (BASE_URL)"]
async fn location_lookup_finds_registered_sensor() -> Result<()> {
    // ---
    let base = base_url();
    let client = Client::new();
    let sensor = register_sensor(&client, &base).await?;
    let city = format!("Testville-{}", &sensor.id[..8]);

    let response = client
        .post(format!("{}/sensor_locations", base))
        .header("x-api-key", &sensor.api_key)
        .json(&json!({ "city_name": city, "country": "Nowhere", "lat": 52.52, "lon": 13.405 }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let found: Vec<serde_json::Value> = client
        .get(format!("{}/locations/{}", base, city))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], sensor.id.as_str());

    client
        .delete(format!("{}/admin/sensors/{}", base, sensor.id))
        .send()
        .await?;
    Ok(())
}

/// A well-formed key that was never issued.
fn uuid_like_key() -> &'static str {
    "00000000-0000-4000-8000-000000000000"
}
