//! Weather provider boundary
//!
//! Current conditions keyed by coordinates. Any failure here is terminal for
//! the analysis: there is no weather fallback.

use crate::error::{AnalysisError, Result};
use crate::regions::Coordinates;
use crate::utils::round_half_up;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SOURCE: &str = "weather";

/// Provider-independent current conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    /// Rounded to the nearest whole degree
    pub temperature_c: f64,
    pub humidity_pct: f64,
    /// Rainfall over the last hour, 0 when the provider reports none
    pub rainfall_mm: f64,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<WeatherReading>;
}

/// OpenWeather "current weather" endpoint, metric units
pub struct OpenWeatherProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("crop_advisor_rust/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<WeatherReading> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::data_unavailable(SOURCE, "OPENWEATHER_API_KEY is required")
        })?;

        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        tracing::debug!("Requesting current weather at ({}, {})", coordinates.lat, coordinates.lon);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnalysisError::data_unavailable(SOURCE, e.without_url().to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::data_unavailable(SOURCE, e.to_string()))?;

        tracing::debug!("Weather response: {} bytes", body.len());
        parse_current_conditions(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    main: OpenWeatherMain,
    #[serde(default)]
    rain: Option<OpenWeatherRain>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

/// Map an OpenWeather JSON body to a reading, rejecting malformed payloads
pub fn parse_current_conditions(body: &str) -> Result<WeatherReading> {
    let parsed: OpenWeatherResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::data_unavailable(SOURCE, format!("malformed response: {}", e)))?;

    let rainfall_mm = parsed.rain.and_then(|r| r.one_hour).unwrap_or(0.0);
    let OpenWeatherMain { temp, humidity } = parsed.main;

    if !temp.is_finite() || !humidity.is_finite() || !rainfall_mm.is_finite() {
        return Err(AnalysisError::data_unavailable(SOURCE, "malformed response: non-finite value"));
    }
    if !(0.0..=100.0).contains(&humidity) || rainfall_mm < 0.0 {
        return Err(AnalysisError::data_unavailable(
            SOURCE,
            format!("malformed response: humidity {} / rainfall {} out of range", humidity, rainfall_mm),
        ));
    }

    Ok(WeatherReading {
        temperature_c: round_half_up(temp),
        humidity_pct: humidity,
        rainfall_mm,
    })
}
