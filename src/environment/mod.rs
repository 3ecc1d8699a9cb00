//! Environment Collector
//!
//! Produces the [`EnvironmentSnapshot`] an analysis runs against: weather from
//! a provider keyed by the district's coordinates, soil from the soil provider,
//! and the season from the calendar.
//!
//! ## Architecture
//! - `season.rs` - Kharif/Rabi/Zaid calendar with configurable overlap precedence
//! - `weather.rs` - WeatherProvider trait + OpenWeather client (fatal on failure)
//! - `soil.rs` - SoilProvider trait, static table and remote client (degrades)

pub mod season;
pub mod soil;
pub mod weather;

pub use season::{Season, SeasonOverlap, PERENNIAL_CROPS};
pub use soil::{HttpSoilProvider, SoilLookup, SoilProfile, SoilProvider, StaticSoilTable};
pub use weather::{OpenWeatherProvider, WeatherProvider, WeatherReading};

use crate::error::{AnalysisError, DegradedDataWarning, Result};
use crate::regions::{LocationRegistry, Region};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Three-level qualitative rating (nutrients, fertility, water need)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Weather part of the snapshot, as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherData {
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "humidity")]
    pub humidity_pct: f64,
    #[serde(rename = "rainfall")]
    pub rainfall_mm: f64,
    pub season: Season,
    pub district: String,
}

/// Environment an analysis is evaluated against. Built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub weather: WeatherData,
    pub soil: SoilProfile,
    pub region: Region,
}

impl EnvironmentSnapshot {
    pub fn season(&self) -> Season {
        self.weather.season
    }
}

/// Snapshot plus the advisory-data warnings raised while collecting it
#[derive(Debug, Clone)]
pub struct CollectedEnvironment {
    pub snapshot: EnvironmentSnapshot,
    pub warnings: Vec<DegradedDataWarning>,
}

pub struct EnvironmentCollector {
    registry: Arc<LocationRegistry>,
    weather: Arc<dyn WeatherProvider>,
    soil: Arc<dyn SoilProvider>,
    weather_timeout: Duration,
    season_overlap: SeasonOverlap,
    season_utc_offset_minutes: i32,
}

impl EnvironmentCollector {
    pub fn new(
        registry: Arc<LocationRegistry>,
        weather: Arc<dyn WeatherProvider>,
        soil: Arc<dyn SoilProvider>,
        weather_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            weather,
            soil,
            weather_timeout,
            season_overlap: SeasonOverlap::KharifFirst,
            season_utc_offset_minutes: crate::config::DEFAULT_SEASON_UTC_OFFSET_MINUTES,
        }
    }

    pub fn with_season_calendar(mut self, overlap: SeasonOverlap, utc_offset_minutes: i32) -> Self {
        self.season_overlap = overlap;
        self.season_utc_offset_minutes = utc_offset_minutes;
        self
    }

    /// Resolve the district, then fetch weather and soil concurrently.
    ///
    /// Fails with `NotFound` for an unknown district and `DataUnavailable` for
    /// any weather failure, including timeout. Soil never fails.
    pub async fn collect(&self, district: &str, state: &str, now: DateTime<Utc>) -> Result<CollectedEnvironment> {
        let region = self.registry.find_region(district)?.clone();
        if !region.state.eq_ignore_ascii_case(state.trim()) {
            tracing::warn!("District {} belongs to {}, request named {}", region.name, region.state, state);
        }

        let weather_call = tokio::time::timeout(
            self.weather_timeout,
            self.weather.current_conditions(region.coordinates),
        );
        let soil_call = self.soil.soil_for(&region.name, state);

        let (weather_result, soil_lookup) = tokio::join!(weather_call, soil_call);

        let reading = weather_result.map_err(|_| {
            AnalysisError::data_unavailable(
                "weather",
                format!("timed out after {}s", self.weather_timeout.as_secs_f64()),
            )
        })??;

        let season = Season::at(now, self.season_utc_offset_minutes, self.season_overlap);

        let snapshot = EnvironmentSnapshot {
            weather: WeatherData {
                temperature_c: reading.temperature_c,
                humidity_pct: reading.humidity_pct,
                rainfall_mm: reading.rainfall_mm,
                season,
                district: region.name.clone(),
            },
            soil: soil_lookup.profile,
            region,
        };

        tracing::info!(
            "Environment collected: {}°C, {}% humidity, {} mm rain, {} season, {}",
            snapshot.weather.temperature_c,
            snapshot.weather.humidity_pct,
            snapshot.weather.rainfall_mm,
            season.display_name(),
            snapshot.soil.soil_type
        );

        Ok(CollectedEnvironment { snapshot, warnings: soil_lookup.warnings })
    }
}
