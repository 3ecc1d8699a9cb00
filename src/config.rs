//! Runtime configuration
//!
//! Read from environment variables at startup. A missing credential is never a
//! startup error: it either routes a stage to its static/rule-based variant or
//! surfaces later as a terminal error for the request that needs it.

use crate::environment::SeasonOverlap;
use std::time::Duration;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// Indian Standard Time, the calendar the seasons are defined against
pub const DEFAULT_SEASON_UTC_OFFSET_MINUTES: i32 = 330;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub weather_timeout: Duration,

    pub generation_api_key: Option<String>,
    pub generation_base_url: String,
    pub generation_model: String,
    pub generation_timeout: Duration,

    /// Soil provider is only used when both key and URL are set
    pub soil_api_key: Option<String>,
    pub soil_api_url: Option<String>,

    /// Market provider is only used when both key and URL are set
    pub market_api_key: Option<String>,
    pub market_api_url: Option<String>,

    /// Timeout for the advisory soil and market providers
    pub provider_timeout: Duration,

    pub season_overlap: SeasonOverlap,
    pub season_utc_offset_minutes: i32,

    /// Include error debug detail in failure responses (non-production only)
    pub expose_error_details: bool,
    pub port: u16,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            weather_timeout: Duration::from_secs(5),
            generation_api_key: None,
            generation_base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout: Duration::from_secs(30),
            soil_api_key: None,
            soil_api_url: None,
            market_api_key: None,
            market_api_url: None,
            provider_timeout: Duration::from_secs(5),
            season_overlap: SeasonOverlap::KharifFirst,
            season_utc_offset_minutes: DEFAULT_SEASON_UTC_OFFSET_MINUTES,
            expose_error_details: false,
            port: 3000,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secs = |key: &str, default: Duration| match var(key) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(s) if s > 0 => Duration::from_secs(s),
                _ => {
                    tracing::warn!("Ignoring invalid {}={:?}, using {:?}", key, raw, default);
                    default
                }
            },
            None => default,
        };

        let defaults = Self::default();

        let season_overlap = match var("SEASON_OVERLAP") {
            Some(raw) => SeasonOverlap::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid SEASON_OVERLAP={:?}, using kharif-first", raw);
                SeasonOverlap::KharifFirst
            }),
            None => defaults.season_overlap,
        };

        let season_utc_offset_minutes = var("SEASON_UTC_OFFSET_MINUTES")
            .and_then(|raw| raw.parse::<i32>().ok())
            .filter(|m| m.abs() < 24 * 60)
            .unwrap_or(defaults.season_utc_offset_minutes);

        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let expose_error_details = var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Self {
            weather_api_key: var("OPENWEATHER_API_KEY"),
            weather_base_url: var("OPENWEATHER_BASE_URL").unwrap_or(defaults.weather_base_url),
            weather_timeout: secs("WEATHER_TIMEOUT_SECS", defaults.weather_timeout),
            generation_api_key: var("GEMINI_API_KEY"),
            generation_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.generation_base_url),
            generation_model: var("GEMINI_MODEL").unwrap_or(defaults.generation_model),
            generation_timeout: secs("GENERATION_TIMEOUT_SECS", defaults.generation_timeout),
            soil_api_key: var("AGRISTACK_API_KEY"),
            soil_api_url: var("SOIL_API_URL"),
            market_api_key: var("ENAM_API_KEY"),
            market_api_url: var("MARKET_API_URL"),
            provider_timeout: secs("PROVIDER_TIMEOUT_SECS", defaults.provider_timeout),
            season_overlap,
            season_utc_offset_minutes,
            expose_error_details,
            port,
        }
    }

    /// Log the effective configuration without exposing credentials
    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  OPENWEATHER_API_KEY: {}", presence(&self.weather_api_key));
        tracing::info!("  GEMINI_API_KEY: {} (model {})", presence(&self.generation_api_key), self.generation_model);
        tracing::info!(
            "  Soil provider: {}",
            if self.soil_api_key.is_some() && self.soil_api_url.is_some() { "remote" } else { "static table" }
        );
        tracing::info!(
            "  Market provider: {}",
            if self.market_api_key.is_some() && self.market_api_url.is_some() { "remote" } else { "static table" }
        );
        tracing::info!("  Season overlap: {:?}", self.season_overlap);
        tracing::info!("  PORT: {}", self.port);
    }
}

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() { "set" } else { "missing" }
}
