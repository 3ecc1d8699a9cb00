//! Soil characteristics
//!
//! Soil is low-confidence advisory data: every path returns a profile, and
//! anything short of a direct hit is reported as a [`DegradedDataWarning`].

use super::Level;
use crate::error::DegradedDataWarning;
use async_trait::async_trait;
use reqwest::Client;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    #[serde(rename = "type")]
    pub soil_type: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub nitrogen: Level,
    pub phosphorus: Level,
    pub potassium: Level,
    /// Organic carbon (%)
    #[serde(rename = "organicCarbon")]
    pub organic_carbon_pct: f64,
    pub fertility: Level,
}

impl SoilProfile {
    /// Generic profile for districts with no soil record
    pub fn default_profile() -> Self {
        Self {
            soil_type: "Alluvial Soil".to_string(),
            ph: 7.0,
            nitrogen: Level::Medium,
            phosphorus: Level::Medium,
            potassium: Level::Medium,
            organic_carbon_pct: 0.5,
            fertility: Level::Medium,
        }
    }
}

/// Soil lookup outcome, never an error
#[derive(Debug, Clone)]
pub struct SoilLookup {
    pub profile: SoilProfile,
    pub warnings: Vec<DegradedDataWarning>,
}

#[async_trait]
pub trait SoilProvider: Send + Sync {
    async fn soil_for(&self, district: &str, state: &str) -> SoilLookup;
}

// ============================================================================
// Static per-district table
// ============================================================================

/// In-memory district → soil table
#[derive(Debug, Clone, Default)]
pub struct StaticSoilTable {
    profiles: FxHashMap<String, SoilProfile>,
}

impl StaticSoilTable {
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert("Patna", profile("Alluvial Soil", 7.2, Level::Medium, Level::High, Level::Medium, 0.65, Level::High));
        table.insert("Pune", profile("Black Soil (Regur)", 7.8, Level::High, Level::Medium, Level::High, 0.75, Level::High));
        table.insert("Ludhiana", profile("Alluvial Soil", 7.5, Level::High, Level::High, Level::High, 0.80, Level::High));
        table.insert("Bengaluru", profile("Red Soil", 6.8, Level::Medium, Level::Medium, Level::Low, 0.55, Level::Medium));
        table.insert("Jaipur", profile("Desert Soil", 8.0, Level::Low, Level::Low, Level::Medium, 0.35, Level::Low));
        table
    }

    pub fn insert(&mut self, district: &str, profile: SoilProfile) {
        self.profiles.insert(district.to_lowercase(), profile);
    }

    /// Direct table lookup, falling back to the generic profile
    pub fn lookup(&self, district: &str) -> SoilLookup {
        match self.profiles.get(&district.to_lowercase()) {
            Some(profile) => SoilLookup { profile: profile.clone(), warnings: Vec::new() },
            None => {
                tracing::warn!("No soil record for {}, using generic alluvial profile", district);
                SoilLookup {
                    profile: SoilProfile::default_profile(),
                    warnings: vec![DegradedDataWarning::SoilDefaults { district: district.to_string() }],
                }
            }
        }
    }
}

fn profile(
    soil_type: &str,
    ph: f64,
    nitrogen: Level,
    phosphorus: Level,
    potassium: Level,
    organic_carbon_pct: f64,
    fertility: Level,
) -> SoilProfile {
    SoilProfile {
        soil_type: soil_type.to_string(),
        ph,
        nitrogen,
        phosphorus,
        potassium,
        organic_carbon_pct,
        fertility,
    }
}

#[async_trait]
impl SoilProvider for StaticSoilTable {
    async fn soil_for(&self, district: &str, _state: &str) -> SoilLookup {
        self.lookup(district)
    }
}

// ============================================================================
// Remote soil service (credential-gated)
// ============================================================================

/// Remote soil-health service, degrading to the static table on any failure.
///
/// Expects `GET {url}?district=..&state=..` with a bearer credential, answering
/// with a JSON [`SoilProfile`].
pub struct HttpSoilProvider {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
    fallback: StaticSoilTable,
}

impl HttpSoilProvider {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration, fallback: StaticSoilTable) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            timeout,
            fallback,
        }
    }

    /// Single attempt; the timeout bounds the whole exchange including the body
    async fn fetch(&self, district: &str, state: &str) -> Result<SoilProfile, String> {
        let profile = tokio::time::timeout(self.timeout, self.request(district, state))
            .await
            .map_err(|_| format!("timed out after {}s", self.timeout.as_secs_f64()))??;
        check_profile(&profile)?;
        Ok(profile)
    }

    async fn request(&self, district: &str, state: &str) -> Result<SoilProfile, String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("district", district), ("state", state)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url().to_string())?;

        response.json::<SoilProfile>().await.map_err(|e| e.without_url().to_string())
    }
}

/// Reject physically impossible soil readings
pub fn check_profile(profile: &SoilProfile) -> Result<(), String> {
    if !profile.ph.is_finite() || !(0.0..=14.0).contains(&profile.ph) {
        return Err(format!("invalid pH {}", profile.ph));
    }
    if !profile.organic_carbon_pct.is_finite() || profile.organic_carbon_pct < 0.0 {
        return Err(format!("invalid organic carbon {}", profile.organic_carbon_pct));
    }
    if profile.soil_type.trim().is_empty() {
        return Err("missing soil type".to_string());
    }
    Ok(())
}

#[async_trait]
impl SoilProvider for HttpSoilProvider {
    async fn soil_for(&self, district: &str, state: &str) -> SoilLookup {
        match self.fetch(district, state).await {
            Ok(profile) => SoilLookup { profile, warnings: Vec::new() },
            Err(reason) => {
                tracing::warn!("Soil provider failed for {}: {}", district, reason);
                let mut lookup = self.fallback.lookup(district);
                lookup.warnings.insert(
                    0,
                    DegradedDataWarning::SoilProviderFailed { district: district.to_string(), reason },
                );
                lookup
            }
        }
    }
}
