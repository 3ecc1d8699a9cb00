//! Market prices
//!
//! Price data is advisory: a crop with no quote falls back to the region-agnostic
//! average price and raises a [`DegradedDataWarning`].

use crate::error::DegradedDataWarning;
use async_trait::async_trait;
use reqwest::Client;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Average price used when a crop has no quote (₹/kg)
pub const DEFAULT_PRICE_PER_KG: f64 = 25.0;
pub const DEFAULT_MANDI: &str = "Average Market";
const MOCK_MANDI: &str = "Average Market Price (Mock Data)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub crop: String,
    pub price_per_kg: f64,
    pub mandi: String,
    pub trend: MarketTrend,
}

impl MarketQuote {
    fn average(crop: &str) -> Self {
        Self {
            crop: crop.to_string(),
            price_per_kg: DEFAULT_PRICE_PER_KG,
            mandi: DEFAULT_MANDI.to_string(),
            trend: MarketTrend::Stable,
        }
    }
}

/// Price lookup outcome, never an error
#[derive(Debug, Clone)]
pub struct PriceLookup {
    pub quote: MarketQuote,
    pub warnings: Vec<DegradedDataWarning>,
}

#[async_trait]
pub trait MarketPriceProvider: Send + Sync {
    async fn price_for(&self, base_crop: &str) -> PriceLookup;
}

// ============================================================================
// Static average price table
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct StaticPriceTable {
    prices: FxHashMap<String, (f64, MarketTrend)>,
}

impl StaticPriceTable {
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (crop, price, trend) in [
            ("Wheat", 25.0, MarketTrend::Stable),
            ("Rice", 35.0, MarketTrend::Rising),
            ("Cotton", 68.0, MarketTrend::Rising),
            ("Sugarcane", 3.5, MarketTrend::Stable),
            ("Lentil", 95.0, MarketTrend::Rising),
            ("Chickpea", 75.0, MarketTrend::Stable),
            ("Soybean", 55.0, MarketTrend::Falling),
            ("Maize", 22.0, MarketTrend::Stable),
            ("Groundnut", 65.0, MarketTrend::Rising),
            ("Mustard", 70.0, MarketTrend::Rising),
        ] {
            table.insert(crop, price, trend);
        }
        table
    }

    pub fn insert(&mut self, crop: &str, price_per_kg: f64, trend: MarketTrend) {
        self.prices.insert(crop.to_lowercase(), (price_per_kg, trend));
    }

    pub fn lookup(&self, base_crop: &str) -> PriceLookup {
        match self.prices.get(&base_crop.to_lowercase()) {
            Some(&(price_per_kg, trend)) => PriceLookup {
                quote: MarketQuote {
                    crop: base_crop.to_string(),
                    price_per_kg,
                    mandi: MOCK_MANDI.to_string(),
                    trend,
                },
                warnings: Vec::new(),
            },
            None => {
                tracing::warn!("No market price for {}, using average ₹{}/kg", base_crop, DEFAULT_PRICE_PER_KG);
                PriceLookup {
                    quote: MarketQuote::average(base_crop),
                    warnings: vec![DegradedDataWarning::MarketPriceDefault {
                        crop: base_crop.to_string(),
                        price_per_kg: DEFAULT_PRICE_PER_KG,
                    }],
                }
            }
        }
    }
}

#[async_trait]
impl MarketPriceProvider for StaticPriceTable {
    async fn price_for(&self, base_crop: &str) -> PriceLookup {
        self.lookup(base_crop)
    }
}

// ============================================================================
// Remote mandi price service (credential-gated)
// ============================================================================

/// Remote mandi price feed, degrading to the static table on any failure.
///
/// Expects `GET {url}?commodity=..` with a bearer credential, answering with a
/// JSON [`MarketQuote`].
pub struct HttpMarketProvider {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
    fallback: StaticPriceTable,
}

impl HttpMarketProvider {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration, fallback: StaticPriceTable) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            timeout,
            fallback,
        }
    }

    /// Single attempt; the timeout bounds the whole exchange including the body
    async fn fetch(&self, base_crop: &str) -> Result<MarketQuote, String> {
        let quote = tokio::time::timeout(self.timeout, self.request(base_crop))
            .await
            .map_err(|_| format!("timed out after {}s", self.timeout.as_secs_f64()))??;
        if !quote.price_per_kg.is_finite() || quote.price_per_kg < 0.0 {
            return Err(format!("invalid price {}", quote.price_per_kg));
        }
        Ok(quote)
    }

    async fn request(&self, base_crop: &str) -> Result<MarketQuote, String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("commodity", base_crop)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url().to_string())?;

        response.json::<MarketQuote>().await.map_err(|e| e.without_url().to_string())
    }
}

#[async_trait]
impl MarketPriceProvider for HttpMarketProvider {
    async fn price_for(&self, base_crop: &str) -> PriceLookup {
        match self.fetch(base_crop).await {
            Ok(quote) => PriceLookup { quote, warnings: Vec::new() },
            Err(reason) => {
                tracing::warn!("Market provider failed for {}: {}", base_crop, reason);
                let mut lookup = self.fallback.lookup(base_crop);
                lookup.warnings.insert(
                    0,
                    DegradedDataWarning::MarketProviderFailed { crop: base_crop.to_string(), reason },
                );
                lookup
            }
        }
    }
}
