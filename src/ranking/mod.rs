//! Profitability Ranker
//!
//! Turns each candidate into a scored [`CropRecommendation`] and keeps the
//! three most profitable.
//!
//! ## Architecture
//! - `crop_data.rs` - yield/cost/duration/water tables, base-name extraction, profit formula
//! - `market.rs` - MarketPriceProvider trait, static average table, remote mandi client
//! - `scoring.rs` - soil/climate/market suitability scores (60..=100)
//!
//! Ranking is a stable sort by profit, so equal profits keep generator order.
//! Fewer than three candidates produce fewer recommendations; the list is
//! never padded.

pub mod crop_data;
pub mod market;
pub mod scoring;

pub use crop_data::{compute_profit, CropProfile, CropReferenceData, UNITS_PER_WEIGHT_GROUP};
pub use market::{HttpMarketProvider, MarketPriceProvider, MarketQuote, MarketTrend, PriceLookup, StaticPriceTable};
pub use scoring::SuitabilityScores;

use crate::candidates::CropCandidate;
use crate::environment::{EnvironmentSnapshot, Level};
use crate::error::DegradedDataWarning;
use serde::Serialize;
use std::sync::Arc;

pub const TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop_name: String,
    /// Quintal per acre
    pub expected_yield_per_acre: f64,
    pub market_price_per_kg: f64,
    /// Rupees per acre, rounded
    pub expected_profit_per_acre: f64,
    pub reasoning: String,
    pub soil_suitability: u8,
    pub climate_suitability: u8,
    pub market_demand: u8,
    /// Days
    pub growth_duration: u32,
    pub water_requirement: Level,
    pub market_trend: MarketTrend,
}

#[derive(Debug, Clone)]
pub struct RankedCrops {
    pub recommendations: Vec<CropRecommendation>,
    pub warnings: Vec<DegradedDataWarning>,
}

pub struct ProfitabilityRanker {
    reference: Arc<CropReferenceData>,
    market: Arc<dyn MarketPriceProvider>,
}

impl ProfitabilityRanker {
    pub fn new(reference: Arc<CropReferenceData>, market: Arc<dyn MarketPriceProvider>) -> Self {
        Self { reference, market }
    }

    pub fn reference(&self) -> &Arc<CropReferenceData> {
        &self.reference
    }

    /// Score every candidate in order, then keep the top three by profit
    pub async fn rank(&self, snapshot: &EnvironmentSnapshot, candidates: &[CropCandidate]) -> RankedCrops {
        let mut recommendations = Vec::with_capacity(candidates.len());
        let mut warnings = Vec::new();

        for candidate in candidates {
            let lookup = self.market.price_for(&candidate.base_crop).await;
            warnings.extend(lookup.warnings);
            recommendations.push(self.evaluate(snapshot, candidate, &lookup.quote));
        }

        // sort_by is stable: ties keep candidate order
        recommendations.sort_by(|a, b| b.expected_profit_per_acre.total_cmp(&a.expected_profit_per_acre));
        recommendations.truncate(TOP_N);

        if let Some(top) = recommendations.first() {
            tracing::info!(
                "Ranked {} candidates, top crop {} at ₹{}/acre",
                candidates.len(),
                top.crop_name,
                top.expected_profit_per_acre
            );
        }

        RankedCrops { recommendations, warnings }
    }

    /// Full recommendation for one candidate at a given quote
    pub fn evaluate(&self, snapshot: &EnvironmentSnapshot, candidate: &CropCandidate, quote: &MarketQuote) -> CropRecommendation {
        let profile = self.reference.profile(&candidate.base_crop);
        let price = quote.price_per_kg;
        let profit = compute_profit(profile.yield_per_acre, price, profile.cultivation_cost);
        let scores = scoring::score_candidate(&candidate.base_crop, price, snapshot);

        CropRecommendation {
            crop_name: candidate.display_name.clone(),
            expected_yield_per_acre: profile.yield_per_acre,
            market_price_per_kg: price,
            expected_profit_per_acre: profit,
            reasoning: format!(
                "{} shows strong profitability with ₹{}/kg market price and {} quintal/acre yield. {} season is optimal for this crop.",
                candidate.display_name,
                price,
                profile.yield_per_acre,
                snapshot.season().display_name()
            ),
            soil_suitability: scores.soil,
            climate_suitability: scores.climate,
            market_demand: scores.market,
            growth_duration: profile.growth_duration_days,
            water_requirement: profile.water_requirement,
            market_trend: quote.trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Season, SoilProfile, WeatherData};
    use crate::regions::{Coordinates, Region};
    use approx::assert_relative_eq;

    fn snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            weather: WeatherData {
                temperature_c: 28.0,
                humidity_pct: 70.0,
                rainfall_mm: 45.0,
                season: Season::Kharif,
                district: "Patna".to_string(),
            },
            soil: SoilProfile {
                ph: 7.2,
                fertility: Level::High,
                ..SoilProfile::default_profile()
            },
            region: Region {
                name: "Patna".to_string(),
                state: "Bihar".to_string(),
                coordinates: Coordinates { lat: 25.5941, lon: 85.1376 },
            },
        }
    }

    fn ranker(prices: StaticPriceTable) -> ProfitabilityRanker {
        ProfitabilityRanker::new(Arc::new(CropReferenceData::builtin()), Arc::new(prices))
    }

    fn candidates(names: &[&str]) -> Vec<CropCandidate> {
        let reference = CropReferenceData::builtin();
        names.iter().map(|n| CropCandidate::from_display(n, &reference)).collect()
    }

    #[tokio::test]
    async fn test_ranks_by_profit_descending() {
        let ranked = ranker(StaticPriceTable::builtin())
            .rank(&snapshot(), &candidates(&["Wheat (HD-3086)", "Rice (Swarna Sub-1)", "Sugarcane (Co-0238)"]))
            .await;

        let names: Vec<&str> = ranked.recommendations.iter().map(|r| r.crop_name.as_str()).collect();
        assert_eq!(names, vec!["Sugarcane (Co-0238)", "Rice (Swarna Sub-1)", "Wheat (HD-3086)"]);

        let wheat = &ranked.recommendations[2];
        assert_relative_eq!(wheat.expected_profit_per_acre, 20000.0);
        assert_relative_eq!(wheat.expected_yield_per_acre, 16.0);
        assert_eq!(wheat.growth_duration, 130);
        assert_eq!(wheat.market_trend, MarketTrend::Stable);
        assert_relative_eq!(ranked.recommendations[0].expected_profit_per_acre, 67000.0);
        assert_relative_eq!(ranked.recommendations[1].expected_profit_per_acre, 38000.0);
        assert!(ranked.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_truncates_to_top_three() {
        let ranked = ranker(StaticPriceTable::builtin())
            .rank(&snapshot(), &candidates(&["Wheat", "Rice", "Cotton", "Soybean", "Lentil"]))
            .await;
        assert_eq!(ranked.recommendations.len(), TOP_N);
        let profits: Vec<f64> = ranked.recommendations.iter().map(|r| r.expected_profit_per_acre).collect();
        assert!(profits.windows(2).all(|w| w[0] >= w[1]));
        // Lentil: 6 × 95 × 100 − 12000
        assert_eq!(ranked.recommendations[0].crop_name, "Lentil");
        assert_relative_eq!(profits[0], 45000.0);
    }

    #[tokio::test]
    async fn test_ties_keep_candidate_order() {
        let mut prices = StaticPriceTable::default();
        prices.insert("Jowar", 29.0, MarketTrend::Stable);
        prices.insert("Bajra", 24.0, MarketTrend::Stable);
        // Jowar: 10 × 29 × 100 − 9000 = 20000; Bajra: 12 × 24 × 100 − 8000 = 20800
        prices.insert("Wheat", 25.0, MarketTrend::Stable);
        let ranked = ranker(prices)
            .rank(&snapshot(), &candidates(&["Jowar", "Wheat (HD-3086)", "Bajra"]))
            .await;
        let names: Vec<&str> = ranked.recommendations.iter().map(|r| r.crop_name.as_str()).collect();
        assert_eq!(names, vec!["Bajra", "Jowar", "Wheat (HD-3086)"]);

        let ranked = ranker({
            let mut p = StaticPriceTable::default();
            p.insert("Jowar", 29.0, MarketTrend::Stable);
            p.insert("Wheat", 25.0, MarketTrend::Stable);
            p
        })
        .rank(&snapshot(), &candidates(&["Wheat (HD-3086)", "Jowar"]))
        .await;
        assert_eq!(ranked.recommendations[0].crop_name, "Wheat (HD-3086)");
        assert_eq!(ranked.recommendations[1].crop_name, "Jowar");
    }

    #[tokio::test]
    async fn test_fewer_candidates_are_not_padded() {
        let ranked = ranker(StaticPriceTable::builtin())
            .rank(&snapshot(), &candidates(&["Mustard (Pusa Bold)"]))
            .await;
        assert_eq!(ranked.recommendations.len(), 1);

        let ranked = ranker(StaticPriceTable::builtin()).rank(&snapshot(), &[]).await;
        assert!(ranked.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_crop_degrades_to_defaults() {
        let ranked = ranker(StaticPriceTable::builtin())
            .rank(&snapshot(), &candidates(&["Dragon Fruit (Red)"]))
            .await;
        let rec = &ranked.recommendations[0];
        assert_eq!(rec.crop_name, "Dragon Fruit (Red)");
        assert_relative_eq!(rec.expected_yield_per_acre, 10.0);
        assert_relative_eq!(rec.market_price_per_kg, 25.0);
        // 10 × 25 × 100 − 20000
        assert_relative_eq!(rec.expected_profit_per_acre, 5000.0);
        assert_eq!(rec.growth_duration, 120);
        assert_eq!(rec.water_requirement, Level::Medium);
        assert_eq!(
            ranked.warnings,
            vec![DegradedDataWarning::MarketPriceDefault { crop: "Dragon Fruit".to_string(), price_per_kg: 25.0 }]
        );
    }

    #[test]
    fn test_recommendation_reasoning_and_wire_format() {
        let ranker = ranker(StaticPriceTable::builtin());
        let candidate = CropCandidate::from_display("Sugarcane (Co-0238)", ranker.reference());
        let quote = StaticPriceTable::builtin().lookup("Sugarcane").quote;
        let rec = ranker.evaluate(&snapshot(), &candidate, &quote);
        assert_eq!(
            rec.reasoning,
            "Sugarcane (Co-0238) shows strong profitability with ₹3.5/kg market price and 320 quintal/acre yield. Kharif season is optimal for this crop."
        );

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["cropName"], "Sugarcane (Co-0238)");
        assert_eq!(json["expectedProfitPerAcre"], 67000.0);
        assert_eq!(json["soilSuitability"], 90);
        assert_eq!(json["waterRequirement"], "High");
        assert_eq!(json["marketTrend"], "Stable");
        assert_eq!(json["growthDuration"], 365);
    }
}
