//! Suitability scores
//!
//! Each score starts at 60, collects additive bonuses and is capped at 100.

use crate::environment::{EnvironmentSnapshot, Level};

pub const BASE_SCORE: u8 = 60;
pub const MAX_SCORE: u8 = 100;

/// Crops with structurally higher demand
const PULSES: &[&str] = &["Lentil", "Chickpea"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitabilityScores {
    pub soil: u8,
    pub climate: u8,
    pub market: u8,
}

pub fn soil_score(snapshot: &EnvironmentSnapshot) -> u8 {
    let soil = &snapshot.soil;
    let mut score = BASE_SCORE;
    score += match soil.fertility {
        Level::High => 20,
        Level::Medium => 10,
        Level::Low => 0,
    };
    if (6.5..=7.5).contains(&soil.ph) {
        score += 10;
    }
    if soil.organic_carbon_pct > 0.6 {
        score += 10;
    }
    score.min(MAX_SCORE)
}

pub fn climate_score(snapshot: &EnvironmentSnapshot) -> u8 {
    let weather = &snapshot.weather;
    let mut score = BASE_SCORE;
    if (20.0..=35.0).contains(&weather.temperature_c) {
        score += 20;
    }
    if (50.0..=80.0).contains(&weather.humidity_pct) {
        score += 10;
    }
    if weather.rainfall_mm > 20.0 {
        score += 10;
    }
    score.min(MAX_SCORE)
}

pub fn market_score(base_crop: &str, price_per_kg: f64, snapshot: &EnvironmentSnapshot) -> u8 {
    let mut score = BASE_SCORE;
    if price_per_kg > 50.0 {
        score += 20;
    } else if price_per_kg > 30.0 {
        score += 10;
    }
    if PULSES.contains(&base_crop) {
        score += 10;
    }
    if base_crop == "Cotton" && snapshot.weather.temperature_c > 25.0 {
        score += 10;
    }
    score.min(MAX_SCORE)
}

pub fn score_candidate(base_crop: &str, price_per_kg: f64, snapshot: &EnvironmentSnapshot) -> SuitabilityScores {
    SuitabilityScores {
        soil: soil_score(snapshot),
        climate: climate_score(snapshot),
        market: market_score(base_crop, price_per_kg, snapshot),
    }
}
