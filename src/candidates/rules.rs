//! Rule-based candidate selection
//!
//! Deterministic decision table over the environment snapshot. Used when no
//! generation credential is configured.

use crate::environment::{EnvironmentSnapshot, Level, Season, PERENNIAL_CROPS};

pub const CANDIDATE_COUNT: usize = 5;

struct Rule {
    applies: fn(&EnvironmentSnapshot) -> bool,
    crops: &'static [&'static str],
}

static RULES: &[Rule] = &[
    // Alluvial or highly fertile soil
    Rule {
        applies: |s| s.soil.soil_type.to_lowercase().contains("alluvial") || s.soil.fertility == Level::High,
        crops: &["Wheat (HD-3086)", "Rice (Swarna Sub-1)", "Sugarcane (Co-0238)"],
    },
    // Warm black soil
    Rule {
        applies: |s| s.soil.soil_type.to_lowercase().contains("black") && s.weather.temperature_c > 25.0,
        crops: &["Cotton (BT Bollgard II)", "Soybean (JS-335)"],
    },
    // Low rainfall
    Rule {
        applies: |s| s.weather.rainfall_mm < 30.0,
        crops: &["Maize (NK-6240 Drought-tolerant)", "Groundnut (TAG-24)"],
    },
    // Winter season pulses and oilseeds
    Rule {
        applies: |s| s.weather.season == Season::Rabi,
        crops: &["Chickpea (Pusa 362)", "Lentil (Pusa Vaibhav)", "Mustard (Pusa Bold)"],
    },
];

/// Up to five candidates, deduplicated, padded from the season's default list
pub fn rule_based_candidates(snapshot: &EnvironmentSnapshot) -> Vec<String> {
    let mut selected: Vec<String> = Vec::with_capacity(CANDIDATE_COUNT);

    for rule in RULES.iter().filter(|r| (r.applies)(snapshot)) {
        for crop in rule.crops {
            push_unique(&mut selected, crop);
        }
    }
    selected.truncate(CANDIDATE_COUNT);

    let padding = snapshot
        .season()
        .default_crops()
        .iter()
        .chain(PERENNIAL_CROPS.iter());
    for crop in padding {
        if selected.len() >= CANDIDATE_COUNT {
            break;
        }
        push_unique(&mut selected, crop);
    }

    selected
}

pub fn rule_based_reasoning(snapshot: &EnvironmentSnapshot) -> String {
    format!(
        "Selected crops based on {}, {} season, and temperature {}°C. Biotech varieties included for better yield and climate resilience.",
        snapshot.soil.soil_type,
        snapshot.season().display_name(),
        snapshot.weather.temperature_c
    )
}

/// Skip exact repeats and crops whose base name is already selected
fn push_unique(selected: &mut Vec<String>, crop: &str) {
    let base = plain_name(crop);
    let duplicate = selected
        .iter()
        .any(|existing| existing == crop || plain_name(existing).eq_ignore_ascii_case(base));
    if !duplicate {
        selected.push(crop.to_string());
    }
}

fn plain_name(display: &str) -> &str {
    display.split('(').next().unwrap_or(display).trim()
}
