//! Agronomic reference tables
//!
//! Average yield (quintal/acre), cultivation cost (₹/acre, covering seed,
//! fertiliser, pesticide, labour and irrigation), growth duration and water
//! requirement per base crop. Sources: ICAR, Ministry of Agriculture and state
//! agriculture department estimates.

use crate::environment::Level;
use crate::utils::round_half_up;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Weight units per yield unit (1 quintal = 100 kg)
pub const UNITS_PER_WEIGHT_GROUP: f64 = 100.0;

pub const DEFAULT_YIELD_PER_ACRE: f64 = 10.0;
pub const DEFAULT_CULTIVATION_COST: f64 = 20000.0;
pub const DEFAULT_GROWTH_DURATION_DAYS: u32 = 120;
pub const DEFAULT_WATER_REQUIREMENT: Level = Level::Medium;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropProfile {
    pub yield_per_acre: f64,
    pub cultivation_cost: f64,
    pub growth_duration_days: u32,
    pub water_requirement: Level,
}

impl Default for CropProfile {
    fn default() -> Self {
        Self {
            yield_per_acre: DEFAULT_YIELD_PER_ACRE,
            cultivation_cost: DEFAULT_CULTIVATION_COST,
            growth_duration_days: DEFAULT_GROWTH_DURATION_DAYS,
            water_requirement: DEFAULT_WATER_REQUIREMENT,
        }
    }
}

struct CropSeed {
    name: &'static str,
    yield_per_acre: f64,
    cost: f64,
    days: u32,
    water: Level,
}

// ============================================================================
// EMBEDDED REFERENCE TABLE
// ============================================================================

static CROPS: &[CropSeed] = &[
    CropSeed { name: "Rice", yield_per_acre: 18.0, cost: 25000.0, days: 120, water: Level::High },
    CropSeed { name: "Wheat", yield_per_acre: 16.0, cost: 20000.0, days: 130, water: Level::Medium },
    CropSeed { name: "Cotton", yield_per_acre: 8.0, cost: 35000.0, days: 180, water: Level::Medium },
    CropSeed { name: "Sugarcane", yield_per_acre: 320.0, cost: 45000.0, days: 365, water: Level::High },
    CropSeed { name: "Maize", yield_per_acre: 20.0, cost: 18000.0, days: 90, water: Level::Medium },
    CropSeed { name: "Soybean", yield_per_acre: 10.0, cost: 15000.0, days: 100, water: Level::Low },
    CropSeed { name: "Groundnut", yield_per_acre: 12.0, cost: 22000.0, days: 110, water: Level::Low },
    CropSeed { name: "Lentil", yield_per_acre: 6.0, cost: 12000.0, days: 120, water: Level::Low },
    CropSeed { name: "Chickpea", yield_per_acre: 8.0, cost: 14000.0, days: 120, water: Level::Low },
    CropSeed { name: "Mustard", yield_per_acre: 6.0, cost: 10000.0, days: 100, water: Level::Low },
    CropSeed { name: "Bajra", yield_per_acre: 12.0, cost: 8000.0, days: 75, water: Level::Low },
    CropSeed { name: "Jowar", yield_per_acre: 10.0, cost: 9000.0, days: 90, water: Level::Low },
    CropSeed { name: "Barley", yield_per_acre: 14.0, cost: 12000.0, days: 120, water: Level::Medium },
    CropSeed { name: "Potato", yield_per_acre: 140.0, cost: 40000.0, days: 90, water: Level::Medium },
    CropSeed { name: "Onion", yield_per_acre: 100.0, cost: 35000.0, days: 120, water: Level::Medium },
    CropSeed { name: "Watermelon", yield_per_acre: 200.0, cost: 25000.0, days: 75, water: Level::High },
    CropSeed { name: "Cucumber", yield_per_acre: 120.0, cost: 20000.0, days: 60, water: Level::Medium },
    CropSeed { name: "Turmeric", yield_per_acre: 25.0, cost: 50000.0, days: 270, water: Level::High },
    CropSeed { name: "Chilli", yield_per_acre: 15.0, cost: 30000.0, days: 150, water: Level::Medium },
];

/// Immutable per-crop reference data with a stable matching order
#[derive(Debug, Clone)]
pub struct CropReferenceData {
    /// Known base crops in registration order; base-name matching walks this
    order: Vec<String>,
    profiles: FxHashMap<String, CropProfile>,
}

impl CropReferenceData {
    pub fn builtin() -> Self {
        Self::from_profiles(CROPS.iter().map(|seed| {
            (
                seed.name.to_string(),
                CropProfile {
                    yield_per_acre: seed.yield_per_acre,
                    cultivation_cost: seed.cost,
                    growth_duration_days: seed.days,
                    water_requirement: seed.water,
                },
            )
        }))
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = (String, CropProfile)>) -> Self {
        let mut order = Vec::new();
        let mut map = FxHashMap::default();
        for (name, profile) in profiles {
            if map.insert(name.clone(), profile).is_none() {
                order.push(name);
            }
        }
        Self { order, profiles: map }
    }

    pub fn known_crops(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Reference values for a base crop, documented defaults when unlisted
    pub fn profile(&self, base_crop: &str) -> CropProfile {
        self.profiles.get(base_crop).copied().unwrap_or_default()
    }

    pub fn is_known(&self, base_crop: &str) -> bool {
        self.profiles.contains_key(base_crop)
    }

    /// Strip a parenthesised variety annotation and map the remainder onto a
    /// known base crop by case-insensitive containment. Unmatched text passes
    /// through unchanged.
    ///
    /// `"BT Cotton (Bollgard II)"` → `"Cotton"`
    pub fn extract_base_crop_name(&self, display_name: &str) -> String {
        let stripped = display_name.split('(').next().unwrap_or(display_name).trim();
        let lowered = stripped.to_lowercase();
        self.order
            .iter()
            .find(|crop| lowered.contains(&crop.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| stripped.to_string())
    }
}

impl Default for CropReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `yield × price × 100 − cost`, rounded to the nearest rupee (halves up)
pub fn compute_profit(yield_per_acre: f64, price_per_kg: f64, cultivation_cost: f64) -> f64 {
    round_half_up(yield_per_acre * price_per_kg * UNITS_PER_WEIGHT_GROUP - cultivation_cost)
}
