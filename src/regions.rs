//! Location Registry
//!
//! District → coordinates and state lookup over an immutable table, built once
//! at startup and shared read-only by every analysis.

use crate::error::{AnalysisError, Result};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// District-level analysis locus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    /// Parent region (state)
    pub state: String,
    pub coordinates: Coordinates,
}

struct DistrictSeed {
    name: &'static str,
    state: &'static str,
    lat: f64,
    lon: f64,
}

const fn d(name: &'static str, state: &'static str, lat: f64, lon: f64) -> DistrictSeed {
    DistrictSeed { name, state, lat, lon }
}

// ============================================================================
// EMBEDDED DISTRICT TABLE
// ============================================================================

static DISTRICTS: &[DistrictSeed] = &[
    // Andhra Pradesh
    d("Anantapur", "Andhra Pradesh", 14.6819, 77.6006),
    d("Chittoor", "Andhra Pradesh", 13.2172, 79.1003),
    d("Visakhapatnam", "Andhra Pradesh", 17.6869, 83.2185),
    d("Guntur", "Andhra Pradesh", 16.3067, 80.4365),
    d("Krishna", "Andhra Pradesh", 16.5193, 80.6305),
    // Bihar
    d("Patna", "Bihar", 25.5941, 85.1376),
    d("Muzaffarpur", "Bihar", 26.1225, 85.3906),
    d("Gaya", "Bihar", 24.7955, 85.0002),
    d("Bhagalpur", "Bihar", 25.2425, 87.0086),
    d("Darbhanga", "Bihar", 26.1542, 85.8918),
    // Gujarat
    d("Ahmedabad", "Gujarat", 23.0225, 72.5714),
    d("Surat", "Gujarat", 21.1702, 72.8311),
    d("Vadodara", "Gujarat", 22.3072, 73.1812),
    d("Rajkot", "Gujarat", 22.3039, 70.8022),
    d("Bhavnagar", "Gujarat", 21.7645, 72.1519),
    // Haryana
    d("Faridabad", "Haryana", 28.4089, 77.3178),
    d("Gurugram", "Haryana", 28.4595, 77.0266),
    d("Hisar", "Haryana", 29.1492, 75.7217),
    d("Karnal", "Haryana", 29.6857, 76.9905),
    d("Panipat", "Haryana", 29.3909, 76.9635),
    // Karnataka
    d("Bengaluru", "Karnataka", 12.9716, 77.5946),
    d("Mysuru", "Karnataka", 12.2958, 76.6394),
    d("Belagavi", "Karnataka", 15.8497, 74.4977),
    d("Dharwad", "Karnataka", 15.4589, 75.0078),
    d("Kalaburagi", "Karnataka", 17.3297, 76.8343),
    // Kerala
    d("Thiruvananthapuram", "Kerala", 8.5241, 76.9366),
    d("Kochi", "Kerala", 9.9312, 76.2673),
    d("Kozhikode", "Kerala", 11.2588, 75.7804),
    d("Thrissur", "Kerala", 10.5276, 76.2144),
    d("Palakkad", "Kerala", 10.7867, 76.6548),
    // Madhya Pradesh
    d("Indore", "Madhya Pradesh", 22.7196, 75.8577),
    d("Bhopal", "Madhya Pradesh", 23.2599, 77.4126),
    d("Jabalpur", "Madhya Pradesh", 23.1815, 79.9864),
    d("Gwalior", "Madhya Pradesh", 26.2183, 78.1828),
    d("Ujjain", "Madhya Pradesh", 23.1765, 75.7885),
    // Maharashtra
    d("Mumbai", "Maharashtra", 19.0760, 72.8777),
    d("Pune", "Maharashtra", 18.5204, 73.8567),
    d("Nagpur", "Maharashtra", 21.1458, 79.0882),
    d("Nashik", "Maharashtra", 19.9975, 73.7898),
    d("Aurangabad", "Maharashtra", 19.8762, 75.3433),
    d("Solapur", "Maharashtra", 17.6599, 75.9064),
    d("Ahmednagar", "Maharashtra", 19.0948, 74.7480),
    // Punjab
    d("Ludhiana", "Punjab", 30.9010, 75.8573),
    d("Amritsar", "Punjab", 31.6340, 74.8723),
    d("Jalandhar", "Punjab", 31.3260, 75.5762),
    d("Patiala", "Punjab", 30.3398, 76.3869),
    d("Bathinda", "Punjab", 30.2110, 74.9455),
    // Rajasthan
    d("Jaipur", "Rajasthan", 26.9124, 75.7873),
    d("Jodhpur", "Rajasthan", 26.2389, 73.0243),
    d("Kota", "Rajasthan", 25.2138, 75.8648),
    d("Udaipur", "Rajasthan", 24.5854, 73.7125),
    d("Ajmer", "Rajasthan", 26.4499, 74.6399),
    // Tamil Nadu
    d("Chennai", "Tamil Nadu", 13.0827, 80.2707),
    d("Coimbatore", "Tamil Nadu", 11.0168, 76.9558),
    d("Madurai", "Tamil Nadu", 9.9252, 78.1198),
    d("Tiruchirappalli", "Tamil Nadu", 10.7905, 78.7047),
    d("Salem", "Tamil Nadu", 11.6643, 78.1460),
    d("Erode", "Tamil Nadu", 11.3410, 77.7172),
    // Telangana
    d("Hyderabad", "Telangana", 17.3850, 78.4867),
    d("Warangal", "Telangana", 17.9689, 79.5941),
    d("Nizamabad", "Telangana", 18.6725, 78.0941),
    d("Khammam", "Telangana", 17.2473, 80.1514),
    // Uttar Pradesh
    d("Lucknow", "Uttar Pradesh", 26.8467, 80.9462),
    d("Kanpur", "Uttar Pradesh", 26.4499, 80.3319),
    d("Ghaziabad", "Uttar Pradesh", 28.6692, 77.4538),
    d("Agra", "Uttar Pradesh", 27.1767, 78.0081),
    d("Varanasi", "Uttar Pradesh", 25.3176, 82.9739),
    d("Meerut", "Uttar Pradesh", 28.9845, 77.7064),
    d("Prayagraj", "Uttar Pradesh", 25.4358, 81.8463),
    // West Bengal
    d("Kolkata", "West Bengal", 22.5726, 88.3639),
    d("Howrah", "West Bengal", 22.5958, 88.2636),
    d("Durgapur", "West Bengal", 23.5204, 87.3119),
    d("Siliguri", "West Bengal", 26.7271, 88.3953),
];

/// Immutable district table with a case-insensitive name index
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    regions: Vec<Region>,
    by_name: FxHashMap<String, usize>,
}

impl LocationRegistry {
    /// Registry over the embedded district table
    pub fn builtin() -> Self {
        Self::from_regions(
            DISTRICTS
                .iter()
                .map(|seed| Region {
                    name: seed.name.to_string(),
                    state: seed.state.to_string(),
                    coordinates: Coordinates { lat: seed.lat, lon: seed.lon },
                })
                .collect(),
        )
    }

    /// Registry over a caller-supplied table (fixtures, alternate datasets).
    /// On duplicate names the first entry wins.
    pub fn from_regions(regions: Vec<Region>) -> Self {
        let mut by_name = FxHashMap::default();
        for (idx, region) in regions.iter().enumerate() {
            by_name.entry(region.name.to_lowercase()).or_insert(idx);
        }
        Self { regions, by_name }
    }

    /// Case-insensitive exact match on district name
    pub fn find_region(&self, name: &str) -> Result<&Region> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.regions[idx])
            .ok_or_else(|| AnalysisError::NotFound(name.trim().to_string()))
    }

    /// Sorted, de-duplicated state names
    pub fn list_states(&self) -> Vec<&str> {
        self.regions
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Districts of a state in table order (state name matched case-insensitively)
    pub fn list_regions_in_state(&self, state: &str) -> Vec<&Region> {
        let state = state.trim();
        self.regions
            .iter()
            .filter(|r| r.state.eq_ignore_ascii_case(state))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
