//! Prompt construction for AI-assisted candidate generation

use crate::environment::EnvironmentSnapshot;
use crate::varieties::RegionalVarieties;

pub const SYSTEM_PREAMBLE: &str =
    "You are an expert agricultural biotechnologist specializing in Indian farming and climate-resilient crop varieties.";

/// Structured prompt: location, weather, season, soil and the regional variety list
pub fn build_prompt(snapshot: &EnvironmentSnapshot, state: &str, varieties: &RegionalVarieties<'_>) -> String {
    let weather = &snapshot.weather;
    let soil = &snapshot.soil;

    let available = if varieties.is_empty() {
        "standard varieties".to_string()
    } else {
        varieties.summary()
    };

    format!(
        "{preamble}

Recommend 5 crops for:
Location: {district}, {state}
Temp: {temp}°C, Humidity: {humidity}%, Rain: {rain}mm
Season: {season}
Soil: {soil_type}, pH {ph}, {fertility:?} fertility, N {n:?} / P {p:?} / K {k:?}, organic carbon {oc}%

Available biotech: {available}

Return JSON only:
{{
  \"crops\": [\"Crop1 (Variety)\", \"Crop2\", \"Crop3\", \"Crop4\", \"Crop5\"],
  \"reasoning\": \"One short sentence\"
}}

Respond with valid JSON only.",
        preamble = SYSTEM_PREAMBLE,
        district = weather.district,
        state = state.trim(),
        temp = weather.temperature_c,
        humidity = weather.humidity_pct,
        rain = weather.rainfall_mm,
        season = weather.season.display_name(),
        soil_type = soil.soil_type,
        ph = soil.ph,
        fertility = soil.fertility,
        n = soil.nitrogen,
        p = soil.phosphorus,
        k = soil.potassium,
        oc = soil.organic_carbon_pct,
        available = available,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Season, SoilProfile, WeatherData};
    use crate::regions::{Coordinates, Region};
    use crate::varieties::VarietyCatalog;

    fn snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            weather: WeatherData {
                temperature_c: 28.0,
                humidity_pct: 70.0,
                rainfall_mm: 45.0,
                season: Season::Kharif,
                district: "Patna".to_string(),
            },
            soil: SoilProfile::default_profile(),
            region: Region {
                name: "Patna".to_string(),
                state: "Bihar".to_string(),
                coordinates: Coordinates { lat: 25.5941, lon: 85.1376 },
            },
        }
    }

    #[test]
    fn test_prompt_contains_context_and_varieties() {
        let catalog = VarietyCatalog::builtin();
        let prompt = build_prompt(&snapshot(), "Bihar", &catalog.varieties_applicable_to("Bihar"));
        assert!(prompt.starts_with(SYSTEM_PREAMBLE));
        assert!(prompt.contains("Location: Patna, Bihar"));
        assert!(prompt.contains("Temp: 28°C, Humidity: 70%, Rain: 45mm"));
        assert!(prompt.contains("Season: Kharif"));
        assert!(prompt.contains("Soil: Alluvial Soil, pH 7, Medium fertility"));
        assert!(prompt.contains("Available biotech: Rice: Swarna Sub-1 (Flood-tolerant), Lentil: Pusa Vaibhav"));
        assert!(prompt.contains("\"crops\""));
    }

    #[test]
    fn test_prompt_without_regional_varieties() {
        let catalog = VarietyCatalog::builtin();
        let prompt = build_prompt(&snapshot(), "Kerala", &catalog.varieties_applicable_to("Kerala"));
        assert!(prompt.contains("Available biotech: standard varieties"));
    }
}
