//! Variety Knowledge Base
//!
//! Improved and biotech cultivars tagged with traits and the states where they
//! are recommended. Sources: ICAR, State Agricultural Universities and Krishi
//! Vigyan Kendra variety releases.
//!
//! Registration order is significant: when several varieties of one crop fit a
//! state, the first registered wins.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarietyRecord {
    pub base_crop: String,
    pub variety_label: String,
    pub traits: Vec<String>,
    pub applicable_regions: Vec<String>,
}

impl VarietyRecord {
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    /// Region match in either direction, case-insensitive substring
    pub fn applies_to(&self, target: &str) -> bool {
        let target = target.trim().to_lowercase();
        if target.is_empty() {
            return false;
        }
        self.applicable_regions.iter().any(|region| {
            let region = region.to_lowercase();
            target.contains(&region) || region.contains(&target)
        })
    }
}

struct VarietySeed {
    crop: &'static str,
    label: &'static str,
    traits: &'static [&'static str],
    regions: &'static [&'static str],
}

// ============================================================================
// EMBEDDED VARIETY CATALOG
// ============================================================================

// Regions are full state names, matched against the request's state by
// substring. Abbreviations ("UP", "MP", "AP") would never match.
static VARIETIES: &[VarietySeed] = &[
    // Cotton
    VarietySeed { crop: "Cotton", label: "BT Cotton (Bollgard II)", traits: &["Pest-resistant", "High yield"], regions: &["Maharashtra", "Gujarat", "Telangana"] },
    VarietySeed { crop: "Cotton", label: "Hybrid Cotton DCH-32", traits: &["Drought-tolerant", "Long staple"], regions: &["Punjab", "Haryana"] },
    // Wheat
    VarietySeed { crop: "Wheat", label: "HD-3086 (Pusa Wheat)", traits: &["High yield", "Disease-resistant"], regions: &["Punjab", "Haryana", "Uttar Pradesh"] },
    VarietySeed { crop: "Wheat", label: "DBW-187", traits: &["Heat-tolerant", "Early maturing"], regions: &["Rajasthan", "Madhya Pradesh"] },
    VarietySeed { crop: "Wheat", label: "PBW-725", traits: &["Rust-resistant", "High protein"], regions: &["Punjab", "Haryana"] },
    // Rice
    VarietySeed { crop: "Rice", label: "Swarna Sub-1 (Flood-tolerant)", traits: &["Submergence-tolerant", "High yield"], regions: &["Bihar", "Odisha", "West Bengal"] },
    VarietySeed { crop: "Rice", label: "Pusa Basmati 1121", traits: &["Premium quality", "Long grain"], regions: &["Punjab", "Haryana"] },
    VarietySeed { crop: "Rice", label: "IR-64 (Drought-tolerant)", traits: &["Water-efficient", "Stable yield"], regions: &["Tamil Nadu", "Andhra Pradesh"] },
    // Maize
    VarietySeed { crop: "Maize", label: "DHM-117 (Hybrid)", traits: &["High yield", "Disease-resistant"], regions: &["Karnataka", "Andhra Pradesh"] },
    VarietySeed { crop: "Maize", label: "NK-6240 (Drought-tolerant)", traits: &["Water-efficient", "Heat-tolerant"], regions: &["Rajasthan", "Madhya Pradesh"] },
    // Sugarcane
    VarietySeed { crop: "Sugarcane", label: "Co-0238 (High sugar)", traits: &["High sucrose", "Disease-resistant"], regions: &["Maharashtra", "Uttar Pradesh"] },
    VarietySeed { crop: "Sugarcane", label: "CoS-767 (Early maturing)", traits: &["Short duration", "Drought-tolerant"], regions: &["Karnataka", "Tamil Nadu"] },
    // Soybean
    VarietySeed { crop: "Soybean", label: "JS-335", traits: &["High yield", "Disease-resistant"], regions: &["Madhya Pradesh", "Maharashtra"] },
    VarietySeed { crop: "Soybean", label: "RKS-18 (Drought-tolerant)", traits: &["Water-efficient", "Early maturing"], regions: &["Rajasthan", "Gujarat"] },
    // Lentil
    VarietySeed { crop: "Lentil", label: "Pusa Vaibhav", traits: &["High yield", "Wilt-resistant"], regions: &["Uttar Pradesh", "Madhya Pradesh", "Bihar"] },
    VarietySeed { crop: "Lentil", label: "IPL-220", traits: &["Early maturing", "Bold grain"], regions: &["Rajasthan", "Haryana"] },
    // Chickpea
    VarietySeed { crop: "Chickpea", label: "Pusa 362", traits: &["Wilt-resistant", "High yield"], regions: &["Madhya Pradesh", "Maharashtra"] },
    VarietySeed { crop: "Chickpea", label: "JG-11 (Kabuli type)", traits: &["Premium quality", "Export grade"], regions: &["Rajasthan", "Karnataka"] },
    // Mustard
    VarietySeed { crop: "Mustard", label: "Pusa Bold", traits: &["High oil content", "Early maturing"], regions: &["Rajasthan", "Haryana"] },
    VarietySeed { crop: "Mustard", label: "RH-30 (Hybrid)", traits: &["High yield", "Disease-resistant"], regions: &["Uttar Pradesh", "Madhya Pradesh"] },
    // Groundnut
    VarietySeed { crop: "Groundnut", label: "TAG-24", traits: &["Drought-tolerant", "High oil"], regions: &["Gujarat", "Rajasthan"] },
    VarietySeed { crop: "Groundnut", label: "Kadiri-9", traits: &["Early maturing", "Disease-resistant"], regions: &["Andhra Pradesh", "Karnataka"] },
];

/// Ordered catalog of variety records, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct VarietyCatalog {
    records: Vec<VarietyRecord>,
}

/// Best-match variety per base crop for one state, in catalog order
#[derive(Debug, Clone, Default)]
pub struct RegionalVarieties<'a> {
    entries: Vec<(&'a str, &'a VarietyRecord)>,
}

impl<'a> RegionalVarieties<'a> {
    pub fn get(&self, base_crop: &str) -> Option<&'a VarietyRecord> {
        self.entries
            .iter()
            .find(|(crop, _)| crop.eq_ignore_ascii_case(base_crop))
            .map(|(_, record)| *record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a VarietyRecord)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"Crop: Variety"` pairs joined with `", "`, as used in prompts
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(crop, record)| format!("{}: {}", crop, record.variety_label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl VarietyCatalog {
    pub fn builtin() -> Self {
        Self::from_records(
            VARIETIES
                .iter()
                .map(|seed| VarietyRecord {
                    base_crop: seed.crop.to_string(),
                    variety_label: seed.label.to_string(),
                    traits: seed.traits.iter().map(|t| t.to_string()).collect(),
                    applicable_regions: seed.regions.iter().map(|r| r.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn from_records(records: Vec<VarietyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[VarietyRecord] {
        &self.records
    }

    /// First-registered applicable variety for each base crop
    pub fn varieties_applicable_to(&self, state: &str) -> RegionalVarieties<'_> {
        let mut entries: Vec<(&str, &VarietyRecord)> = Vec::new();
        for record in self.records.iter().filter(|r| r.applies_to(state)) {
            let seen = entries
                .iter()
                .any(|(crop, _)| crop.eq_ignore_ascii_case(&record.base_crop));
            if !seen {
                entries.push((record.base_crop.as_str(), record));
            }
        }
        RegionalVarieties { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registered_variety_wins() {
        let catalog = VarietyCatalog::builtin();
        let punjab = catalog.varieties_applicable_to("Punjab");
        // HD-3086 and PBW-725 both list Punjab; HD-3086 is registered first
        assert_eq!(punjab.get("Wheat").unwrap().variety_label, "HD-3086 (Pusa Wheat)");
        assert_eq!(punjab.get("Rice").unwrap().variety_label, "Pusa Basmati 1121");
        assert_eq!(punjab.get("Cotton").unwrap().variety_label, "Hybrid Cotton DCH-32");
    }

    #[test]
    fn test_catalog_order_is_preserved() {
        let catalog = VarietyCatalog::builtin();
        let crops: Vec<&str> = catalog.varieties_applicable_to("Bihar").iter().map(|(c, _)| c).collect();
        assert_eq!(crops, vec!["Rice", "Lentil"]);
        assert_eq!(
            catalog.varieties_applicable_to("Bihar").summary(),
            "Rice: Swarna Sub-1 (Flood-tolerant), Lentil: Pusa Vaibhav"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive_and_bidirectional() {
        let catalog = VarietyCatalog::builtin();
        assert_eq!(catalog.varieties_applicable_to("west bengal").len(), 1);
        // Target contained in a region name
        assert!(catalog.varieties_applicable_to("Bengal").get("Rice").is_some());
        // Region name contained in a longer target
        assert!(catalog.varieties_applicable_to("Rajasthan (western)").get("Mustard").is_some());
    }

    #[test]
    fn test_regions_are_full_state_names() {
        let catalog = VarietyCatalog::builtin();
        for record in catalog.records() {
            for region in &record.applicable_regions {
                assert!(
                    region.len() > 3 && region.chars().any(|c| c.is_ascii_lowercase()),
                    "{} lists abbreviated region {:?}",
                    record.variety_label,
                    region
                );
            }
        }

        let registry = crate::regions::LocationRegistry::builtin();
        for state in ["Uttar Pradesh", "Madhya Pradesh", "Andhra Pradesh"] {
            assert!(registry.list_states().contains(&state));
            assert!(!catalog.varieties_applicable_to(state).is_empty(), "{}", state);
        }
        for abbreviation in ["UP", "MP", "AP"] {
            assert!(catalog.varieties_applicable_to(abbreviation).is_empty(), "{}", abbreviation);
        }
    }

    #[test]
    fn test_unmatched_or_empty_state_yields_nothing() {
        let catalog = VarietyCatalog::builtin();
        assert!(catalog.varieties_applicable_to("Kerala").is_empty());
        assert!(catalog.varieties_applicable_to("").is_empty());
        assert_eq!(catalog.varieties_applicable_to("Kerala").summary(), "");
    }

    #[test]
    fn test_traits() {
        let catalog = VarietyCatalog::builtin();
        let tag24 = catalog
            .records()
            .iter()
            .find(|r| r.variety_label == "TAG-24")
            .unwrap();
        assert!(tag24.has_trait("drought-tolerant"));
        assert!(!tag24.has_trait("Flood-tolerant"));
    }
}
