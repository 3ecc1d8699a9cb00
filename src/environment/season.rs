//! Indian agricultural season calendar
//!
//! Season is a pure function of calendar month. The Kharif (6–11) and Rabi
//! (11–3) ranges overlap at November; which one wins is decided by
//! [`SeasonOverlap`], defaulting to Kharif.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Monsoon crops, June–November
    Kharif,
    /// Winter crops, November–March
    Rabi,
    /// Summer crops, March–June
    Zaid,
}

/// Precedence at the November overlap between Kharif and Rabi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonOverlap {
    #[default]
    KharifFirst,
    RabiFirst,
}

impl SeasonOverlap {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "kharif-first" | "kharif_first" | "kharif" => Some(SeasonOverlap::KharifFirst),
            "rabi-first" | "rabi_first" | "rabi" => Some(SeasonOverlap::RabiFirst),
            _ => None,
        }
    }
}

fn in_kharif(month: u32) -> bool {
    (6..=11).contains(&month)
}

fn in_rabi(month: u32) -> bool {
    month >= 11 || month <= 3
}

impl Season {
    /// Classify a 1-based month
    pub fn from_month(month: u32, overlap: SeasonOverlap) -> Self {
        match overlap {
            SeasonOverlap::KharifFirst if in_kharif(month) => Season::Kharif,
            SeasonOverlap::RabiFirst if in_rabi(month) => Season::Rabi,
            _ if in_kharif(month) => Season::Kharif,
            _ if in_rabi(month) => Season::Rabi,
            _ => Season::Zaid,
        }
    }

    /// Season at an instant, evaluated in the local calendar given by the UTC offset
    pub fn at(now: DateTime<Utc>, utc_offset_minutes: i32, overlap: SeasonOverlap) -> Self {
        let month = FixedOffset::east_opt(utc_offset_minutes * 60)
            .map(|offset| now.with_timezone(&offset).month())
            .unwrap_or_else(|| now.month());
        Self::from_month(month, overlap)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    /// Major crops conventionally sown in this season
    pub fn default_crops(&self) -> &'static [&'static str] {
        match self {
            Season::Kharif => &["Rice", "Cotton", "Soybean", "Maize", "Bajra", "Jowar", "Groundnut", "Sugarcane", "Turmeric"],
            Season::Rabi => &["Wheat", "Barley", "Gram", "Mustard", "Peas", "Lentil", "Chickpea", "Potato", "Onion"],
            Season::Zaid => &["Watermelon", "Cucumber", "Bitter Gourd", "Pumpkin", "Muskmelon", "Moong Dal", "Fodder"],
        }
    }
}

/// Year-round crops, independent of season
pub const PERENNIAL_CROPS: &[&str] = &["Sugarcane", "Banana", "Papaya", "Coconut", "Coffee", "Tea", "Rubber"];
