//! Crop Advisor Rust Implementation
//!
//! Recommends the most profitable crops for a district and land size.
//!
//! The analysis runs as a three-stage pipeline:
//! - `environment/`: weather (provider) + soil (table or provider) + season (calendar)
//! - `candidates/`: five-crop shortlist, AI-assisted or rule-based
//! - `ranking/`: yield, price, profit and suitability scores, top three by profit
//!
//! `pipeline` sequences the stages; `regions` and `varieties` are the static
//! catalogs they share.

pub mod candidates;
pub mod config;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod ranking;
pub mod regions;
pub mod utils;
pub mod varieties;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use candidates::{CandidateSource, CandidateStrategy, CropCandidate, TextGenerator};
pub use config::AdvisorConfig;
pub use environment::{EnvironmentSnapshot, Level, Season, SeasonOverlap, SoilProvider, WeatherProvider};
pub use error::{AnalysisError, DegradedDataWarning};
pub use pipeline::{AnalysisPhase, AnalysisRequest, AnalysisResult, Catalogs, CropAdvisor, PhaseFailure, Providers};
pub use ranking::{CropRecommendation, MarketPriceProvider};
pub use regions::{LocationRegistry, Region};
pub use varieties::VarietyCatalog;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
