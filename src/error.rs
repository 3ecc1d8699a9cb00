//! Error taxonomy for crop analysis
//!
//! Four terminal kinds abort an analysis request. Degraded soil or market data
//! is reported through [`DegradedDataWarning`] and never aborts.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Terminal failure for a single analysis request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Malformed or out-of-range request input
    #[error("{0}")]
    Validation(String),

    /// Region name did not resolve in the location registry
    #[error("District \"{0}\" not found in database")]
    NotFound(String),

    /// Weather provider unreachable, malformed, timed out or not configured
    #[error("Failed to fetch {source_name} data: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// Candidate generation failed after being configured
    #[error("Failed to generate crop candidates with {provider}: {reason}")]
    Generation { provider: String, reason: String },
}

impl AnalysisError {
    pub fn data_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn generation(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::Generation {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind, used by the HTTP layer and logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "validation",
            AnalysisError::NotFound(_) => "not_found",
            AnalysisError::DataUnavailable { .. } => "data_unavailable",
            AnalysisError::Generation { .. } => "generation",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

/// Type alias for Results using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Non-fatal notice that advisory data fell back to defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedDataWarning {
    /// District missing from the static soil table, generic profile used
    SoilDefaults { district: String },

    /// Remote soil provider failed, static table used instead
    SoilProviderFailed { district: String, reason: String },

    /// No price data for the crop, average market price used
    MarketPriceDefault { crop: String, price_per_kg: f64 },

    /// Remote market provider failed, static price table used instead
    MarketProviderFailed { crop: String, reason: String },
}

impl fmt::Display for DegradedDataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedDataWarning::SoilDefaults { district } => {
                write!(f, "No soil data for {}, using generic alluvial profile", district)
            }
            DegradedDataWarning::SoilProviderFailed { district, reason } => {
                write!(f, "Soil provider failed for {} ({}), using static soil table", district, reason)
            }
            DegradedDataWarning::MarketPriceDefault { crop, price_per_kg } => {
                write!(f, "No market price for {}, using average ₹{}/kg", crop, price_per_kg)
            }
            DegradedDataWarning::MarketProviderFailed { crop, reason } => {
                write!(f, "Market provider failed for {} ({}), using average price table", crop, reason)
            }
        }
    }
}
