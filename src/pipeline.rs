//! Pipeline Orchestrator
//!
//! `Validating → CollectingEnvironment → GeneratingCandidates → Ranking → Done`,
//! with `Failed` reachable from every phase. Phases run strictly in sequence and
//! nothing is retried; the first error aborts the request wrapped in a
//! [`PhaseFailure`] naming the phase it came from.

use crate::candidates::{CandidateGenerator, CandidateSource, CandidateStrategy, GeminiGenerator, TextGenerator};
use crate::config::AdvisorConfig;
use crate::environment::{
    EnvironmentCollector, HttpSoilProvider, OpenWeatherProvider, SoilProfile, SoilProvider, StaticSoilTable,
    WeatherData, WeatherProvider,
};
use crate::error::{AnalysisError, DegradedDataWarning};
use crate::ranking::{
    CropRecommendation, CropReferenceData, HttpMarketProvider, MarketPriceProvider, ProfitabilityRanker,
    StaticPriceTable,
};
use crate::regions::LocationRegistry;
use crate::varieties::VarietyCatalog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const MAX_ACRES: f64 = 1000.0;
const ACRES_MESSAGE: &str = "Acres must be greater than 0 and at most 1000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisPhase {
    Validating,
    CollectingEnvironment,
    GeneratingCandidates,
    Ranking,
    Done,
    Failed,
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisPhase::Validating => "validation",
            AnalysisPhase::CollectingEnvironment => "environment collection",
            AnalysisPhase::GeneratingCandidates => "candidate generation",
            AnalysisPhase::Ranking => "ranking",
            AnalysisPhase::Done => "done",
            AnalysisPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal error for an analysis, tagged with the phase that raised it
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{phase} failed: {source}")]
pub struct PhaseFailure {
    pub phase: AnalysisPhase,
    #[source]
    pub source: AnalysisError,
}

impl PhaseFailure {
    pub fn is_validation(&self) -> bool {
        self.source.is_validation()
    }
}

/// Inbound request. Missing fields deserialize to values that fail validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub acres: f64,
}

impl AnalysisRequest {
    pub fn new(district: impl Into<String>, state: impl Into<String>, acres: f64) -> Self {
        Self { district: district.into(), state: state.into(), acres }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.district.trim().is_empty() || self.state.trim().is_empty() {
            return Err(AnalysisError::Validation("District and state are required".to_string()));
        }
        if !self.acres.is_finite() || self.acres <= 0.0 || self.acres > MAX_ACRES {
            return Err(AnalysisError::Validation(ACRES_MESSAGE.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub success: bool,
    /// At most three, by descending profit
    pub recommendations: Vec<CropRecommendation>,
    pub weather_data: WeatherData,
    pub soil_data: SoilProfile,
    pub analysis_date: DateTime<Utc>,
    pub district: String,
    pub state: String,
    pub acres: f64,
    /// Reasoning behind the candidate shortlist
    pub analysis: String,
    pub candidate_source: CandidateSource,
    pub warnings: Vec<DegradedDataWarning>,
}

// ============================================================================
// Component wiring
// ============================================================================

/// Read-only catalogs shared by every analysis
#[derive(Clone)]
pub struct Catalogs {
    pub registry: Arc<LocationRegistry>,
    pub varieties: Arc<VarietyCatalog>,
    pub reference: Arc<CropReferenceData>,
}

impl Catalogs {
    pub fn builtin() -> Self {
        Self {
            registry: Arc::new(LocationRegistry::builtin()),
            varieties: Arc::new(VarietyCatalog::builtin()),
            reference: Arc::new(CropReferenceData::builtin()),
        }
    }
}

/// External data sources; `generator: None` selects rule-based candidates
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub soil: Arc<dyn SoilProvider>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub market: Arc<dyn MarketPriceProvider>,
}

impl Providers {
    /// Remote soil and market clients only when both key and URL are present
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let weather: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherProvider::new(
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
        ));

        let soil: Arc<dyn SoilProvider> = match (&config.soil_api_key, &config.soil_api_url) {
            (Some(key), Some(url)) => Arc::new(HttpSoilProvider::new(
                url.clone(),
                key.clone(),
                config.provider_timeout,
                StaticSoilTable::builtin(),
            )),
            _ => Arc::new(StaticSoilTable::builtin()),
        };

        let generator = config.generation_api_key.as_ref().map(|key| {
            Arc::new(GeminiGenerator::new(
                config.generation_base_url.clone(),
                config.generation_model.clone(),
                key.clone(),
            )) as Arc<dyn TextGenerator>
        });

        let market: Arc<dyn MarketPriceProvider> = match (&config.market_api_key, &config.market_api_url) {
            (Some(key), Some(url)) => Arc::new(HttpMarketProvider::new(
                url.clone(),
                key.clone(),
                config.provider_timeout,
                StaticPriceTable::builtin(),
            )),
            _ => Arc::new(StaticPriceTable::builtin()),
        };

        Self { weather, soil, generator, market }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

pub struct CropAdvisor {
    registry: Arc<LocationRegistry>,
    collector: EnvironmentCollector,
    candidates: CandidateGenerator,
    ranker: ProfitabilityRanker,
}

impl CropAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::new(config, Catalogs::builtin(), Providers::from_config(config))
    }

    pub fn new(config: &AdvisorConfig, catalogs: Catalogs, providers: Providers) -> Self {
        let collector = EnvironmentCollector::new(
            catalogs.registry.clone(),
            providers.weather,
            providers.soil,
            config.weather_timeout,
        )
        .with_season_calendar(config.season_overlap, config.season_utc_offset_minutes);

        let strategy = CandidateStrategy::select(providers.generator, config.generation_timeout);
        let candidates = CandidateGenerator::new(strategy, catalogs.varieties, catalogs.reference.clone());
        let ranker = ProfitabilityRanker::new(catalogs.reference, providers.market);

        Self { registry: catalogs.registry, collector, candidates, ranker }
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn candidate_source(&self) -> CandidateSource {
        self.candidates.source()
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, PhaseFailure> {
        self.analyze_at(request, Utc::now()).await
    }

    /// Run the pipeline with `now` as the analysis clock (season and timestamp)
    pub async fn analyze_at(&self, request: &AnalysisRequest, now: DateTime<Utc>) -> Result<AnalysisResult, PhaseFailure> {
        let mut phase = AnalysisPhase::Validating;
        let outcome = self.run(request, now, &mut phase).await;

        match &outcome {
            Ok(result) => {
                enter(&mut phase, AnalysisPhase::Done);
                tracing::info!(
                    "Analysis complete for {}: {} recommendations, {} warnings",
                    result.district,
                    result.recommendations.len(),
                    result.warnings.len()
                );
            }
            Err(failure) => {
                enter(&mut phase, AnalysisPhase::Failed);
                tracing::warn!("Analysis failed during {}: {}", failure.phase, failure.source);
            }
        }
        outcome
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        now: DateTime<Utc>,
        phase: &mut AnalysisPhase,
    ) -> Result<AnalysisResult, PhaseFailure> {
        let fail = |phase: AnalysisPhase| move |source: AnalysisError| PhaseFailure { phase, source };

        request.validate().map_err(fail(*phase))?;
        let district = request.district.trim();
        let state = request.state.trim();
        tracing::info!("Analyzing {} acres in {}, {}", request.acres, district, state);

        enter(phase, AnalysisPhase::CollectingEnvironment);
        let collected = self
            .collector
            .collect(district, state, now)
            .await
            .map_err(fail(*phase))?;
        let mut warnings = collected.warnings;
        let snapshot = collected.snapshot;

        enter(phase, AnalysisPhase::GeneratingCandidates);
        let shortlist = self
            .candidates
            .generate(&snapshot, state)
            .await
            .map_err(fail(*phase))?;

        enter(phase, AnalysisPhase::Ranking);
        let ranked = self.ranker.rank(&snapshot, &shortlist.candidates).await;
        warnings.extend(ranked.warnings);

        for warning in &warnings {
            tracing::warn!("Degraded data: {}", warning);
        }

        Ok(AnalysisResult {
            success: true,
            recommendations: ranked.recommendations,
            weather_data: snapshot.weather,
            soil_data: snapshot.soil,
            analysis_date: now,
            district: snapshot.region.name,
            state: state.to_string(),
            acres: request.acres,
            analysis: shortlist.reasoning,
            candidate_source: shortlist.source,
            warnings,
        })
    }
}

fn enter(phase: &mut AnalysisPhase, next: AnalysisPhase) {
    tracing::debug!("Phase {:?} -> {:?}", phase, next);
    *phase = next;
}
