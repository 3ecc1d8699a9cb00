//! Candidate Generator
//!
//! Produces the five-crop shortlist the ranker evaluates, in generator order.
//!
//! ## Architecture
//! - `prompt.rs` - structured prompt with the regional variety list
//! - `generation.rs` - TextGenerator trait, Gemini client, response validation
//! - `rules.rs` - deterministic decision table with seasonal padding
//!
//! The strategy is fixed at construction from credential presence. A
//! configured generator that fails is fatal; only an unconfigured one routes
//! to the rule table.

pub mod generation;
pub mod prompt;
pub mod rules;

pub use generation::{GeminiGenerator, GeneratedCrops, GenerationSettings, TextGenerator};
pub use rules::CANDIDATE_COUNT;

use crate::environment::EnvironmentSnapshot;
use crate::error::{AnalysisError, Result};
use crate::ranking::CropReferenceData;
use crate::varieties::VarietyCatalog;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropCandidate {
    /// Name as produced, possibly with a variety annotation
    pub display_name: String,
    pub base_crop: String,
}

impl CropCandidate {
    pub fn from_display(display_name: &str, reference: &CropReferenceData) -> Self {
        Self {
            display_name: display_name.to_string(),
            base_crop: reference.extract_base_crop_name(display_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    AiAssisted,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList {
    pub candidates: Vec<CropCandidate>,
    pub reasoning: String,
    pub source: CandidateSource,
}

pub enum CandidateStrategy {
    AiAssisted {
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
    },
    RuleBased,
}

impl CandidateStrategy {
    /// AI-assisted when a generator is configured, rule-based otherwise
    pub fn select(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        match generator {
            Some(generator) => CandidateStrategy::AiAssisted { generator, timeout },
            None => CandidateStrategy::RuleBased,
        }
    }

    pub fn source(&self) -> CandidateSource {
        match self {
            CandidateStrategy::AiAssisted { .. } => CandidateSource::AiAssisted,
            CandidateStrategy::RuleBased => CandidateSource::RuleBased,
        }
    }
}

pub struct CandidateGenerator {
    strategy: CandidateStrategy,
    varieties: Arc<VarietyCatalog>,
    reference: Arc<CropReferenceData>,
}

impl CandidateGenerator {
    pub fn new(strategy: CandidateStrategy, varieties: Arc<VarietyCatalog>, reference: Arc<CropReferenceData>) -> Self {
        Self { strategy, varieties, reference }
    }

    pub fn source(&self) -> CandidateSource {
        self.strategy.source()
    }

    pub async fn generate(&self, snapshot: &EnvironmentSnapshot, state: &str) -> Result<CandidateList> {
        let (crops, reasoning) = match &self.strategy {
            CandidateStrategy::AiAssisted { generator, timeout } => {
                let regional = self.varieties.varieties_applicable_to(state);
                let prompt = prompt::build_prompt(snapshot, state, &regional);
                tracing::debug!(
                    "Prompting {} with {} chars, {} regional varieties",
                    generator.name(),
                    prompt.len(),
                    regional.len()
                );

                let text = tokio::time::timeout(*timeout, generator.generate(&prompt))
                    .await
                    .map_err(|_| {
                        AnalysisError::generation(
                            generator.name(),
                            format!("timed out after {}s", timeout.as_secs_f64()),
                        )
                    })??;
                tracing::debug!("{} returned {} chars", generator.name(), text.len());

                let parsed = generation::parse_generated_crops(generator.name(), &text, CANDIDATE_COUNT)?;
                (parsed.crops, parsed.reasoning)
            }
            CandidateStrategy::RuleBased => (
                rules::rule_based_candidates(snapshot),
                rules::rule_based_reasoning(snapshot),
            ),
        };

        let candidates: Vec<CropCandidate> = crops
            .iter()
            .map(|crop| CropCandidate::from_display(crop, &self.reference))
            .collect();

        tracing::info!(
            "Generated {} candidates ({:?}): {}",
            candidates.len(),
            self.source(),
            crops.join(", ")
        );

        Ok(CandidateList { candidates, reasoning, source: self.source() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Level, Season, SoilProfile, WeatherData};
    use crate::regions::{Coordinates, Region};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedGenerator {
        response: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn new(response: Result<String>) -> Self {
            Self { response, prompts: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "Canned"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response.clone()
        }
    }

    struct StalledGenerator;

    #[async_trait]
    impl TextGenerator for StalledGenerator {
        fn name(&self) -> &str {
            "Stalled"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("timeout should fire first")
        }
    }

    fn snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            weather: WeatherData {
                temperature_c: 28.0,
                humidity_pct: 70.0,
                rainfall_mm: 45.0,
                season: Season::Kharif,
                district: "Patna".to_string(),
            },
            soil: SoilProfile { fertility: Level::High, ..SoilProfile::default_profile() },
            region: Region {
                name: "Patna".to_string(),
                state: "Bihar".to_string(),
                coordinates: Coordinates { lat: 25.5941, lon: 85.1376 },
            },
        }
    }

    fn generator_with(strategy: CandidateStrategy) -> CandidateGenerator {
        CandidateGenerator::new(
            strategy,
            Arc::new(VarietyCatalog::builtin()),
            Arc::new(CropReferenceData::builtin()),
        )
    }

    #[tokio::test]
    async fn test_rule_based_when_unconfigured() {
        let generator = generator_with(CandidateStrategy::select(None, Duration::from_secs(1)));
        let list = generator.generate(&snapshot(), "Bihar").await.unwrap();
        assert_eq!(list.source, CandidateSource::RuleBased);
        assert_eq!(list.candidates.len(), CANDIDATE_COUNT);
        assert_eq!(list.candidates[0].display_name, "Wheat (HD-3086)");
        assert_eq!(list.candidates[0].base_crop, "Wheat");
    }

    #[tokio::test]
    async fn test_ai_assisted_uses_prompt_and_parses() {
        let body = r#"{"crops": ["Rice (Swarna Sub-1)", "BT Cotton (Bollgard II)", "Lentil (Pusa Vaibhav)", "Maize", "Makhana"],
            "reasoning": "Flood-tolerant rice and pulses fit Bihar's monsoon."}"#;
        let canned = Arc::new(CannedGenerator::new(Ok(body.to_string())));
        let generator = generator_with(CandidateStrategy::select(Some(canned.clone()), Duration::from_secs(1)));

        let list = generator.generate(&snapshot(), "Bihar").await.unwrap();
        assert_eq!(list.source, CandidateSource::AiAssisted);
        let bases: Vec<&str> = list.candidates.iter().map(|c| c.base_crop.as_str()).collect();
        assert_eq!(bases, vec!["Rice", "Cotton", "Lentil", "Maize", "Makhana"]);
        assert_eq!(list.reasoning, "Flood-tolerant rice and pulses fit Bihar's monsoon.");

        let prompts = canned.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Rice: Swarna Sub-1 (Flood-tolerant)"));
    }

    #[tokio::test]
    async fn test_configured_failure_does_not_fall_back() {
        let failing = Arc::new(CannedGenerator::new(Err(AnalysisError::generation("Canned", "HTTP 503"))));
        let generator = generator_with(CandidateStrategy::select(Some(failing), Duration::from_secs(1)));
        let err = generator.generate(&snapshot(), "Bihar").await.unwrap_err();
        assert_eq!(err.kind(), "generation");
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_invalid_output_is_fatal() {
        let canned = Arc::new(CannedGenerator::new(Ok("Sorry, I cannot help with that.".to_string())));
        let generator = generator_with(CandidateStrategy::select(Some(canned), Duration::from_secs(1)));
        let err = generator.generate(&snapshot(), "Bihar").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_generation_timeout_is_fatal() {
        let generator = generator_with(CandidateStrategy::select(
            Some(Arc::new(StalledGenerator)),
            Duration::from_millis(100),
        ));
        let err = generator.generate(&snapshot(), "Bihar").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate crop candidates with Stalled: timed out after 0.1s");
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_value(CandidateSource::AiAssisted).unwrap(), "ai-assisted");
        assert_eq!(serde_json::to_value(CandidateSource::RuleBased).unwrap(), "rule-based");
    }
}
