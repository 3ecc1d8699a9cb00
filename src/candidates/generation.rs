//! Structured text-generation boundary
//!
//! A configured generator is a hard dependency: empty, truncated or unparsable
//! output fails the analysis with `AnalysisError::Generation`.

use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

/// Responses shorter than this are treated as truncated
pub const MIN_RESPONSE_CHARS: usize = 100;

const DEFAULT_REASONING: &str = "Crops selected based on climate and soil suitability";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { temperature: 0.7, max_output_tokens: 2048 }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name used in error messages and logs
    fn name(&self) -> &str;

    /// Single JSON-mode completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Google Gemini `generateContent` in JSON response mode
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    settings: GenerationSettings,
}

impl GeminiGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    fn error(&self, reason: impl Into<String>) -> AnalysisError {
        AnalysisError::generation(self.name(), reason)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_output_tokens,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.error(e.without_url().to_string()))?;

        let payload: Value = response.json().await.map_err(|e| self.error(e.to_string()))?;

        let candidate = &payload["candidates"][0];
        let finish_reason = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
        tracing::debug!("Generation finish reason: {}", finish_reason);

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.len() < MIN_RESPONSE_CHARS {
            return Err(self.error(format!(
                "incomplete response ({} chars), finish reason {}",
                text.len(),
                finish_reason
            )));
        }

        Ok(text)
    }
}

/// Parsed generator output
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCrops {
    pub crops: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
struct RawGeneratedCrops {
    #[serde(default)]
    crops: Vec<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Remove a surrounding Markdown code fence (```json ... ``` or ``` ... ```)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Validate and parse a generator response into at most `limit` crop names
pub fn parse_generated_crops(provider: &str, text: &str, limit: usize) -> Result<GeneratedCrops> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::generation(provider, "empty response"));
    }
    if trimmed.len() < MIN_RESPONSE_CHARS {
        return Err(AnalysisError::generation(
            provider,
            format!("incomplete response ({} chars)", trimmed.len()),
        ));
    }

    let raw: RawGeneratedCrops = serde_json::from_str(strip_code_fence(trimmed))
        .map_err(|e| AnalysisError::generation(provider, format!("invalid JSON: {}", e)))?;

    let crops: Vec<String> = raw
        .crops
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .take(limit)
        .collect();

    if crops.is_empty() {
        return Err(AnalysisError::generation(provider, "response contained no crops"));
    }

    let reasoning = raw
        .reasoning
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REASONING.to_string());

    Ok(GeneratedCrops { crops, reasoning })
}
