//! Remote language-model client
//!
//! [`GeminiClient`] calls the Gemini `generateContent` REST endpoint. The
//! assistant only depends on the [`ModelClient`] trait so tests and other
//! providers can stand in for it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model {model} answered with status {status}: {body}")]
    Status { model: String, status: u16, body: String },

    #[error("model {0} returned no text")]
    EmptyResponse(String),
}

/// A text-generation backend addressed by credential and model name
#[allow(async_fn_in_trait)]
pub trait ModelClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_base_url(GEMINI_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, AssistantError> {
        // Key goes in a header, never the URL
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                model: model.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Http(e.without_url()))?;
        parsed
            .into_text()
            .ok_or_else(|| AssistantError::EmptyResponse(model.to_string()))
    }
}
