//! Gemini API client.
//!
//! A thin request/response wrapper: prompts in, raw completion text out.
//! Structured-output recovery lives in [`crate::response`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{GeminiConfig, SamplingParams};

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    RequestFailed(String),

    #[error("model returned {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("no content in model response")]
    EmptyResponse,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Client for the generative-language API.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        if config.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    /// Sampling parameters for bulk discovery.
    pub fn bulk_sampling(&self) -> SamplingParams {
        self.config.bulk_sampling
    }

    /// Sampling parameters for targeted discovery.
    pub fn targeted_sampling(&self) -> SamplingParams {
        self.config.targeted_sampling
    }

    /// Invoke the model once and return the raw completion text.
    pub async fn generate(&self, prompt: &str, sampling: SamplingParams) -> GeminiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                top_k: sampling.top_k,
                max_output_tokens: sampling.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::BadStatus { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::RequestFailed(e.to_string()))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or(GeminiError::EmptyResponse)?;

        debug!(model = %self.config.model, chars = text.len(), "Model completion received");
        Ok(text.to_string())
    }
}
