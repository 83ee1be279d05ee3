//! Discovery configuration.

/// Sampling parameters for one model invocation.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Gemini client configuration.
///
/// Bulk and targeted discovery carry separate sampling parameters: the
/// targeted path runs at a lower temperature to favor precision over
/// variety.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the generative-language endpoint
    pub api_key: String,
    /// Endpoint base URL (overridable for tests)
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Sampling for bulk discovery
    pub bulk_sampling: SamplingParams,
    /// Sampling for targeted discovery
    pub targeted_sampling: SamplingParams,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            bulk_sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 4096,
            },
            targeted_sampling: SamplingParams {
                temperature: 0.6,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 2048,
            },
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            endpoint: std::env::var("GEMINI_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            bulk_sampling: SamplingParams {
                temperature: env_parse("GEMINI_BULK_TEMPERATURE", 0.7),
                top_p: env_parse("GEMINI_BULK_TOP_P", 0.8),
                top_k: env_parse("GEMINI_BULK_TOP_K", 40),
                max_output_tokens: env_parse("GEMINI_BULK_MAX_TOKENS", 4096),
            },
            targeted_sampling: SamplingParams {
                temperature: env_parse("GEMINI_TARGETED_TEMPERATURE", 0.6),
                top_p: env_parse("GEMINI_TARGETED_TOP_P", 0.9),
                top_k: env_parse("GEMINI_TARGETED_TOP_K", 40),
                max_output_tokens: env_parse("GEMINI_TARGETED_MAX_TOKENS", 2048),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
