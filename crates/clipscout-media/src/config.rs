//! Metadata-chain configuration.

use std::time::Duration;

/// Configuration for the metadata provider chain.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Attempts against the primary extractor before falling through
    pub primary_attempts: u32,
    /// Fixed delay between primary-extractor attempts
    pub primary_retry_delay: Duration,
    /// Request timeout for the primary extractor
    pub primary_timeout: Duration,
    /// Request timeout for the mirror provider (kept short: best effort)
    pub mirror_timeout: Duration,
    /// Base URL of the video host (player + oEmbed endpoints)
    pub host_base: String,
    /// Base URL of the public mirror API
    pub mirror_base: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            primary_attempts: 3,
            primary_retry_delay: Duration::from_secs(1),
            primary_timeout: Duration::from_secs(10),
            mirror_timeout: Duration::from_secs(5),
            host_base: "https://www.youtube.com".to_string(),
            mirror_base: "https://invidious.snopyta.org".to_string(),
        }
    }
}

impl MetadataConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            primary_attempts: env_parse("METADATA_PRIMARY_ATTEMPTS", 3),
            primary_retry_delay: Duration::from_millis(env_parse(
                "METADATA_PRIMARY_RETRY_DELAY_MS",
                1000,
            )),
            primary_timeout: Duration::from_secs(env_parse("METADATA_PRIMARY_TIMEOUT_SECS", 10)),
            mirror_timeout: Duration::from_secs(env_parse("METADATA_MIRROR_TIMEOUT_SECS", 5)),
            host_base: std::env::var("METADATA_HOST_BASE").unwrap_or(defaults.host_base),
            mirror_base: std::env::var("METADATA_MIRROR_BASE").unwrap_or(defaults.mirror_base),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
