//! Metadata lookup through an ordered provider chain.
//!
//! `MetadataFetcher::fetch` never fails: providers are tried in order, each
//! under its own retry policy, and when the whole chain is exhausted the
//! last-resort values are derived purely from the video id. A metadata
//! failure must never block clip resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MetadataConfig;
use crate::providers::{MirrorProvider, OEmbedProvider, PlayerProvider};
use crate::retry::{retry_with_policy, RetryPolicy};

/// Title and thumbnail for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
}

/// A provider could not produce metadata. Internal to the chain; callers
/// of [`MetadataFetcher::fetch`] never see it.
#[derive(Debug, Clone, Error)]
#[error("{provider} unavailable: {reason}")]
pub struct UpstreamUnavailable {
    pub provider: &'static str,
    pub reason: String,
}

impl UpstreamUnavailable {
    pub fn new(provider: &'static str, reason: impl Into<String>) -> Self {
        Self {
            provider,
            reason: reason.into(),
        }
    }
}

/// One tier of the metadata fallback chain.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Retry policy for this tier. Single attempt unless overridden.
    fn retry(&self) -> RetryPolicy {
        RetryPolicy::single()
    }

    /// Fetch metadata. The zero-based attempt number lets providers rotate
    /// per-attempt state such as the client identity.
    async fn fetch(&self, video_id: &str, attempt: u32)
        -> Result<VideoMetadata, UpstreamUnavailable>;
}

/// Conventionally-formed thumbnail URL derived purely from the video id.
pub fn derived_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Hardcoded values used when every provider is down.
fn last_resort(video_id: &str) -> VideoMetadata {
    VideoMetadata {
        title: "YouTube Video".to_string(),
        thumbnail_url: derived_thumbnail_url(video_id),
    }
}

/// Ordered chain of metadata providers with short-circuit on first success.
pub struct MetadataFetcher {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl MetadataFetcher {
    /// The standard chain: primary extractor, oEmbed, public mirror.
    pub fn new(config: MetadataConfig) -> Self {
        Self::with_providers(vec![
            Box::new(PlayerProvider::new(&config)),
            Box::new(OEmbedProvider::new(&config)),
            Box::new(MirrorProvider::new(&config)),
        ])
    }

    /// Build a fetcher from an explicit provider list. Adding or removing a
    /// fallback tier is a one-line change here.
    pub fn with_providers(providers: Vec<Box<dyn MetadataProvider>>) -> Self {
        Self { providers }
    }

    /// Fetch metadata for a video id. Always returns a value.
    pub async fn fetch(&self, video_id: &str) -> VideoMetadata {
        for provider in &self.providers {
            let policy = provider.retry();
            match retry_with_policy(&policy, |attempt| provider.fetch(video_id, attempt)).await {
                Ok(metadata) => {
                    info!(
                        provider = provider.name(),
                        video_id,
                        title = %metadata.title,
                        "Metadata lookup succeeded"
                    );
                    return metadata;
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        video_id,
                        error = %e,
                        "Metadata provider exhausted, falling through"
                    );
                }
            }
        }

        warn!(video_id, "All metadata providers failed, using last-resort values");
        last_resort(video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FlakyProvider {
        calls: AtomicU32,
        succeed_on_attempt: Option<u32>,
    }

    #[async_trait]
    impl MetadataProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn retry(&self) -> RetryPolicy {
            RetryPolicy::new(3, Duration::ZERO)
        }

        async fn fetch(
            &self,
            _video_id: &str,
            attempt: u32,
        ) -> Result<VideoMetadata, UpstreamUnavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.succeed_on_attempt {
                Some(n) if attempt >= n => Ok(VideoMetadata {
                    title: format!("attempt {attempt}"),
                    thumbnail_url: "https://example.test/t.jpg".to_string(),
                }),
                _ => Err(UpstreamUnavailable::new("flaky", "simulated outage")),
            }
        }
    }

    #[tokio::test]
    async fn test_retry_within_a_tier() {
        let fetcher = MetadataFetcher::with_providers(vec![Box::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_on_attempt: Some(2),
        })]);
        let metadata = fetcher.fetch("dQw4w9WgXcQ").await;
        assert_eq!(metadata.title, "attempt 2");
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_next_tier() {
        let fetcher = MetadataFetcher::with_providers(vec![
            Box::new(FlakyProvider {
                calls: AtomicU32::new(0),
                succeed_on_attempt: None,
            }),
            Box::new(FlakyProvider {
                calls: AtomicU32::new(0),
                succeed_on_attempt: Some(0),
            }),
        ]);
        let metadata = fetcher.fetch("dQw4w9WgXcQ").await;
        assert_eq!(metadata.title, "attempt 0");
    }

    #[tokio::test]
    async fn test_exhausted_chain_returns_last_resort() {
        let fetcher = MetadataFetcher::with_providers(vec![Box::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_on_attempt: None,
        })]);
        let metadata = fetcher.fetch("dQw4w9WgXcQ").await;
        assert_eq!(metadata.title, "YouTube Video");
        assert_eq!(
            metadata.thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[tokio::test]
    async fn test_empty_chain_still_returns_a_value() {
        let fetcher = MetadataFetcher::with_providers(vec![]);
        let metadata = fetcher.fetch("abc123def45").await;
        assert_eq!(metadata.title, "YouTube Video");
    }
}
