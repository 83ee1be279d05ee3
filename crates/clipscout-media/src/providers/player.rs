//! Primary extractor: the video host's internal player endpoint.
//!
//! The richest source of metadata and the flakiest: the host rate-limits
//! and blocks scrapers aggressively. Each attempt presents a different
//! client identity from the fixed pool, and the tier retries with a fixed
//! inter-attempt delay before the chain falls through.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::MetadataConfig;
use crate::identity::client_identity;
use crate::metadata::{derived_thumbnail_url, MetadataProvider, UpstreamUnavailable, VideoMetadata};
use crate::retry::RetryPolicy;

const PROVIDER_NAME: &str = "player";

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: String,
    thumbnail: Option<ThumbnailSet>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailSet {
    thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

pub struct PlayerProvider {
    base: String,
    attempts: u32,
    retry_delay: std::time::Duration,
    client: Client,
}

impl PlayerProvider {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            base: config.host_base.clone(),
            attempts: config.primary_attempts,
            retry_delay: config.primary_retry_delay,
            client: Client::builder()
                .timeout(config.primary_timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MetadataProvider for PlayerProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, self.retry_delay)
    }

    async fn fetch(
        &self,
        video_id: &str,
        attempt: u32,
    ) -> Result<VideoMetadata, UpstreamUnavailable> {
        let url = format!("{}/youtubei/v1/player?prettyPrint=false", self.base);
        let body = json!({
            "context": {
                "client": {
                    "clientName": "WEB",
                    "clientVersion": "2.20240101.00.00",
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&url)
            .header("User-Agent", client_identity(attempt))
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamUnavailable::new(
                PROVIDER_NAME,
                format!("status {}", response.status()),
            ));
        }

        let player: PlayerResponse = response
            .json()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        if let Some(playability) = &player.playability_status {
            if playability.status != "OK" {
                // LOGIN_REQUIRED / UNPLAYABLE: the host is refusing this
                // client identity, not reporting a transient fault.
                return Err(UpstreamUnavailable::new(
                    PROVIDER_NAME,
                    playability
                        .reason
                        .clone()
                        .unwrap_or_else(|| playability.status.clone()),
                ));
            }
        }

        let details = player
            .video_details
            .ok_or_else(|| UpstreamUnavailable::new(PROVIDER_NAME, "no videoDetails in response"))?;

        let thumbnail_url = details
            .thumbnail
            .map(|set| best_thumbnail(set.thumbnails, video_id))
            .unwrap_or_else(|| derived_thumbnail_url(video_id));

        Ok(VideoMetadata {
            title: details.title,
            thumbnail_url,
        })
    }
}

/// Highest-resolution thumbnail wins.
fn best_thumbnail(mut thumbnails: Vec<Thumbnail>, video_id: &str) -> String {
    thumbnails.sort_by_key(|t| t.width as u64 * t.height as u64);
    thumbnails
        .pop()
        .map(|t| t.url)
        .unwrap_or_else(|| derived_thumbnail_url(video_id))
}
