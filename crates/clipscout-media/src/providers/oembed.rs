//! Secondary provider: the host's oEmbed endpoint.
//!
//! Far more stable than the player endpoint but carries less data (no
//! resolution choices for the thumbnail). Single attempt: if oEmbed is
//! down the mirror tier takes over.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::MetadataConfig;
use crate::metadata::{derived_thumbnail_url, MetadataProvider, UpstreamUnavailable, VideoMetadata};

const PROVIDER_NAME: &str = "oembed";

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    thumbnail_url: Option<String>,
}

pub struct OEmbedProvider {
    base: String,
    client: Client,
}

impl OEmbedProvider {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            base: config.host_base.clone(),
            client: Client::builder()
                .timeout(config.primary_timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MetadataProvider for OEmbedProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(
        &self,
        video_id: &str,
        _attempt: u32,
    ) -> Result<VideoMetadata, UpstreamUnavailable> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let url = format!(
            "{}/oembed?url={}&format=json",
            self.base,
            urlencoding::encode(&watch_url)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamUnavailable::new(
                PROVIDER_NAME,
                format!("status {}", response.status()),
            ));
        }

        let oembed: OEmbedResponse = response
            .json()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        Ok(VideoMetadata {
            title: oembed.title.unwrap_or_else(|| "YouTube Video".to_string()),
            thumbnail_url: oembed
                .thumbnail_url
                .unwrap_or_else(|| derived_thumbnail_url(video_id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OEmbedProvider {
        OEmbedProvider::new(&MetadataConfig {
            host_base: server.uri(),
            ..MetadataConfig::default()
        })
    }

    #[tokio::test]
    async fn test_fetch_parses_oembed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oembed"))
            .and(query_param(
                "url",
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Never Gonna Give You Up",
                "thumbnail_url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
            })))
            .mount(&server)
            .await;

        let metadata = provider_for(&server).fetch("dQw4w9WgXcQ", 0).await.unwrap();
        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert_eq!(
            metadata.thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[tokio::test]
    async fn test_fetch_derives_thumbnail_when_payload_omits_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "T" })))
            .mount(&server)
            .await;

        let metadata = provider_for(&server).fetch("dQw4w9WgXcQ", 0).await.unwrap();
        assert_eq!(
            metadata.thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch("dQw4w9WgXcQ", 0).await.unwrap_err();
        assert_eq!(err.provider, "oembed");
    }
}
