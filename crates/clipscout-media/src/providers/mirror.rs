//! Tertiary provider: a public mirror API.
//!
//! Best-effort with a short timeout. By the time the chain reaches this
//! tier the host itself has refused twice, so a hanging mirror must not
//! hold up resolution.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::MetadataConfig;
use crate::identity::client_identity;
use crate::metadata::{derived_thumbnail_url, MetadataProvider, UpstreamUnavailable, VideoMetadata};

const PROVIDER_NAME: &str = "mirror";

#[derive(Debug, Deserialize)]
struct MirrorResponse {
    title: Option<String>,
    #[serde(rename = "videoThumbnails", default)]
    video_thumbnails: Vec<MirrorThumbnail>,
}

#[derive(Debug, Deserialize)]
struct MirrorThumbnail {
    url: String,
}

pub struct MirrorProvider {
    base: String,
    client: Client,
}

impl MirrorProvider {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            base: config.mirror_base.clone(),
            client: Client::builder()
                .timeout(config.mirror_timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MetadataProvider for MirrorProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(
        &self,
        video_id: &str,
        attempt: u32,
    ) -> Result<VideoMetadata, UpstreamUnavailable> {
        let url = format!("{}/api/v1/videos/{}", self.base, video_id);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", client_identity(attempt))
            .send()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamUnavailable::new(
                PROVIDER_NAME,
                format!("status {}", response.status()),
            ));
        }

        let mirror: MirrorResponse = response
            .json()
            .await
            .map_err(|e| UpstreamUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        let title = mirror
            .title
            .ok_or_else(|| UpstreamUnavailable::new(PROVIDER_NAME, "no title in response"))?;

        let thumbnail_url = mirror
            .video_thumbnails
            .into_iter()
            .next()
            .map(|t| t.url)
            .unwrap_or_else(|| derived_thumbnail_url(video_id));

        Ok(VideoMetadata {
            title,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> MirrorProvider {
        MirrorProvider::new(&MetadataConfig {
            mirror_base: server.uri(),
            ..MetadataConfig::default()
        })
    }

    #[tokio::test]
    async fn test_fetch_takes_first_thumbnail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/videos/dQw4w9WgXcQ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Mirror Title",
                "videoThumbnails": [
                    { "url": "https://mirror.test/first.jpg" },
                    { "url": "https://mirror.test/second.jpg" }
                ]
            })))
            .mount(&server)
            .await;

        let metadata = provider_for(&server).fetch("dQw4w9WgXcQ", 0).await.unwrap();
        assert_eq!(metadata.title, "Mirror Title");
        assert_eq!(metadata.thumbnail_url, "https://mirror.test/first.jpg");
    }

    #[tokio::test]
    async fn test_fetch_requires_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "videoThumbnails": [] })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch("dQw4w9WgXcQ", 0).await.unwrap_err();
        assert_eq!(err.provider, "mirror");
    }
}
