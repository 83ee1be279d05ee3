//! External render backend boundary.
//!
//! The renderer is costly, optional infrastructure consumed as a
//! collaborator: a moment in, a media file path out. Absence of the
//! backend is a normal condition, not an error: the resolver falls
//! through to an embeddable reference.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use clipscout_models::{MomentRecord, VideoRef};

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render request failed: {0}")]
    RequestFailed(String),

    #[error("render backend returned {status}: {body}")]
    BadStatus { status: u16, body: String },
}

/// A backend that can burn a moment to a real media file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Render the moment and return the output file path.
    async fn render(&self, video: &VideoRef, moment: &MomentRecord) -> RenderResult<String>;
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    #[serde(rename = "videoUrl")]
    video_url: &'a str,
    moment: &'a MomentRecord,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(rename = "clipPath")]
    clip_path: String,
}

/// HTTP client for the external render service.
pub struct HttpRenderBackend {
    base: String,
    client: Client,
}

impl HttpRenderBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: Client::new(),
        }
    }

    /// Construct from `RENDER_SERVICE_URL`, or `None` when the backend is
    /// not deployed.
    pub fn from_env() -> Option<Self> {
        std::env::var("RENDER_SERVICE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .map(Self::new)
    }
}

#[async_trait]
impl RenderBackend for HttpRenderBackend {
    async fn render(&self, video: &VideoRef, moment: &MomentRecord) -> RenderResult<String> {
        let url = format!("{}/render", self.base);
        let request = RenderRequest {
            video_url: &video.source_url,
            moment,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RenderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::BadStatus { status, body });
        }

        let rendered: RenderResponse = response
            .json()
            .await
            .map_err(|e| RenderError::RequestFailed(e.to_string()))?;

        info!(
            video_id = %video.video_id,
            moment_id = moment.moment_id,
            clip_path = %rendered.clip_path,
            "Render backend produced a clip"
        );
        Ok(rendered.clip_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn moment() -> MomentRecord {
        MomentRecord {
            moment_id: 4,
            description: "a perfect pratfall".to_string(),
            timestamp_start: "00:00:10".to_string(),
            timestamp_end: "00:00:20".to_string(),
            duration_seconds: 10,
            why_its_tiktok_funny: "physical comedy".to_string(),
            suggested_caption_hook: "wait for it".to_string(),
        }
    }

    #[tokio::test]
    async fn test_render_posts_moment_and_returns_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/render"))
            .and(body_partial_json(json!({
                "videoUrl": "https://youtu.be/dQw4w9WgXcQ",
                "moment": { "moment_id": 4 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "clipPath": "/clips/tiktok-clip-4.mp4",
                "success": true
            })))
            .mount(&server)
            .await;

        let backend = HttpRenderBackend::new(server.uri());
        let video = VideoRef::resolve("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let clip_path = backend.render(&video, &moment()).await.unwrap();
        assert_eq!(clip_path, "/clips/tiktok-clip-4.mp4");
    }

    #[tokio::test]
    async fn test_render_surfaces_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("bundle not found"))
            .mount(&server)
            .await;

        let backend = HttpRenderBackend::new(server.uri());
        let video = VideoRef::resolve("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let err = backend.render(&video, &moment()).await.unwrap_err();
        assert!(matches!(err, RenderError::BadStatus { status: 500, .. }));
    }
}
