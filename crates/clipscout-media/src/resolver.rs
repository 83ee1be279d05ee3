//! Clip resolution: moment in, playable descriptor out.
//!
//! Two tiers: a real render when the external backend is configured and
//! healthy, otherwise an embeddable reference with precomputed offsets.
//! The embed tier is always constructible from data already in hand, so
//! apart from the duration check this function cannot fail.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use clipscout_models::timecode::MalformedTimecode;
use clipscout_models::{ClipDescriptor, ClipMode, MomentRecord, VideoRef};

use crate::metadata::MetadataFetcher;
use crate::render::RenderBackend;

/// Hard ceiling on clip length, distinct from discovery's soft 8-30s
/// target.
pub const MAX_CLIP_SECONDS: i64 = 60;

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Caller-input error: the moment spans a non-positive or over-long
    /// duration. Never retried, never masked.
    #[error("invalid clip duration: {duration_seconds}s (must be between 1 and {MAX_CLIP_SECONDS})")]
    InvalidClipDuration { duration_seconds: i64 },

    #[error(transparent)]
    Timecode(#[from] MalformedTimecode),
}

/// Resolves validated moments into clip descriptors.
pub struct ClipResolver {
    metadata: MetadataFetcher,
    render: Option<Arc<dyn RenderBackend>>,
}

impl ClipResolver {
    pub fn new(metadata: MetadataFetcher, render: Option<Arc<dyn RenderBackend>>) -> Self {
        Self { metadata, render }
    }

    /// Resolve a moment into a playable clip descriptor.
    pub async fn resolve(
        &self,
        video: &VideoRef,
        moment: &MomentRecord,
    ) -> ResolveResult<ClipDescriptor> {
        let start_seconds = moment.start_seconds()? as i64;
        let end_seconds = moment.end_seconds()? as i64;
        let duration_seconds = end_seconds - start_seconds;

        if duration_seconds <= 0 || duration_seconds > MAX_CLIP_SECONDS {
            return Err(ResolveError::InvalidClipDuration { duration_seconds });
        }

        let start_seconds = start_seconds as u64;
        let end_seconds = end_seconds as u64;

        // Tier 1: real render, when the backend exists.
        if let Some(backend) = &self.render {
            match backend.render(video, moment).await {
                Ok(clip_path) => {
                    info!(
                        video_id = %video.video_id,
                        moment_id = moment.moment_id,
                        "Resolved moment to a rendered clip"
                    );
                    return Ok(ClipDescriptor {
                        mode: ClipMode::Rendered,
                        locator: clip_path,
                        share_url: None,
                        start_seconds,
                        end_seconds,
                        title: None,
                        thumbnail_url: None,
                        degraded: false,
                    });
                }
                Err(e) => {
                    warn!(
                        video_id = %video.video_id,
                        error = %e,
                        "Render backend failed, degrading to embed reference"
                    );
                }
            }
        }

        // Tier 2: embeddable reference with offsets. Metadata lookup never
        // fails, so neither does this tier.
        let metadata = self.metadata.fetch(&video.video_id).await;

        info!(
            video_id = %video.video_id,
            moment_id = moment.moment_id,
            "Resolved moment to an embed reference"
        );
        Ok(ClipDescriptor {
            mode: ClipMode::Embed,
            locator: embed_url(&video.video_id, start_seconds, end_seconds),
            share_url: Some(share_url(&video.video_id, start_seconds)),
            start_seconds,
            end_seconds,
            title: Some(metadata.title),
            thumbnail_url: Some(metadata.thumbnail_url),
            degraded: true,
        })
    }
}

/// Embeddable player URL carrying the clip offsets.
fn embed_url(video_id: &str, start_seconds: u64, end_seconds: u64) -> String {
    format!(
        "https://www.youtube.com/embed/{}?start={}&end={}&autoplay=1",
        video_id, start_seconds, end_seconds
    )
}

/// Shareable watch URL seeded at the clip start.
fn share_url(video_id: &str, start_seconds: u64) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&t={}s",
        video_id, start_seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataConfig;
    use crate::render::{MockRenderBackend, RenderError};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn moment(start: &str, end: &str, duration: u64) -> MomentRecord {
        MomentRecord {
            moment_id: 1,
            description: "test moment".to_string(),
            timestamp_start: start.to_string(),
            timestamp_end: end.to_string(),
            duration_seconds: duration,
            why_its_tiktok_funny: "it lands".to_string(),
            suggested_caption_hook: "watch this".to_string(),
        }
    }

    fn video() -> VideoRef {
        VideoRef::resolve("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    /// A fetcher whose every provider tier is down, so it degrades to the
    /// last-resort values without touching the network.
    fn offline_metadata() -> MetadataFetcher {
        MetadataFetcher::with_providers(vec![])
    }

    /// A fetcher pointed at unreachable provider endpoints.
    async fn failing_metadata() -> (MetadataFetcher, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let fetcher = MetadataFetcher::new(MetadataConfig {
            host_base: server.uri(),
            mirror_base: server.uri(),
            primary_attempts: 2,
            primary_retry_delay: std::time::Duration::ZERO,
            ..MetadataConfig::default()
        });
        (fetcher, server)
    }

    #[tokio::test]
    async fn test_resolve_rejects_duration_over_ceiling() {
        let resolver = ClipResolver::new(offline_metadata(), None);
        let err = resolver
            .resolve(&video(), &moment("00:00:10", "00:01:20", 70))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidClipDuration {
                duration_seconds: 70
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_positive_duration() {
        let resolver = ClipResolver::new(offline_metadata(), None);
        let err = resolver
            .resolve(&video(), &moment("00:01:00", "00:01:00", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidClipDuration { .. }));
    }

    #[tokio::test]
    async fn test_resolve_uses_render_backend_when_available() {
        let mut backend = MockRenderBackend::new();
        backend
            .expect_render()
            .returning(|_, _| Ok("/clips/tiktok-clip-1.mp4".to_string()));

        let resolver = ClipResolver::new(offline_metadata(), Some(Arc::new(backend)));
        let descriptor = resolver
            .resolve(&video(), &moment("00:00:10", "00:00:25", 15))
            .await
            .unwrap();

        assert_eq!(descriptor.mode, ClipMode::Rendered);
        assert_eq!(descriptor.locator, "/clips/tiktok-clip-1.mp4");
        assert!(!descriptor.degraded);
        assert_eq!(descriptor.start_seconds, 10);
        assert_eq!(descriptor.end_seconds, 25);
    }

    #[tokio::test]
    async fn test_resolve_degrades_when_render_backend_errors() {
        let mut backend = MockRenderBackend::new();
        backend.expect_render().returning(|_, _| {
            Err(RenderError::RequestFailed("connection refused".to_string()))
        });

        let resolver = ClipResolver::new(offline_metadata(), Some(Arc::new(backend)));
        let descriptor = resolver
            .resolve(&video(), &moment("00:00:10", "00:00:25", 15))
            .await
            .unwrap();

        assert_eq!(descriptor.mode, ClipMode::Embed);
        assert!(descriptor.degraded);
    }

    #[tokio::test]
    async fn test_resolve_embed_with_all_providers_down() {
        // Render backend absent and every metadata provider failing: still
        // a full descriptor, with the thumbnail derived from the video id.
        let (fetcher, _server) = failing_metadata().await;
        let resolver = ClipResolver::new(fetcher, None);

        let descriptor = resolver
            .resolve(&video(), &moment("00:00:10", "00:00:25", 15))
            .await
            .unwrap();

        assert_eq!(descriptor.mode, ClipMode::Embed);
        assert!(descriptor.degraded);
        assert_eq!(
            descriptor.locator,
            "https://www.youtube.com/embed/dQw4w9WgXcQ?start=10&end=25&autoplay=1"
        );
        assert_eq!(
            descriptor.share_url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s")
        );
        assert_eq!(descriptor.title.as_deref(), Some("YouTube Video"));
        assert_eq!(
            descriptor.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
    }
}
