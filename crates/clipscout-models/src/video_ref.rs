//! Video reference resolution from user-pasted YouTube URLs.
//!
//! URLs are treated as untrusted input. Only YouTube domains are accepted
//! and video IDs are strictly validated (11 chars, alphanumeric plus `-_`).
//! Resolution is pure string work, no network access.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A URL that could not be resolved to a YouTube video.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidVideoUrl {
    /// The host is not a YouTube domain.
    #[error("'{0}' is not a YouTube URL")]
    NotYoutube(String),
    /// No 11-character video ID could be located in the URL.
    #[error("could not find a valid video ID in '{0}'")]
    IdNotFound(String),
}

/// Playback offsets carried by an embed URL's `start`/`end` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlaybackOffsets {
    pub start_seconds: Option<u64>,
    pub end_seconds: Option<u64>,
}

/// Resolved identity of a source video.
///
/// Created once per analysis session and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoRef {
    /// Extracted 11-character video ID
    pub video_id: String,
    /// The original user-supplied URL
    pub source_url: String,
}

impl VideoRef {
    /// Resolve a user-supplied URL into a video reference.
    ///
    /// Recognized forms, in priority order:
    /// 1. `https://youtu.be/VIDEO_ID` (shortened host path)
    /// 2. `https://youtube.com/embed/VIDEO_ID` (embed path)
    /// 3. `https://youtube.com/watch?v=VIDEO_ID` (query parameter)
    pub fn resolve(url: &str) -> Result<Self, InvalidVideoUrl> {
        let trimmed = url.trim();

        if !is_youtube_host(trimmed) {
            return Err(InvalidVideoUrl::NotYoutube(trimmed.to_string()));
        }

        let candidate = extract_from_short_url(trimmed)
            .or_else(|| extract_from_embed_url(trimmed))
            .or_else(|| extract_from_watch_url(trimmed));

        match candidate {
            Some(id) if is_valid_video_id(&id) => Ok(Self {
                video_id: id,
                source_url: trimmed.to_string(),
            }),
            _ => Err(InvalidVideoUrl::IdNotFound(trimmed.to_string())),
        }
    }

    /// The canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    /// Offsets carried by the source URL itself.
    ///
    /// Embed URLs often arrive with `start`/`end` query parameters already
    /// set; callers can seed playback from these without re-deriving them
    /// from a moment record.
    pub fn playback_offsets(&self) -> PlaybackOffsets {
        let parsed = match Url::parse(&self.source_url) {
            Ok(u) => u,
            Err(_) => return PlaybackOffsets::default(),
        };

        let mut offsets = PlaybackOffsets::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "start" => offsets.start_seconds = value.parse().ok(),
                "end" => offsets.end_seconds = value.parse().ok(),
                _ => {}
            }
        }
        offsets
    }
}

fn is_youtube_host(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Extract ID from `youtu.be/VIDEO_ID`.
fn extract_from_short_url(url: &str) -> Option<String> {
    let pos = url.find("youtu.be/")?;
    take_id_segment(&url[pos + "youtu.be/".len()..])
}

/// Extract ID from `youtube.com/embed/VIDEO_ID`.
fn extract_from_embed_url(url: &str) -> Option<String> {
    let pos = url.find("/embed/")?;
    take_id_segment(&url[pos + "/embed/".len()..])
}

/// Extract ID from `watch?v=VIDEO_ID` (first `v=` query parameter).
fn extract_from_watch_url(url: &str) -> Option<String> {
    let pos = url.find("?v=").or_else(|| url.find("&v="))?;
    take_id_segment(&url[pos + 3..])
}

/// Take the leading ID segment up to the next URL delimiter.
fn take_id_segment(segment: &str) -> Option<String> {
    let end = segment
        .find(|c| ['&', '#', '?', '/'].contains(&c))
        .unwrap_or(segment.len());
    if end == 0 {
        return None;
    }
    Some(segment[..end].trim().to_string())
}

/// Video IDs are exactly 11 characters of `[A-Za-z0-9_-]`.
fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
