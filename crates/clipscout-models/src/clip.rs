//! Clip descriptors produced by resolution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the clip is backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipMode {
    /// A freshly rendered media file from the render backend
    Rendered,
    /// An embeddable reference to the original source with offsets
    Embed,
}

/// Result of resolving a moment into something playable.
///
/// Descriptors are created fresh per request and never cached: upstream
/// titles and thumbnails change, and a previous render may be stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClipDescriptor {
    pub mode: ClipMode,

    /// File path (rendered) or embeddable URL (embed)
    pub locator: String,

    /// Shareable watch URL seeded at the clip start, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,

    pub start_seconds: u64,
    pub end_seconds: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// True when any fallback layer was used to produce this descriptor
    pub degraded: bool,
}

impl ClipDescriptor {
    /// Duration of the clip in seconds.
    pub fn duration_seconds(&self) -> u64 {
        self.end_seconds.saturating_sub(self.start_seconds)
    }
}
