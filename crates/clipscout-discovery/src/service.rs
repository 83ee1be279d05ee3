//! Moment discovery orchestration.
//!
//! `discover_many` and `discover_one` share the same pipeline (prompt,
//! one model invocation, syntactic extraction, per-record validation) but
//! differ deliberately in failure policy (see crate docs).

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use clipscout_models::{MomentRecord, VideoRef};

use crate::gemini::{GeminiClient, GeminiError};
use crate::prompt::{build_bulk_prompt, build_targeted_prompt};
use crate::response::{extract_json, UnparsableResponse};

/// Soft duration target for bulk discovery, seconds. Advisory only:
/// out-of-range records are kept.
const BULK_SOFT_DURATION: std::ops::RangeInclusive<u64> = 8..=30;

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Targeted discovery could not produce a usable moment. Carries the
    /// triggering condition for the user-visible message.
    #[error("no moment matching the instruction could be found: {0}")]
    MomentNotFound(String),
}

/// Internal bulk-path failure, converted to the canned fallback.
#[derive(Debug, Error)]
enum BulkFailure {
    #[error(transparent)]
    Model(#[from] GeminiError),
    #[error(transparent)]
    Parse(#[from] UnparsableResponse),
    #[error("response has no funniest_moments_list array")]
    MissingList,
    #[error("every record in the response failed validation")]
    NoValidRecords,
}

/// Orchestrates generative-model moment discovery.
pub struct MomentDiscoveryService {
    client: GeminiClient,
}

impl MomentDiscoveryService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Bulk discovery: propose 5-8 candidate moments for a video.
    ///
    /// Never fails the calling session. On any failure (network, parse,
    /// or all records invalid) returns the fixed canned fallback list
    /// instead, because bulk discovery is often the first interaction of a
    /// session.
    pub async fn discover_many(&self, video: &VideoRef) -> Vec<MomentRecord> {
        match self.try_discover_many(video).await {
            Ok(records) => {
                info!(
                    video_id = %video.video_id,
                    count = records.len(),
                    "Bulk discovery produced moments"
                );
                records
            }
            Err(e) => {
                warn!(
                    video_id = %video.video_id,
                    error = %e,
                    "Bulk discovery failed, using canned fallback moments"
                );
                fallback_moments()
            }
        }
    }

    async fn try_discover_many(&self, video: &VideoRef) -> Result<Vec<MomentRecord>, BulkFailure> {
        let prompt = build_bulk_prompt(video);
        let text = self
            .client
            .generate(&prompt, self.client.bulk_sampling())
            .await?;
        let value = extract_json(&text)?;

        let candidates = value
            .get("funniest_moments_list")
            .and_then(Value::as_array)
            .ok_or(BulkFailure::MissingList)?;

        // Discard-and-continue: one malformed record must not sink the batch.
        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match MomentRecord::validate(candidate) {
                Ok(record) => {
                    if !BULK_SOFT_DURATION.contains(&record.duration_seconds) {
                        debug!(
                            moment_id = record.moment_id,
                            duration = record.duration_seconds,
                            "Moment duration outside the 8-30s target, keeping anyway"
                        );
                    }
                    records.push(record);
                }
                Err(e) => {
                    warn!(error = %e, "Discarding invalid moment record");
                }
            }
        }

        if records.is_empty() {
            return Err(BulkFailure::NoValidRecords);
        }
        Ok(records)
    }

    /// Targeted discovery: find the one moment a free-text instruction
    /// describes.
    ///
    /// Unlike the bulk path this propagates a typed error on failure: the
    /// caller asked for something specific, and a canned answer would be
    /// worse than a visible miss.
    pub async fn discover_one(
        &self,
        video: &VideoRef,
        instruction: &str,
    ) -> DiscoveryResult<MomentRecord> {
        let moment_id = Utc::now().timestamp_millis() as u64;
        let prompt = build_targeted_prompt(video, instruction, moment_id);

        let text = self
            .client
            .generate(&prompt, self.client.targeted_sampling())
            .await
            .map_err(|e| DiscoveryError::MomentNotFound(e.to_string()))?;

        let value =
            extract_json(&text).map_err(|e| DiscoveryError::MomentNotFound(e.to_string()))?;

        let record = MomentRecord::validate(&value)
            .map_err(|e| DiscoveryError::MomentNotFound(e.to_string()))?;

        info!(
            video_id = %video.video_id,
            moment_id = record.moment_id,
            start = %record.timestamp_start,
            end = %record.timestamp_end,
            "Targeted discovery found a moment"
        );
        Ok(record)
    }
}

/// The fixed three-record fallback for bulk discovery.
///
/// Generic enough to be plausible for any long-form video; every record
/// passes validation.
pub fn fallback_moments() -> Vec<MomentRecord> {
    vec![
        MomentRecord {
            moment_id: 1,
            description: "Unexpected reaction to surprising event".to_string(),
            timestamp_start: "00:12:30".to_string(),
            timestamp_end: "00:12:39".to_string(),
            duration_seconds: 9,
            why_its_tiktok_funny:
                "The genuine surprise and over-the-top reaction is perfect for TikTok's reaction culture"
                    .to_string(),
            suggested_caption_hook: "When Monday hits you like...".to_string(),
        },
        MomentRecord {
            moment_id: 2,
            description: "Classic comedic timing with perfect punchline".to_string(),
            timestamp_start: "00:04:15".to_string(),
            timestamp_end: "00:04:25".to_string(),
            duration_seconds: 10,
            why_its_tiktok_funny: "The quick setup and delivery works well for short-form content"
                .to_string(),
            suggested_caption_hook: "This is why I have trust issues 😂".to_string(),
        },
        MomentRecord {
            moment_id: 3,
            description: "Hilarious physical comedy moment".to_string(),
            timestamp_start: "00:08:45".to_string(),
            timestamp_end: "00:08:53".to_string(),
            duration_seconds: 8,
            why_its_tiktok_funny:
                "Physical humor translates well across audiences and doesn't need language context"
                    .to_string(),
            suggested_caption_hook: "My coordination level on a scale of 1-10".to_string(),
        },
    ]
}
