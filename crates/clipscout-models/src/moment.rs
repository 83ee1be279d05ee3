//! Moment records and their validation.
//!
//! A moment is one candidate segment of a source video. Records arrive as
//! untrusted JSON from a generative model, so construction goes through
//! [`MomentRecord::validate`], which checks field presence and types first,
//! then the ordering and duration-consistency invariants. Validation never
//! panics on malformed input; it returns a typed rejection naming the first
//! failing invariant so the caller can discard-and-continue (bulk discovery)
//! or fail the request (targeted discovery).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::timecode::{to_seconds, to_timecode, MalformedTimecode};

pub type RecordResult = Result<MomentRecord, RecordError>;

/// First failing invariant of a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is absent, empty, or of the wrong type.
    /// Unparseable timecode strings also land here: presence and type are
    /// one check tier.
    #[error("missing or invalid field '{0}'")]
    MissingField(&'static str),
    /// `timestamp_end` is not strictly after `timestamp_start`.
    #[error("timestamp_end must be after timestamp_start")]
    BadOrder,
    /// `duration_seconds` disagrees with the timestamp span.
    #[error("duration_seconds is {actual} but the timestamps span {expected} seconds")]
    DurationMismatch { expected: u64, actual: u64 },
}

/// One candidate segment with a rationale for its short-form appeal.
///
/// Immutable once validated. Wire field names follow the generative model's
/// output schema so responses deserialize without renaming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MomentRecord {
    /// Unique within a result set; sequential for bulk discovery,
    /// timestamp-derived for targeted discovery.
    pub moment_id: u64,

    /// What happens in this moment
    pub description: String,

    /// Normalized `HH:MM:SS` start timecode
    pub timestamp_start: String,

    /// Normalized `HH:MM:SS` end timecode
    pub timestamp_end: String,

    /// Whole seconds between start and end
    pub duration_seconds: u64,

    /// Why this moment would perform well as a short clip
    pub why_its_tiktok_funny: String,

    /// Suggested engagement caption
    pub suggested_caption_hook: String,
}

impl MomentRecord {
    /// Validate an untrusted JSON value into a moment record.
    ///
    /// Timecodes are normalized to the three-segment form on acceptance, so
    /// a record that validates always round-trips through [`to_seconds`].
    pub fn validate(raw: &Value) -> RecordResult {
        let Some(obj) = raw.as_object() else {
            // A non-object has every field missing; report the first.
            return Err(RecordError::MissingField("moment_id"));
        };

        let moment_id = obj
            .get("moment_id")
            .and_then(Value::as_u64)
            .ok_or(RecordError::MissingField("moment_id"))?;

        let description = require_text(obj.get("description"), "description")?;

        let start_text = require_text(obj.get("timestamp_start"), "timestamp_start")?;
        let start_seconds = to_seconds(&start_text)
            .map_err(|_| RecordError::MissingField("timestamp_start"))?;

        let end_text = require_text(obj.get("timestamp_end"), "timestamp_end")?;
        let end_seconds =
            to_seconds(&end_text).map_err(|_| RecordError::MissingField("timestamp_end"))?;

        let duration_seconds = obj
            .get("duration_seconds")
            .and_then(Value::as_u64)
            .ok_or(RecordError::MissingField("duration_seconds"))?;

        let why_its_tiktok_funny = obj
            .get("why_its_tiktok_funny")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("why_its_tiktok_funny"))?
            .to_string();

        let suggested_caption_hook = obj
            .get("suggested_caption_hook")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("suggested_caption_hook"))?
            .to_string();

        if start_seconds >= end_seconds {
            return Err(RecordError::BadOrder);
        }

        let expected = end_seconds - start_seconds;
        if duration_seconds != expected {
            return Err(RecordError::DurationMismatch {
                expected,
                actual: duration_seconds,
            });
        }

        Ok(Self {
            moment_id,
            description,
            timestamp_start: to_timecode(start_seconds),
            timestamp_end: to_timecode(end_seconds),
            duration_seconds,
            why_its_tiktok_funny,
            suggested_caption_hook,
        })
    }

    /// Start offset in seconds.
    pub fn start_seconds(&self) -> Result<u64, MalformedTimecode> {
        to_seconds(&self.timestamp_start)
    }

    /// End offset in seconds.
    pub fn end_seconds(&self) -> Result<u64, MalformedTimecode> {
        to_seconds(&self.timestamp_end)
    }
}

fn require_text(value: Option<&Value>, field: &'static str) -> Result<String, RecordError> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(RecordError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Value {
        json!({
            "moment_id": 1,
            "description": "Unexpected reaction to surprising event",
            "timestamp_start": "00:12:30",
            "timestamp_end": "00:12:39",
            "duration_seconds": 9,
            "why_its_tiktok_funny": "Genuine surprise plays well in short form",
            "suggested_caption_hook": "When Monday hits you like..."
        })
    }

    #[test]
    fn test_validate_accepts_consistent_record() {
        let record = MomentRecord::validate(&candidate()).unwrap();
        assert_eq!(record.moment_id, 1);
        assert_eq!(record.timestamp_start, "00:12:30");
        assert_eq!(record.duration_seconds, 9);
    }

    #[test]
    fn test_validate_normalizes_timecodes() {
        let mut raw = candidate();
        raw["timestamp_start"] = json!("2:35");
        raw["timestamp_end"] = json!("2:45");
        raw["duration_seconds"] = json!(10);
        let record = MomentRecord::validate(&raw).unwrap();
        assert_eq!(record.timestamp_start, "00:02:35");
        assert_eq!(record.timestamp_end, "00:02:45");
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let mut raw = candidate();
        raw.as_object_mut().unwrap().remove("description");
        assert_eq!(
            MomentRecord::validate(&raw),
            Err(RecordError::MissingField("description"))
        );
    }

    #[test]
    fn test_validate_rejects_empty_description() {
        let mut raw = candidate();
        raw["description"] = json!("   ");
        assert_eq!(
            MomentRecord::validate(&raw),
            Err(RecordError::MissingField("description"))
        );
    }

    #[test]
    fn test_validate_rejects_non_numeric_duration() {
        let mut raw = candidate();
        raw["duration_seconds"] = json!("nine");
        assert_eq!(
            MomentRecord::validate(&raw),
            Err(RecordError::MissingField("duration_seconds"))
        );
    }

    #[test]
    fn test_validate_rejects_unparseable_timecode() {
        let mut raw = candidate();
        raw["timestamp_end"] = json!("12 minutes in");
        assert_eq!(
            MomentRecord::validate(&raw),
            Err(RecordError::MissingField("timestamp_end"))
        );
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut raw = candidate();
        raw["timestamp_start"] = json!("00:12:39");
        raw["timestamp_end"] = json!("00:12:30");
        assert_eq!(MomentRecord::validate(&raw), Err(RecordError::BadOrder));
    }

    #[test]
    fn test_validate_rejects_end_equal_to_start() {
        let mut raw = candidate();
        raw["timestamp_end"] = json!("00:12:30");
        assert_eq!(MomentRecord::validate(&raw), Err(RecordError::BadOrder));
    }

    #[test]
    fn test_validate_rejects_duration_mismatch() {
        let mut raw = candidate();
        raw["duration_seconds"] = json!(15);
        assert_eq!(
            MomentRecord::validate(&raw),
            Err(RecordError::DurationMismatch {
                expected: 9,
                actual: 15
            })
        );
    }

    #[test]
    fn test_validate_rejects_non_object() {
        assert!(MomentRecord::validate(&json!([1, 2, 3])).is_err());
        assert!(MomentRecord::validate(&json!("moment")).is_err());
    }

    #[test]
    fn test_seconds_accessors() {
        let record = MomentRecord::validate(&candidate()).unwrap();
        assert_eq!(record.start_seconds().unwrap(), 750);
        assert_eq!(record.end_seconds().unwrap(), 759);
    }
}
