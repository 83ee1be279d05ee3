//! Shared data models for the ClipScout backend.
//!
//! This crate provides Serde-serializable types for:
//! - Timecode conversion between `HH:MM:SS` strings and seconds
//! - Video references resolved from user-pasted YouTube URLs
//! - Moment records (candidate clips) and their validation
//! - Clip descriptors returned by resolution
//!
//! Everything here is pure data handling: no I/O, no async.

pub mod clip;
pub mod moment;
pub mod timecode;
pub mod video_ref;

// Re-export common types
pub use clip::{ClipDescriptor, ClipMode};
pub use moment::{MomentRecord, RecordError, RecordResult};
pub use timecode::{to_seconds, to_timecode, MalformedTimecode};
pub use video_ref::{InvalidVideoUrl, PlaybackOffsets, VideoRef};
