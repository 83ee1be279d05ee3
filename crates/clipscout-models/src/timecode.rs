//! Timecode conversion between `HH:MM:SS` strings and whole seconds.
//!
//! Moments are addressed with second precision; fractional timestamps are
//! not accepted. Supports `MM:SS` and `HH:MM:SS` on input and always emits
//! the zero-padded three-segment form.

use thiserror::Error;

/// A timecode string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTimecode {
    /// Wrong number of `:`-separated segments (only 2 or 3 are accepted).
    #[error("invalid timecode '{0}': expected MM:SS or HH:MM:SS")]
    SegmentCount(String),
    /// A segment was not a non-negative integer.
    #[error("invalid {component} in timecode '{input}'")]
    NonNumeric {
        input: String,
        component: &'static str,
    },
}

/// Parse a `MM:SS` or `HH:MM:SS` timecode into total seconds.
///
/// # Examples
/// ```
/// use clipscout_models::timecode::to_seconds;
/// assert_eq!(to_seconds("02:35").unwrap(), 155);
/// assert_eq!(to_seconds("01:30:45").unwrap(), 5445);
/// ```
pub fn to_seconds(text: &str) -> Result<u64, MalformedTimecode> {
    let text = text.trim();
    let parts: Vec<&str> = text.split(':').collect();

    let parse = |part: &str, component: &'static str| -> Result<u64, MalformedTimecode> {
        part.parse::<u64>().map_err(|_| MalformedTimecode::NonNumeric {
            input: text.to_string(),
            component,
        })
    };

    match parts.as_slice() {
        [m, s] => {
            let minutes = parse(m, "minutes")?;
            let seconds = parse(s, "seconds")?;
            Ok(minutes * 60 + seconds)
        }
        [h, m, s] => {
            let hours = parse(h, "hours")?;
            let minutes = parse(m, "minutes")?;
            let seconds = parse(s, "seconds")?;
            Ok(hours * 3600 + minutes * 60 + seconds)
        }
        _ => Err(MalformedTimecode::SegmentCount(text.to_string())),
    }
}

/// Format total seconds as a zero-padded `HH:MM:SS` timecode.
///
/// # Examples
/// ```
/// use clipscout_models::timecode::to_timecode;
/// assert_eq!(to_timecode(155), "00:02:35");
/// assert_eq!(to_timecode(5445), "01:30:45");
/// ```
pub fn to_timecode(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
