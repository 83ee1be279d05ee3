//! Structured-output recovery from free-form model text.
//!
//! Generative models frequently wrap valid JSON in prose or markdown code
//! fencing. Extraction is layered, first success wins:
//! 1. parse the whole (fence-stripped) text;
//! 2. scan for the first complete top-level `{...}` span, balanced and
//!    string-aware, and parse that;
//! 3. give up with a typed failure.
//!
//! No semantic validation happens here; that is the record validator's job.

use serde_json::Value;
use thiserror::Error;

/// The model response contained no parsable JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no parsable JSON object in model response")]
pub struct UnparsableResponse;

/// Extract the first JSON object from a model completion.
pub fn extract_json(text: &str) -> Result<Value, UnparsableResponse> {
    let text = strip_code_fences(text);

    // Layer 1: the whole text is a JSON document.
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    // Layer 2: first complete top-level object inside surrounding prose.
    if let Some(span) = first_balanced_object(text) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(UnparsableResponse)
}

/// Strip a leading/trailing markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Locate the first complete top-level `{...}` span.
///
/// Walks the text tracking brace depth, skipping string contents and
/// escapes, so braces inside JSON strings don't unbalance the scan. A
/// greedy first-to-last-brace match would happily span two unrelated
/// objects; this returns the first one that closes.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_clean_json() {
        let value = extract_json(r#"{"moment_id": 1}"#).unwrap();
        assert_eq!(value, json!({"moment_id": 1}));
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "```json\n{\"moment_id\": 1}\n```";
        assert_eq!(extract_json(text).unwrap(), json!({"moment_id": 1}));

        let bare_fence = "```\n{\"moment_id\": 2}\n```";
        assert_eq!(extract_json(bare_fence).unwrap(), json!({"moment_id": 2}));
    }

    #[test]
    fn test_extract_json_wrapped_in_prose() {
        let text = "Sure! Here is the moment you asked for:\n\n\
                    {\"moment_id\": 7, \"description\": \"a dog jumps\"}\n\n\
                    Let me know if you need anything else.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["moment_id"], 7);
    }

    #[test]
    fn test_extract_takes_first_complete_object() {
        let text = r#"first: {"a": 1} second: {"b": 2}"#;
        assert_eq!(extract_json(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_extract_handles_braces_inside_strings() {
        let text = r#"note {"caption": "use {fire} emoji }", "id": 3} trailing"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["id"], 3);
    }

    #[test]
    fn test_extract_handles_nested_objects() {
        let text = r#"prose {"outer": {"inner": {"deep": true}}} prose"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["outer"]["inner"]["deep"], true);
    }

    #[test]
    fn test_extract_fails_on_garbage() {
        assert_eq!(extract_json("no json here at all"), Err(UnparsableResponse));
        assert_eq!(extract_json("{ not: valid"), Err(UnparsableResponse));
        assert_eq!(extract_json(""), Err(UnparsableResponse));
    }

    #[test]
    fn test_extract_rejects_bare_array() {
        // Top-level arrays are not a recognized record shape.
        assert_eq!(extract_json("[1, 2, 3]"), Err(UnparsableResponse));
    }
}
