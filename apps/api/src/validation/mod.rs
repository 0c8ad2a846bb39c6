//! Defensive validation of loosely-typed structured data.
//!
//! Everything coming from the model or from storage passes through here before
//! the mergers see it. Recoverable gaps are filled with documented defaults;
//! only a missing hard-required field is a failure.

pub mod profile;
pub mod schema;
pub mod writing_style;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub use profile::{validate_profile_update, validate_user_profile};
pub use writing_style::validate_writing_style;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Validation failed: {reason}")]
pub struct ValidationFailure {
    pub reason: String,
}

impl ValidationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationFailure>;

/// Parses raw text (optionally wrapped in markdown fences) as JSON.
/// Malformed text is logged and yields `None`.
pub fn parse_json(text: &str) -> Option<Value> {
    match serde_json::from_str(strip_json_fences(text)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Discarding malformed JSON ({e}): {:?}",
                text.chars().take(80).collect::<String>()
            );
            None
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Top level must be a JSON object.
pub(crate) fn require_object<'a>(
    data: &'a Value,
    shape: &str,
) -> ValidationResult<&'a Map<String, Value>> {
    data.as_object()
        .ok_or_else(|| ValidationFailure::new(format!("{shape} must be a JSON object")))
}

/// String elements of an array field; `None` when the field is missing or not an array.
pub(crate) fn string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    obj.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

pub(crate) fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Integer in `[min, max]`; integral floats such as `2.0` are accepted.
pub(crate) fn int_in_range(
    obj: &Map<String, Value>,
    key: &str,
    min: i64,
    max: i64,
) -> Option<i64> {
    let value = obj.get(key)?;
    let n = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })?;
    (min..=max).contains(&n).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_plain() {
        let value = parse_json(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(value["email"], "a@b.c");
    }

    #[test]
    fn test_parse_json_strips_fences() {
        let value = parse_json("```json\n{\"warmth\": 4}\n```").unwrap();
        assert_eq!(value["warmth"], 4);
        assert!(parse_json("```\n[1, 2]\n```").unwrap().is_array());
    }

    #[test]
    fn test_parse_json_malformed_is_none() {
        assert!(parse_json("{not json").is_none());
        assert!(parse_json("").is_none());
        assert!(parse_json("Sure! Here is the profile.").is_none());
    }

    #[test]
    fn test_int_in_range() {
        let obj = serde_json::json!({"a": 2, "b": 2.0, "c": 2.5, "d": 9, "e": "3"});
        let obj = obj.as_object().unwrap();
        assert_eq!(int_in_range(obj, "a", 1, 5), Some(2));
        assert_eq!(int_in_range(obj, "b", 1, 5), Some(2));
        assert_eq!(int_in_range(obj, "c", 1, 5), None);
        assert_eq!(int_in_range(obj, "d", 1, 5), None);
        assert_eq!(int_in_range(obj, "e", 1, 5), None);
        assert_eq!(int_in_range(obj, "missing", 1, 5), None);
    }
}
