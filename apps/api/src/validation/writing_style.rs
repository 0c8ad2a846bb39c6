use serde_json::Value;

use crate::models::style::{
    EmailLength, StyleCaps, WritingStyle, DEFAULT_AVERAGE_SENTENCE_LENGTH, DEFAULT_CLOSINGS,
    DEFAULT_GREETINGS, DEFAULT_PUNCTUATION_STYLE, FORMALITY_NEUTRAL,
};
use crate::style::merge::priority_merge;
use crate::validation::{int_in_range, require_object, string_field, string_list, ValidationResult};

/// Upper bound accepted for a stored average sentence length.
const MAX_AVERAGE_SENTENCE_LENGTH: i64 = 200;

fn defaults(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Validates a decoded `WritingStyle`. Every field is defaulted independently:
///
/// | field | when missing/invalid |
/// |---|---|
/// | `greetings` | `DEFAULT_GREETINGS` |
/// | `closings` | `DEFAULT_CLOSINGS` |
/// | `sentencePatterns`, `vocabulary` | `[]` |
/// | `formalityLevel` (outside 1..=5) | 3 |
/// | `averageSentenceLength` | 15 |
/// | `emailLength` (not short/medium/long) | `medium` |
/// | `punctuationStyle` | `standard` |
///
/// List fields are deduplicated and capped. Only a non-object fails.
pub fn validate_writing_style(data: &Value) -> ValidationResult<WritingStyle> {
    let obj = require_object(data, "WritingStyle")?;
    let caps = StyleCaps::default();

    let greetings = string_list(obj, "greetings").unwrap_or_else(|| defaults(DEFAULT_GREETINGS));
    let closings = string_list(obj, "closings").unwrap_or_else(|| defaults(DEFAULT_CLOSINGS));
    let sentence_patterns = string_list(obj, "sentencePatterns").unwrap_or_default();
    let vocabulary = string_list(obj, "vocabulary").unwrap_or_default();

    Ok(WritingStyle {
        greetings: priority_merge(&greetings, &[], caps.greetings),
        closings: priority_merge(&closings, &[], caps.closings),
        sentence_patterns: priority_merge(&sentence_patterns, &[], caps.sentence_patterns),
        vocabulary: priority_merge(&vocabulary, &[], caps.vocabulary),
        formality_level: int_in_range(obj, "formalityLevel", 1, 5)
            .map(|n| n as u8)
            .unwrap_or(FORMALITY_NEUTRAL),
        average_sentence_length: int_in_range(
            obj,
            "averageSentenceLength",
            0,
            MAX_AVERAGE_SENTENCE_LENGTH,
        )
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_AVERAGE_SENTENCE_LENGTH),
        email_length: obj
            .get("emailLength")
            .and_then(Value::as_str)
            .and_then(EmailLength::parse)
            .unwrap_or_default(),
        punctuation_style: string_field(obj, "punctuationStyle")
            .unwrap_or_else(|| DEFAULT_PUNCTUATION_STYLE.to_string()),
    })
}
