//! Reply post-processing: signature and closing enforcement on raw model text.

use crate::models::settings::ReplySettings;
use crate::models::style::WritingStyle;

/// Closing used when the style has none recorded.
pub const FALLBACK_CLOSING: &str = "Best regards";

/// Non-blank closings from the style, or the fallback when there are none.
fn known_closings(style: &WritingStyle) -> Vec<&str> {
    let closings: Vec<&str> = style
        .closings
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if closings.is_empty() {
        vec![FALLBACK_CLOSING]
    } else {
        closings
    }
}

/// Trims the model output and appends the user's signature.
///
/// When no known closing appears in the text, the style's first closing (or
/// `FALLBACK_CLOSING`) goes in front of the signature. Text that already
/// carries the signature is returned trimmed, so re-applying is a no-op.
pub fn finalize_reply(raw: &str, style: &WritingStyle, settings: &ReplySettings) -> String {
    let text = raw.trim();
    let signature = settings.signature.trim();

    if signature.is_empty() || text.contains(signature) {
        return text.to_string();
    }

    let closings = known_closings(style);
    let lowered = text.to_lowercase();
    if closings
        .iter()
        .any(|c| lowered.contains(&c.to_lowercase()))
    {
        return format!("{text}\n{signature}");
    }

    format!("{text}\n\n{}\n{signature}", closings[0])
}
