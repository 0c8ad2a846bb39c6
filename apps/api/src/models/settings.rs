use serde::{Deserialize, Serialize};

/// Per-request generation settings supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplySettings {
    /// 1 (very casual) to 5 (very formal). Out-of-range values render as neutral.
    pub formality_level: u8,
    /// `short`, `medium` or `long`. Anything else renders as moderate.
    pub response_length: String,
    pub custom_instructions: Option<String>,
    pub signature: String,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            formality_level: 3,
            response_length: "medium".to_string(),
            custom_instructions: None,
            signature: String::new(),
        }
    }
}
