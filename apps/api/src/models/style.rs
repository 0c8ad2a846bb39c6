use serde::{Deserialize, Serialize};

pub const FORMALITY_VERY_CASUAL: u8 = 1;
pub const FORMALITY_CASUAL: u8 = 2;
pub const FORMALITY_NEUTRAL: u8 = 3;
pub const FORMALITY_FORMAL: u8 = 4;
pub const FORMALITY_VERY_FORMAL: u8 = 5;

pub const DEFAULT_GREETINGS: &[&str] = &["Hi", "Hello"];
pub const DEFAULT_CLOSINGS: &[&str] = &["Best regards", "Thanks"];
pub const DEFAULT_AVERAGE_SENTENCE_LENGTH: u32 = 15;
pub const DEFAULT_PUNCTUATION_STYLE: &str = "standard";

/// Typical length of the user's emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl EmailLength {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short" => Some(EmailLength::Short),
            "medium" => Some(EmailLength::Medium),
            "long" => Some(EmailLength::Long),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailLength::Short => "short",
            EmailLength::Medium => "medium",
            EmailLength::Long => "long",
        }
    }
}

/// Signals mined from one batch of authored messages. Never persisted directly;
/// always folded into a `WritingStyle` through the style merger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSignals {
    pub greetings: Vec<String>,
    pub closings: Vec<String>,
    pub sentence_patterns: Vec<String>,
    pub formality_level: Option<u8>,
    pub punctuation_style: Option<String>,
}

/// Persisted summary of the user's phrasing habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingStyle {
    pub greetings: Vec<String>,
    pub closings: Vec<String>,
    pub sentence_patterns: Vec<String>,
    pub vocabulary: Vec<String>,
    pub formality_level: u8,
    pub average_sentence_length: u32,
    pub email_length: EmailLength,
    pub punctuation_style: String,
}

impl Default for WritingStyle {
    fn default() -> Self {
        Self {
            greetings: DEFAULT_GREETINGS.iter().map(|s| s.to_string()).collect(),
            closings: DEFAULT_CLOSINGS.iter().map(|s| s.to_string()).collect(),
            sentence_patterns: Vec::new(),
            vocabulary: Vec::new(),
            formality_level: FORMALITY_NEUTRAL,
            average_sentence_length: DEFAULT_AVERAGE_SENTENCE_LENGTH,
            email_length: EmailLength::Medium,
            punctuation_style: DEFAULT_PUNCTUATION_STYLE.to_string(),
        }
    }
}

/// Maximum retained entries per list field of a `WritingStyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleCaps {
    pub greetings: usize,
    pub closings: usize,
    pub sentence_patterns: usize,
    pub vocabulary: usize,
}

impl Default for StyleCaps {
    fn default() -> Self {
        Self {
            greetings: 5,
            closings: 5,
            sentence_patterns: 10,
            vocabulary: 20,
        }
    }
}
