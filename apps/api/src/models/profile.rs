use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAIT_SCORE: u8 = 3;
pub const DEFAULT_ROLE: &str = "professional";
pub const DEFAULT_COMMUNICATION_STYLE: &str = "balanced";
/// Cap on every `patterns.*` and `vocabulary.*` list.
pub const MAX_PROFILE_LIST_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub role: String,
    pub expertise: Vec<String>,
    pub communication_style: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            role: DEFAULT_ROLE.to_string(),
            expertise: Vec::new(),
            communication_style: DEFAULT_COMMUNICATION_STYLE.to_string(),
        }
    }
}

/// Personality traits, each scored 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personality {
    pub formality: u8,
    pub directness: u8,
    pub warmth: u8,
    pub detail_level: u8,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            formality: DEFAULT_TRAIT_SCORE,
            directness: DEFAULT_TRAIT_SCORE,
            warmth: DEFAULT_TRAIT_SCORE,
            detail_level: DEFAULT_TRAIT_SCORE,
        }
    }
}

/// Phrases bucketed by audience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhraseSet {
    pub formal: Vec<String>,
    pub casual: Vec<String>,
    pub client: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patterns {
    pub greetings: PhraseSet,
    pub closings: PhraseSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub common: Vec<String>,
    pub avoided: Vec<String>,
    pub professional: Vec<String>,
}

/// Persisted summary of who the user is and how they behave over email.
/// Keyed by `email`, which is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: Option<String>,
    pub identity: Identity,
    pub personality: Personality,
    pub patterns: Patterns,
    pub vocabulary: Vocabulary,
    pub rules: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Fresh profile with defaults, as created on first access.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            identity: Identity::default(),
            personality: Personality::default(),
            patterns: Patterns::default(),
            vocabulary: Vocabulary::default(),
            rules: Vec::new(),
            last_updated: None,
        }
    }
}

/// Partial phrase set. Missing buckets merge as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseSetUpdate {
    pub formal: Vec<String>,
    pub casual: Vec<String>,
    pub client: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsUpdate {
    pub greetings: PhraseSetUpdate,
    pub closings: PhraseSetUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyUpdate {
    pub common: Vec<String>,
    pub avoided: Vec<String>,
    pub professional: Vec<String>,
}

/// Update produced by the model or by a caller, already validated.
/// `identity` and `personality` replace wholesale when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub identity: Option<Identity>,
    pub personality: Option<Personality>,
    pub patterns: Option<PatternsUpdate>,
    pub vocabulary: Option<VocabularyUpdate>,
    pub rules: Vec<String>,
}
