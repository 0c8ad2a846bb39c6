use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::profile::{
    Identity, Patterns, PatternsUpdate, Personality, PhraseSet, PhraseSetUpdate, ProfileUpdate,
    UserProfile, Vocabulary, VocabularyUpdate, DEFAULT_COMMUNICATION_STYLE, DEFAULT_ROLE,
    DEFAULT_TRAIT_SCORE, MAX_PROFILE_LIST_ENTRIES,
};
use crate::style::merge::priority_merge;
use crate::validation::{
    int_in_range, require_object, string_field, string_list, ValidationFailure, ValidationResult,
};

fn object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

fn capped_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    let values = string_list(obj, key).unwrap_or_default();
    priority_merge(&values, &[], MAX_PROFILE_LIST_ENTRIES)
}

fn trait_score(obj: &Map<String, Value>, key: &str) -> u8 {
    int_in_range(obj, key, 1, 5)
        .map(|n| n as u8)
        .unwrap_or(DEFAULT_TRAIT_SCORE)
}

fn identity_from(obj: &Map<String, Value>) -> Identity {
    Identity {
        role: string_field(obj, "role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        expertise: priority_merge(
            &string_list(obj, "expertise").unwrap_or_default(),
            &[],
            usize::MAX,
        ),
        communication_style: string_field(obj, "communicationStyle")
            .unwrap_or_else(|| DEFAULT_COMMUNICATION_STYLE.to_string()),
    }
}

/// Each trait is checked on its own; an invalid sibling never affects the others.
fn personality_from(obj: &Map<String, Value>) -> Personality {
    Personality {
        formality: trait_score(obj, "formality"),
        directness: trait_score(obj, "directness"),
        warmth: trait_score(obj, "warmth"),
        detail_level: trait_score(obj, "detailLevel"),
    }
}

fn phrase_set_from(obj: Option<&Map<String, Value>>) -> PhraseSet {
    let empty = Map::new();
    let obj = obj.unwrap_or(&empty);
    PhraseSet {
        formal: capped_list(obj, "formal"),
        casual: capped_list(obj, "casual"),
        client: capped_list(obj, "client"),
    }
}

fn vocabulary_from(obj: Option<&Map<String, Value>>) -> Vocabulary {
    let empty = Map::new();
    let obj = obj.unwrap_or(&empty);
    Vocabulary {
        common: capped_list(obj, "common"),
        avoided: capped_list(obj, "avoided"),
        professional: capped_list(obj, "professional"),
    }
}

fn rules_from(obj: &Map<String, Value>) -> Vec<String> {
    priority_merge(&string_list(obj, "rules").unwrap_or_default(), &[], usize::MAX)
}

/// Validates a decoded `UserProfile`.
///
/// `email` is the only hard requirement. Nested objects that are missing or
/// malformed fall back to defaults; personality traits default to 3 each.
pub fn validate_user_profile(data: &Value) -> ValidationResult<UserProfile> {
    let obj = require_object(data, "UserProfile")?;
    let email = string_field(obj, "email")
        .ok_or_else(|| ValidationFailure::new("missing required field: email"))?;

    let patterns = object(obj, "patterns");
    let last_updated = obj
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(UserProfile {
        email,
        name: string_field(obj, "name"),
        identity: object(obj, "identity")
            .map(identity_from)
            .unwrap_or_default(),
        personality: personality_from(object(obj, "personality").unwrap_or(&Map::new())),
        patterns: Patterns {
            greetings: phrase_set_from(patterns.and_then(|p| object(p, "greetings"))),
            closings: phrase_set_from(patterns.and_then(|p| object(p, "closings"))),
        },
        vocabulary: vocabulary_from(object(obj, "vocabulary")),
        rules: rules_from(obj),
        last_updated,
    })
}

fn phrase_set_update_from(obj: Option<&Map<String, Value>>) -> PhraseSetUpdate {
    let set = phrase_set_from(obj);
    PhraseSetUpdate {
        formal: set.formal,
        casual: set.casual,
        client: set.client,
    }
}

/// Validates a partial update, typically parsed from model output.
///
/// Every field is optional; sections that are present but malformed are
/// dropped rather than failing the whole update. A present `personality`
/// object always yields a full `Personality` with per-field defaults.
pub fn validate_profile_update(data: &Value) -> ValidationResult<ProfileUpdate> {
    let obj = require_object(data, "ProfileUpdate")?;

    Ok(ProfileUpdate {
        name: string_field(obj, "name"),
        identity: object(obj, "identity").map(identity_from),
        personality: object(obj, "personality").map(personality_from),
        patterns: object(obj, "patterns").map(|p| PatternsUpdate {
            greetings: phrase_set_update_from(object(p, "greetings")),
            closings: phrase_set_update_from(object(p, "closings")),
        }),
        vocabulary: object(obj, "vocabulary").map(|v| {
            let vocabulary = vocabulary_from(Some(v));
            VocabularyUpdate {
                common: vocabulary.common,
                avoided: vocabulary.avoided,
                professional: vocabulary.professional,
            }
        }),
        rules: rules_from(obj),
    })
}
