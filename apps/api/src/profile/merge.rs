//! Profile merging: structural merge of a validated `ProfileUpdate` into a
//! `UserProfile`. Inputs from outside must already have passed validation.

use chrono::{DateTime, Utc};

use crate::models::profile::{
    PhraseSet, PhraseSetUpdate, ProfileUpdate, UserProfile, Vocabulary, VocabularyUpdate,
    MAX_PROFILE_LIST_ENTRIES,
};
use crate::style::merge::priority_merge;

fn merge_phrase_set(current: &PhraseSet, update: &PhraseSetUpdate) -> PhraseSet {
    PhraseSet {
        formal: priority_merge(&update.formal, &current.formal, MAX_PROFILE_LIST_ENTRIES),
        casual: priority_merge(&update.casual, &current.casual, MAX_PROFILE_LIST_ENTRIES),
        client: priority_merge(&update.client, &current.client, MAX_PROFILE_LIST_ENTRIES),
    }
}

fn merge_vocabulary(current: &Vocabulary, update: &VocabularyUpdate) -> Vocabulary {
    Vocabulary {
        common: priority_merge(&update.common, &current.common, MAX_PROFILE_LIST_ENTRIES),
        avoided: priority_merge(&update.avoided, &current.avoided, MAX_PROFILE_LIST_ENTRIES),
        professional: priority_merge(
            &update.professional,
            &current.professional,
            MAX_PROFILE_LIST_ENTRIES,
        ),
    }
}

/// Set union that keeps existing rules in place and appends unseen ones.
fn union_rules(current: &[String], update: &[String]) -> Vec<String> {
    let mut rules = current.to_vec();
    for rule in update {
        if !rules.contains(rule) {
            rules.push(rule.clone());
        }
    }
    rules
}

/// Merges `update` into `current`, stamping `last_updated` with `now`.
///
/// * `identity` / `personality` are replaced wholesale when present.
/// * `patterns.*` / `vocabulary.*` become `dedup(update ++ current)` capped at 10.
/// * `rules` is a set union with no cap and no reordering.
/// * `email` never changes.
pub fn merge_profile_at(
    current: &UserProfile,
    update: &ProfileUpdate,
    now: DateTime<Utc>,
) -> UserProfile {
    let mut merged = current.clone();

    if let Some(name) = &update.name {
        merged.name = Some(name.clone());
    }
    if let Some(identity) = &update.identity {
        merged.identity = identity.clone();
    }
    if let Some(personality) = update.personality {
        merged.personality = personality;
    }
    if let Some(patterns) = &update.patterns {
        merged.patterns.greetings =
            merge_phrase_set(&current.patterns.greetings, &patterns.greetings);
        merged.patterns.closings =
            merge_phrase_set(&current.patterns.closings, &patterns.closings);
    }
    if let Some(vocabulary) = &update.vocabulary {
        merged.vocabulary = merge_vocabulary(&current.vocabulary, vocabulary);
    }
    merged.rules = union_rules(&current.rules, &update.rules);
    merged.last_updated = Some(now);

    merged
}

pub fn merge_profile(current: &UserProfile, update: &ProfileUpdate) -> UserProfile {
    merge_profile_at(current, update, Utc::now())
}
