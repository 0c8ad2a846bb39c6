//! Declarative schema descriptions for the persisted shapes. Data only; the
//! validators in this module do not interpret them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::profile::MAX_PROFILE_LIST_ENTRIES;
use crate::models::style::StyleCaps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl FieldSchema {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            min: None,
            max: None,
            max_items: None,
            allowed: None,
            default: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    fn allowed(mut self, values: &[&'static str]) -> Self {
        self.allowed = Some(values.to_vec());
        self
    }

    fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Field path (dotted for nested fields) → description.
pub type SchemaDescription = BTreeMap<&'static str, FieldSchema>;

pub fn writing_style_schema() -> SchemaDescription {
    use serde_json::json;
    let caps = StyleCaps::default();

    BTreeMap::from([
        (
            "greetings",
            FieldSchema::of(FieldType::Array)
                .max_items(caps.greetings)
                .default_value(json!(["Hi", "Hello"])),
        ),
        (
            "closings",
            FieldSchema::of(FieldType::Array)
                .max_items(caps.closings)
                .default_value(json!(["Best regards", "Thanks"])),
        ),
        (
            "sentencePatterns",
            FieldSchema::of(FieldType::Array)
                .max_items(caps.sentence_patterns)
                .default_value(json!([])),
        ),
        (
            "vocabulary",
            FieldSchema::of(FieldType::Array)
                .max_items(caps.vocabulary)
                .default_value(json!([])),
        ),
        (
            "formalityLevel",
            FieldSchema::of(FieldType::Integer)
                .range(1, 5)
                .default_value(json!(3)),
        ),
        (
            "averageSentenceLength",
            FieldSchema::of(FieldType::Integer)
                .range(0, 200)
                .default_value(json!(15)),
        ),
        (
            "emailLength",
            FieldSchema::of(FieldType::String)
                .allowed(&["short", "medium", "long"])
                .default_value(json!("medium")),
        ),
        (
            "punctuationStyle",
            FieldSchema::of(FieldType::String).default_value(json!("standard")),
        ),
    ])
}

pub fn user_profile_schema() -> SchemaDescription {
    use serde_json::json;
    let list = || {
        FieldSchema::of(FieldType::Array)
            .max_items(MAX_PROFILE_LIST_ENTRIES)
            .default_value(json!([]))
    };
    let score = || {
        FieldSchema::of(FieldType::Integer)
            .range(1, 5)
            .default_value(json!(3))
    };

    BTreeMap::from([
        ("email", FieldSchema::of(FieldType::String).required()),
        ("name", FieldSchema::of(FieldType::String)),
        ("identity", FieldSchema::of(FieldType::Object)),
        (
            "identity.role",
            FieldSchema::of(FieldType::String).default_value(json!("professional")),
        ),
        (
            "identity.expertise",
            FieldSchema::of(FieldType::Array).default_value(json!([])),
        ),
        (
            "identity.communicationStyle",
            FieldSchema::of(FieldType::String).default_value(json!("balanced")),
        ),
        ("personality", FieldSchema::of(FieldType::Object)),
        ("personality.formality", score()),
        ("personality.directness", score()),
        ("personality.warmth", score()),
        ("personality.detailLevel", score()),
        ("patterns", FieldSchema::of(FieldType::Object)),
        ("patterns.greetings.formal", list()),
        ("patterns.greetings.casual", list()),
        ("patterns.greetings.client", list()),
        ("patterns.closings.formal", list()),
        ("patterns.closings.casual", list()),
        ("patterns.closings.client", list()),
        ("vocabulary", FieldSchema::of(FieldType::Object)),
        ("vocabulary.common", list()),
        ("vocabulary.avoided", list()),
        ("vocabulary.professional", list()),
        (
            "rules",
            FieldSchema::of(FieldType::Array).default_value(json!([])),
        ),
        ("lastUpdated", FieldSchema::of(FieldType::String)),
    ])
}

/// Looks a schema up by its snake_case name.
pub fn schema_by_name(name: &str) -> Option<SchemaDescription> {
    match name {
        "writing_style" => Some(writing_style_schema()),
        "user_profile" => Some(user_profile_schema()),
        _ => None,
    }
}
