use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One message as read from a thread source. Body is plain text, uncleaned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadMessage {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub date: DateTime<Utc>,
}

/// A message whose body has already been cleaned and size-capped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub date: DateTime<Utc>,
    pub body: String,
}

/// Bounded context bundle for the message being replied to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailContext {
    pub thread_id: String,
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub is_reply: bool,
    pub previous_messages: Vec<EmailMessage>,
}
