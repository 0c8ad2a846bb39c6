//! Thread context extraction: builds the bounded `EmailContext` for one
//! target message out of an ordered thread.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::email::{EmailContext, EmailMessage, ThreadMessage};
use crate::thread::cleaner::BodyCleaner;

/// Hard ceiling on prior messages carried in a context, whatever the configured cap.
pub const MAX_PREVIOUS_MESSAGES: usize = 10;
/// Maximum characters of a prior message body, marker included.
pub const MAX_PREVIOUS_BODY_CHARS: usize = 5000;
pub const TRUNCATION_MARKER: &str = "\n[... message truncated]";

#[derive(Debug, Error, PartialEq)]
pub enum ThreadError {
    #[error("Message {message_id} not found in thread")]
    MessageNotFound { message_id: String },

    #[error("Thread unavailable: {0}")]
    Unavailable(String),
}

impl ThreadError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ThreadError::MessageNotFound { .. } => "MESSAGE_NOT_FOUND",
            ThreadError::Unavailable(_) => "THREAD_UNAVAILABLE",
        }
    }

    /// Human-readable fallback safe to show end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            ThreadError::MessageNotFound { .. } => {
                "The selected message could not be found in this thread."
            }
            ThreadError::Unavailable(_) => "This conversation could not be loaded.",
        }
    }
}

/// Read-only access to an ordered thread.
pub trait ThreadSource {
    fn thread_id(&self) -> &str;
    fn messages(&self) -> Result<Vec<ThreadMessage>, ThreadError>;
}

/// A thread already materialized in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub messages: Vec<ThreadMessage>,
}

impl ThreadSource for Thread {
    fn thread_id(&self) -> &str {
        &self.id
    }

    fn messages(&self) -> Result<Vec<ThreadMessage>, ThreadError> {
        if self.messages.is_empty() {
            return Err(ThreadError::Unavailable(format!(
                "thread {} has no messages",
                self.id
            )));
        }
        Ok(self.messages.clone())
    }
}

/// Builds the context for `message_id`.
///
/// `previous_messages` holds the messages strictly before the target, keeping
/// only the last `min(cap, MAX_PREVIOUS_MESSAGES)`. Each prior body is cleaned
/// and truncated to `MAX_PREVIOUS_BODY_CHARS`.
pub fn extract_context(
    thread_id: &str,
    messages: &[ThreadMessage],
    message_id: &str,
    cap: usize,
    cleaner: &dyn BodyCleaner,
) -> Result<EmailContext, ThreadError> {
    let index = messages
        .iter()
        .position(|m| m.id == message_id)
        .ok_or_else(|| ThreadError::MessageNotFound {
            message_id: message_id.to_string(),
        })?;
    let target = &messages[index];

    let keep = cap.min(MAX_PREVIOUS_MESSAGES);
    let start = index.saturating_sub(keep);
    let previous_messages: Vec<EmailMessage> = messages[start..index]
        .iter()
        .map(|m| EmailMessage {
            from: m.from.clone(),
            to: m.to.clone(),
            date: m.date,
            body: truncate_body(&cleaner.clean(&m.body), MAX_PREVIOUS_BODY_CHARS),
        })
        .collect();

    debug!(
        "Extracted context for message {message_id}: position {index}, {} prior messages",
        previous_messages.len()
    );

    Ok(EmailContext {
        thread_id: thread_id.to_string(),
        message_id: target.id.clone(),
        from: target.from.clone(),
        to: target.to.clone(),
        subject: target.subject.clone(),
        body: cleaner.clean(&target.body),
        date: target.date,
        is_reply: index > 0,
        previous_messages,
    })
}

/// Reads the messages from a `ThreadSource`, then runs `extract_context`.
pub fn extract_context_from(
    source: &dyn ThreadSource,
    message_id: &str,
    cap: usize,
    cleaner: &dyn BodyCleaner,
) -> Result<EmailContext, ThreadError> {
    let messages = source.messages()?;
    extract_context(source.thread_id(), &messages, message_id, cap, cleaner)
}

/// Truncates to at most `max_chars` characters, marker included.
fn truncate_body(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut truncated: String = body.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::cleaner::DefaultBodyCleaner;
    use chrono::{TimeZone, Utc};

    fn make_thread(n: usize) -> Vec<ThreadMessage> {
        (0..n)
            .map(|i| ThreadMessage {
                id: format!("m{i}"),
                from: format!("sender{i}@example.com"),
                to: "jane@example.com".to_string(),
                subject: "Quarterly planning".to_string(),
                body: format!("Message number {i}."),
                date: Utc.with_ymd_and_hms(2024, 3, 1, 9, i as u32, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let thread = make_thread(3);
        let err = extract_context("t1", &thread, "nope", 5, &DefaultBodyCleaner).unwrap_err();
        assert_eq!(
            err,
            ThreadError::MessageNotFound {
                message_id: "nope".to_string()
            }
        );
        assert_eq!(err.code(), "MESSAGE_NOT_FOUND");
    }

    #[test]
    fn test_first_message_is_not_reply() {
        let thread = make_thread(3);
        let ctx = extract_context("t1", &thread, "m0", 5, &DefaultBodyCleaner).unwrap();
        assert!(!ctx.is_reply);
        assert!(ctx.previous_messages.is_empty());
        assert_eq!(ctx.thread_id, "t1");
        assert_eq!(ctx.subject, "Quarterly planning");
    }

    #[test]
    fn test_previous_count_is_min_of_position_and_cap() {
        let thread = make_thread(14);
        for cap in [0usize, 1, 3, 5, 10, 25] {
            for k in 0..thread.len() {
                let ctx = extract_context("t", &thread, &format!("m{k}"), cap, &DefaultBodyCleaner)
                    .unwrap();
                let effective = cap.min(MAX_PREVIOUS_MESSAGES);
                assert_eq!(ctx.previous_messages.len(), k.min(effective));
                assert_eq!(ctx.is_reply, k > 0);
            }
        }
    }

    #[test]
    fn test_previous_messages_are_the_most_recent_ones() {
        let thread = make_thread(8);
        let ctx = extract_context("t", &thread, "m7", 3, &DefaultBodyCleaner).unwrap();
        let senders: Vec<&str> = ctx.previous_messages.iter().map(|m| m.from.as_str()).collect();
        assert_eq!(
            senders,
            vec!["sender4@example.com", "sender5@example.com", "sender6@example.com"]
        );
    }

    #[test]
    fn test_long_prior_body_is_truncated_with_marker() {
        let mut thread = make_thread(2);
        thread[0].body = "x".repeat(8000);
        let ctx = extract_context("t", &thread, "m1", 5, &DefaultBodyCleaner).unwrap();
        let body = &ctx.previous_messages[0].body;
        assert!(body.chars().count() <= MAX_PREVIOUS_BODY_CHARS);
        assert!(body.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let thread = make_thread(4);
        let before = thread.clone();
        let _ = extract_context("t", &thread, "m3", 2, &DefaultBodyCleaner).unwrap();
        assert_eq!(thread, before);
    }

    #[test]
    fn test_extract_from_thread_source() {
        let thread = Thread {
            id: "thread-9".to_string(),
            messages: make_thread(2),
        };
        let ctx = extract_context_from(&thread, "m1", 5, &DefaultBodyCleaner).unwrap();
        assert_eq!(ctx.thread_id, "thread-9");
        assert!(ctx.is_reply);
    }

    #[test]
    fn test_empty_thread_is_unavailable() {
        let thread = Thread {
            id: "thread-0".to_string(),
            messages: Vec::new(),
        };
        let err = extract_context_from(&thread, "m0", 5, &DefaultBodyCleaner).unwrap_err();
        assert!(matches!(err, ThreadError::Unavailable(_)));
        assert_eq!(err.code(), "THREAD_UNAVAILABLE");
    }
}
