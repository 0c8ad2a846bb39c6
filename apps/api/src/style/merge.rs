//! Style merging: folds freshly extracted signals into the persisted style.
//!
//! Newly observed values always take priority: list fields are rebuilt as
//! `dedup(extracted ++ current)` and truncated to the field's cap.

use tracing::{debug, warn};

use crate::models::email::EmailMessage;
use crate::models::style::{StyleCaps, StyleSignals, WritingStyle};
use crate::style::signals::extract_style_signals;
use crate::thread::cleaner::BodyCleaner;
use crate::thread::extractor::ThreadSource;

/// `dedup(incoming ++ current)` truncated to `cap`. First occurrence wins;
/// blank entries are dropped.
pub fn priority_merge(incoming: &[String], current: &[String], cap: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(cap.min(incoming.len() + current.len()));
    for value in incoming.iter().chain(current.iter()) {
        if merged.len() >= cap {
            break;
        }
        let value = value.trim();
        if value.is_empty() || merged.iter().any(|m| m == value) {
            continue;
        }
        merged.push(value.to_string());
    }
    merged
}

/// Averages two formality levels, rounding half away from zero.
pub fn average_formality(current: u8, extracted: u8) -> u8 {
    ((f64::from(current) + f64::from(extracted)) / 2.0).round() as u8
}

/// Merges extracted signals into `current`.
///
/// `average_sentence_length` and `email_length` always come from `current`;
/// signals never carry them.
pub fn merge_style(
    current: &WritingStyle,
    extracted: &StyleSignals,
    caps: StyleCaps,
) -> WritingStyle {
    WritingStyle {
        greetings: priority_merge(&extracted.greetings, &current.greetings, caps.greetings),
        closings: priority_merge(&extracted.closings, &current.closings, caps.closings),
        sentence_patterns: priority_merge(
            &extracted.sentence_patterns,
            &current.sentence_patterns,
            caps.sentence_patterns,
        ),
        vocabulary: priority_merge(&[], &current.vocabulary, caps.vocabulary),
        formality_level: extracted
            .formality_level
            .map(|level| average_formality(current.formality_level, level))
            .unwrap_or(current.formality_level),
        average_sentence_length: current.average_sentence_length,
        email_length: current.email_length,
        punctuation_style: extracted
            .punctuation_style
            .clone()
            .unwrap_or_else(|| current.punctuation_style.clone()),
    }
}

/// Extracts signals from `messages` and merges them into `current`.
pub fn learn_from_messages(
    current: &WritingStyle,
    messages: &[EmailMessage],
    cleaner: &dyn BodyCleaner,
    caps: StyleCaps,
) -> WritingStyle {
    let signals = extract_style_signals(messages, cleaner);
    merge_style(current, &signals, caps)
}

/// Bare address from a `From` value such as `"Jane <jane@x.com>"`.
fn sender_address(from: &str) -> &str {
    if let Some(start) = from.rfind('<') {
        if let Some(end) = from[start..].find('>') {
            return from[start + 1..start + end].trim();
        }
    }
    from.trim()
}

/// Improves `current` from the messages `user_email` wrote in one thread.
///
/// Best effort: a thread that cannot be read, or holds nothing authored by the
/// user, yields `None` and is logged rather than propagated.
pub fn improve_from_thread(
    current: &WritingStyle,
    thread: &dyn ThreadSource,
    user_email: &str,
    cleaner: &dyn BodyCleaner,
    caps: StyleCaps,
) -> Option<WritingStyle> {
    let messages = match thread.messages() {
        Ok(messages) => messages,
        Err(e) => {
            warn!(
                "Style improvement skipped for thread {}: {e}",
                thread.thread_id()
            );
            return None;
        }
    };

    let authored: Vec<EmailMessage> = messages
        .into_iter()
        .filter(|m| sender_address(&m.from).eq_ignore_ascii_case(user_email.trim()))
        .map(|m| EmailMessage {
            from: m.from,
            to: m.to,
            date: m.date,
            body: m.body,
        })
        .collect();

    if authored.is_empty() {
        debug!(
            "Thread {} has no messages from {user_email}; nothing to learn",
            thread.thread_id()
        );
        return None;
    }

    Some(learn_from_messages(current, &authored, cleaner, caps))
}

/// Folds `improve_from_thread` over several threads. Returns the final style
/// and how many threads contributed.
pub fn improve_from_threads<T: ThreadSource>(
    current: &WritingStyle,
    threads: &[T],
    user_email: &str,
    cleaner: &dyn BodyCleaner,
    caps: StyleCaps,
) -> (WritingStyle, usize) {
    let mut style = current.clone();
    let mut improved = 0;
    for thread in threads {
        if let Some(updated) = improve_from_thread(&style, thread, user_email, cleaner, caps) {
            style = updated;
            improved += 1;
        }
    }
    (style, improved)
}
