//! Reply drafting: orchestrates the full pipeline for one target message.
//!
//! Flow: extract_context_from → extract_key_info → build_reply_prompt →
//!       model call → finalize_reply.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::postprocess::finalize_reply;
use crate::generation::prompts::build_reply_prompt;
use crate::llm_client::prompts::REPLY_SYSTEM;
use crate::llm_client::ModelCaller;
use crate::models::settings::ReplySettings;
use crate::models::style::WritingStyle;
use crate::thread::cleaner::BodyCleaner;
use crate::thread::extractor::{extract_context_from, ThreadSource};
use crate::thread::key_info::{extract_key_info, KeyInfo};

/// A finished reply draft, signed and ready to show the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReply {
    pub draft_id: Uuid,
    pub thread_id: String,
    pub message_id: String,
    pub reply: String,
    pub key_info: KeyInfo,
}

/// Everything the drafting pipeline reads, borrowed from the caller.
pub struct DraftInput<'a> {
    pub thread: &'a (dyn ThreadSource + Sync),
    pub message_id: &'a str,
    pub style: &'a WritingStyle,
    pub settings: &'a ReplySettings,
    /// Configured prior-message cap; the extractor clamps it.
    pub context_cap: usize,
}

/// Drafts a reply to `input.message_id`.
///
/// A missing target message surfaces as `AppError::Thread`; a failed or empty
/// model response becomes `AppError::Generation` with the detail kept for logs.
pub async fn draft_reply(
    model: &dyn ModelCaller,
    cleaner: &dyn BodyCleaner,
    input: DraftInput<'_>,
) -> Result<DraftReply, AppError> {
    let context = extract_context_from(
        input.thread,
        input.message_id,
        input.context_cap,
        cleaner,
    )?;
    let key_info = extract_key_info(&context.body);
    let prompt = build_reply_prompt(&context, input.style, input.settings, Some(&key_info));

    let response = model.complete(&prompt, REPLY_SYSTEM).await;
    let Some(raw) = response.text() else {
        let detail = response
            .error
            .clone()
            .unwrap_or_else(|| "model returned no text".to_string());
        warn!(
            "Draft for message {} in thread {} failed: {detail}",
            context.message_id, context.thread_id
        );
        return Err(AppError::generation(detail));
    };

    let reply = finalize_reply(raw, input.style, input.settings);
    info!(
        "Drafted reply for message {} ({} prior messages, {} sentiment, {} chars)",
        context.message_id,
        context.previous_messages.len(),
        key_info.sentiment.as_str(),
        reply.chars().count()
    );

    Ok(DraftReply {
        draft_id: Uuid::new_v4(),
        thread_id: context.thread_id,
        message_id: context.message_id,
        reply,
        key_info,
    })
}
