//! Axum route handlers for the reply drafting API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::generator::{draft_reply, DraftInput, DraftReply};
use crate::models::settings::ReplySettings;
use crate::state::AppState;
use crate::store::load_style;
use crate::thread::extractor::Thread;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    /// Whose voice to write in; selects the stored writing style.
    pub email: String,
    pub thread: Thread,
    pub message_id: String,
    #[serde(default)]
    pub settings: ReplySettings,
}

/// POST /api/v1/replies/draft
///
/// Drafts a reply to one message of the supplied thread in the user's voice.
pub async fn handle_draft_reply(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<DraftReply>, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if request.message_id.trim().is_empty() {
        return Err(AppError::Validation("messageId cannot be empty".to_string()));
    }

    let style = load_style(&state.db, request.email.trim()).await?;

    let draft = draft_reply(
        state.model.as_ref(),
        state.cleaner.as_ref(),
        DraftInput {
            thread: &request.thread,
            message_id: &request.message_id,
            style: &style,
            settings: &request.settings,
            context_cap: state.config.max_context_messages,
        },
    )
    .await?;

    Ok(Json(draft))
}
