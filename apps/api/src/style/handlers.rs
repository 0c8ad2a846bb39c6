//! Axum route handlers for the writing style API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::email::EmailMessage;
use crate::models::style::{StyleCaps, WritingStyle};
use crate::profile::handlers::{require_email, EmailQuery};
use crate::state::AppState;
use crate::store::{load_style, save_style};
use crate::style::merge::improve_from_threads;
use crate::style::signals::analyze_style;
use crate::thread::extractor::Thread;

#[derive(Debug, Deserialize)]
pub struct StyleLearnRequest {
    pub email: String,
    /// Messages the user wrote.
    pub messages: Vec<EmailMessage>,
}

#[derive(Debug, Deserialize)]
pub struct StyleImproveRequest {
    pub email: String,
    pub threads: Vec<Thread>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleImproveResponse {
    pub style: WritingStyle,
    pub threads_improved: usize,
}

/// GET /api/v1/style?email=
pub async fn handle_get_style(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<WritingStyle>, AppError> {
    let email = require_email(&params.email)?;
    Ok(Json(load_style(&state.db, email).await?))
}

/// POST /api/v1/style/learn
///
/// Re-analyzes the style from scratch and replaces the stored one.
pub async fn handle_learn_style(
    State(state): State<AppState>,
    Json(request): Json<StyleLearnRequest>,
) -> Result<Json<WritingStyle>, AppError> {
    let email = require_email(&request.email)?;
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }

    let style = analyze_style(
        &request.messages,
        state.cleaner.as_ref(),
        StyleCaps::default(),
    );
    save_style(&state.db, email, &style).await?;
    info!(
        "Re-analyzed style for {email} from {} messages",
        request.messages.len()
    );

    Ok(Json(style))
}

/// POST /api/v1/style/improve
///
/// Folds the user's messages from each thread into the stored style. Threads
/// that yield nothing are skipped.
pub async fn handle_improve_style(
    State(state): State<AppState>,
    Json(request): Json<StyleImproveRequest>,
) -> Result<Json<StyleImproveResponse>, AppError> {
    let email = require_email(&request.email)?;

    let current = load_style(&state.db, email).await?;
    let (style, threads_improved) = improve_from_threads(
        &current,
        &request.threads,
        email,
        state.cleaner.as_ref(),
        StyleCaps::default(),
    );
    if threads_improved > 0 {
        save_style(&state.db, email, &style).await?;
    }
    info!(
        "Improved style for {email} from {threads_improved}/{} threads",
        request.threads.len()
    );

    Ok(Json(StyleImproveResponse {
        style,
        threads_improved,
    }))
}
