//! Axum route handlers for the profile API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::email::EmailMessage;
use crate::models::profile::UserProfile;
use crate::profile::learn::learn_profile;
use crate::profile::merge::merge_profile;
use crate::state::AppState;
use crate::store::{load_profile, save_profile};
use crate::validation::validate_profile_update;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfilePatchRequest {
    pub email: String,
    /// Raw partial profile; validated before merging.
    pub update: Value,
}

#[derive(Debug, Deserialize)]
pub struct ProfileLearnRequest {
    pub email: String,
    pub messages: Vec<EmailMessage>,
}

pub(crate) fn require_email(email: &str) -> Result<&str, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    Ok(email)
}

/// GET /api/v1/profile?email=
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<UserProfile>, AppError> {
    let email = require_email(&params.email)?;
    Ok(Json(load_profile(&state.db, email).await?))
}

/// PATCH /api/v1/profile
///
/// Merges a caller-supplied partial profile. Malformed sections are dropped by
/// validation; a non-object update is rejected.
pub async fn handle_patch_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfilePatchRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let email = require_email(&request.email)?;
    let update = validate_profile_update(&request.update)?;

    let current = load_profile(&state.db, email).await?;
    let merged = merge_profile(&current, &update);
    save_profile(&state.db, &merged).await?;

    Ok(Json(merged))
}

/// POST /api/v1/profile/learn
///
/// Runs model-assisted analysis over authored messages and merges the result.
pub async fn handle_learn_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileLearnRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let email = require_email(&request.email)?;
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }

    let current = load_profile(&state.db, email).await?;
    let learned = learn_profile(
        state.model.as_ref(),
        &current,
        &request.messages,
        state.cleaner.as_ref(),
    )
    .await?;
    save_profile(&state.db, &learned).await?;

    Ok(Json(learned))
}
