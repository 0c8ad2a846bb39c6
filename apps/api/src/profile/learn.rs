//! Model-assisted profile learning: authored samples → analysis prompt →
//! model → lenient validation → structural merge.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::ModelCaller;
use crate::models::email::EmailMessage;
use crate::models::profile::{ProfileUpdate, UserProfile};
use crate::profile::merge::merge_profile;
use crate::profile::prompts::{build_profile_prompt, format_samples};
use crate::thread::cleaner::BodyCleaner;
use crate::validation::{parse_json, validate_profile_update};

/// Asks the model to describe the author of `messages` and returns the
/// validated update. Nothing is merged here.
pub async fn analyze_profile(
    model: &dyn ModelCaller,
    email: &str,
    messages: &[EmailMessage],
    cleaner: &dyn BodyCleaner,
) -> Result<ProfileUpdate, AppError> {
    let cleaned: Vec<String> = messages.iter().map(|m| cleaner.clean(&m.body)).collect();
    let samples = format_samples(cleaned.iter().map(String::as_str));
    if samples.is_empty() {
        return Err(AppError::Validation(
            "at least one non-empty message is required".to_string(),
        ));
    }

    let prompt = build_profile_prompt(email, &samples);
    let response = model.complete(&prompt, JSON_ONLY_SYSTEM).await;
    let raw = response.text().ok_or_else(|| {
        AppError::generation(
            response
                .error
                .clone()
                .unwrap_or_else(|| "model returned no text".to_string()),
        )
    })?;

    let value = parse_json(raw)
        .ok_or_else(|| AppError::generation("profile analysis was not valid JSON"))?;
    validate_profile_update(&value).map_err(|failure| {
        warn!("Profile analysis for {email} rejected: {failure}");
        AppError::generation(format!("profile analysis rejected: {}", failure.reason))
    })
}

/// Learns from `messages` and merges the result into `current`.
pub async fn learn_profile(
    model: &dyn ModelCaller,
    current: &UserProfile,
    messages: &[EmailMessage],
    cleaner: &dyn BodyCleaner,
) -> Result<UserProfile, AppError> {
    let update = analyze_profile(model, &current.email, messages, cleaner).await?;
    let merged = merge_profile(current, &update);
    info!(
        "Learned profile for {} from {} messages ({} rules)",
        merged.email,
        messages.len(),
        merged.rules.len()
    );
    Ok(merged)
}
