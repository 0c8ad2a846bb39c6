//! Persistence of writing styles and user profiles as JSONB blobs keyed by
//! email. Every load is gated through the validators, so callers only ever see
//! well-formed values.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::models::profile::UserProfile;
use crate::models::style::WritingStyle;
use crate::validation::{validate_user_profile, validate_writing_style};

async fn load_blob(pool: &PgPool, table: Table, email: &str) -> Result<Option<Value>, sqlx::Error> {
    let sql = format!("SELECT data FROM {} WHERE email = $1", table.name());
    sqlx::query_scalar::<_, Value>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Clone, Copy)]
enum Table {
    WritingStyles,
    UserProfiles,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::WritingStyles => "writing_styles",
            Table::UserProfiles => "user_profiles",
        }
    }
}

/// Stored style for `email`, or the defaults when absent or invalid.
pub async fn load_style(pool: &PgPool, email: &str) -> Result<WritingStyle, sqlx::Error> {
    let Some(data) = load_blob(pool, Table::WritingStyles, email).await? else {
        debug!("No stored style for {email}; using defaults");
        return Ok(WritingStyle::default());
    };
    Ok(style_from_blob(email, &data))
}

fn style_from_blob(email: &str, data: &Value) -> WritingStyle {
    validate_writing_style(data).unwrap_or_else(|failure| {
        warn!("Stored style for {email} is invalid ({failure}); using defaults");
        WritingStyle::default()
    })
}

/// Upserts the style for `email`. Last writer wins.
pub async fn save_style(
    pool: &PgPool,
    email: &str,
    style: &WritingStyle,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO writing_styles (email, data, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (email) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
        "#,
    )
    .bind(email)
    .bind(Json(style))
    .execute(pool)
    .await?;
    Ok(())
}

/// Stored profile for `email`, or a fresh default profile when absent or invalid.
pub async fn load_profile(pool: &PgPool, email: &str) -> Result<UserProfile, sqlx::Error> {
    let Some(data) = load_blob(pool, Table::UserProfiles, email).await? else {
        debug!("No stored profile for {email}; using defaults");
        return Ok(UserProfile::new(email));
    };
    Ok(profile_from_blob(email, &data))
}

fn profile_from_blob(email: &str, data: &Value) -> UserProfile {
    match validate_user_profile(data) {
        Ok(profile) if profile.email.eq_ignore_ascii_case(email) => profile,
        Ok(profile) => {
            warn!(
                "Stored profile for {email} belongs to {}; using defaults",
                profile.email
            );
            UserProfile::new(email)
        }
        Err(failure) => {
            warn!("Stored profile for {email} is invalid ({failure}); using defaults");
            UserProfile::new(email)
        }
    }
}

/// Upserts the profile under its own email. Last writer wins.
pub async fn save_profile(pool: &PgPool, profile: &UserProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (email, data, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (email) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
        "#,
    )
    .bind(&profile.email)
    .bind(Json(profile))
    .execute(pool)
    .await?;
    Ok(())
}
