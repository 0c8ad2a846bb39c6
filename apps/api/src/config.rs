use anyhow::{Context, Result};

use crate::thread::extractor::MAX_PREVIOUS_MESSAGES;

const DEFAULT_CONTEXT_MESSAGES: usize = 5;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Prior messages kept in a reply context; never above `MAX_PREVIOUS_MESSAGES`.
    pub max_context_messages: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_context_messages = match std::env::var("MAX_CONTEXT_MESSAGES") {
            Ok(raw) => raw
                .parse::<usize>()
                .context("MAX_CONTEXT_MESSAGES must be a non-negative integer")?,
            Err(_) => DEFAULT_CONTEXT_MESSAGES,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_context_messages: clamp_context_messages(max_context_messages),
        })
    }
}

fn clamp_context_messages(requested: usize) -> usize {
    requested.min(MAX_PREVIOUS_MESSAGES)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_cap_is_clamped() {
        assert_eq!(clamp_context_messages(3), 3);
        assert_eq!(clamp_context_messages(10), 10);
        assert_eq!(clamp_context_messages(50), MAX_PREVIOUS_MESSAGES);
    }
}
