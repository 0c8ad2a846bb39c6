use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::ModelCaller;
use crate::thread::cleaner::BodyCleaner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Production: `LlmClient`. Tests swap in a canned caller.
    pub model: Arc<dyn ModelCaller>,
    pub config: Config,
    pub cleaner: Arc<dyn BodyCleaner>,
}
