use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::chat::{ChatError, ChatRelay};
use crate::config::AppConfig;

/// Shared application state passed to all handlers via Axum's State extractor.
/// Everything in here is read-only after startup.
pub struct AppState {
    pub config: AppConfig,
    pub start_time: Instant,
    /// Process start, used as the sitemap's `lastmod`.
    pub started_at: DateTime<Utc>,
    pub relay: Arc<ChatRelay>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state, constructing the chat relay from `config.llm`.
    pub fn new(config: AppConfig) -> Result<SharedState, ChatError> {
        let relay = ChatRelay::from_config(&config.llm)?;
        Ok(Self::with_relay(config, relay))
    }

    /// Build state around an already constructed relay.
    pub fn with_relay(config: AppConfig, relay: Arc<ChatRelay>) -> SharedState {
        Arc::new(AppState {
            config,
            start_time: Instant::now(),
            started_at: Utc::now(),
            relay,
        })
    }
}
