//! # Application State
//!
//! Everything a handler needs, shared across actix workers through `web::Data`.
//! Both members are read-only after startup, so no locking is involved: the
//! `Arc`s only give every worker a handle to the same configuration and the
//! same provider client.

use crate::config::AppConfig;
use crate::transcription::TranscriptionProvider;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Immutable settings loaded at startup
    pub config: Arc<AppConfig>,

    /// External speech-to-text client, created once and reused
    pub provider: Arc<dyn TranscriptionProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}
