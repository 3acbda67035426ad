use std::sync::Arc;
use std::time::Instant;

use crate::automation::{AccessibilityProvider, AutomationManager};
use crate::config::EngineConfig;

/// Shared application state
pub struct AppState {
    pub manager: AutomationManager,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(provider: Arc<dyn AccessibilityProvider>, engine: EngineConfig) -> Self {
        tracing::info!(
            "Engine ready (max text {} chars, {} fingerprint buckets, action wait {:?}, action timeout {:?})",
            engine.max_text_len,
            engine.fingerprint_buckets,
            engine.action_wait,
            engine.action_timeout
        );
        Self {
            manager: AutomationManager::new(provider, engine),
            started_at: Instant::now(),
        }
    }
}
