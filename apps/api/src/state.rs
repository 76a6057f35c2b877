use std::sync::Arc;

use crate::config::Config;
use crate::merge::config::MergeConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone, Default)]
pub struct AppState {
    /// Merge tunables, built once at startup and shared read-only across requests.
    pub merge_config: Arc<MergeConfig>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            merge_config: Arc::new(config.merge_config()),
        }
    }
}
