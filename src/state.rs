//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::reference::ReferenceState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    reference: ReferenceState,
}

impl AppState {
    /// Create a new application state from a loaded reference
    pub fn new(config: Config, reference: ReferenceState) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, reference }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the reference digest and blueprint payload
    pub fn reference(&self) -> &ReferenceState {
        &self.inner.reference
    }
}
