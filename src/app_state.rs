//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay owning the registry and live connections.
    pub relay: Arc<RelayService>,
}

impl AppState {
    /// Wraps `relay` for sharing across handlers.
    #[must_use]
    pub fn new(relay: RelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
