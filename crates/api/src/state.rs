use std::sync::Arc;

use govtrust_core::store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Document store holding projects, feedback, and user profiles.
    pub store: Arc<dyn DocumentStore>,
    /// Server configuration (read by the session extractor).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Borrow the store as the trait object domain operations take.
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
