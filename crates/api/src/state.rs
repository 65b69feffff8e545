use std::sync::Arc;

use fyptrack_core::storage::LocalObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: fyptrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object store for section files and final reports.
    pub store: Arc<LocalObjectStore>,
}
