use std::sync::Arc;

use crate::config::Config;
use crate::records::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Collection source. Default: in-memory, optionally seeded from a file.
    pub store: Arc<dyn RecordStore>,
    pub config: Config,
}
