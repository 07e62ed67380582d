use std::sync::Arc;

use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every handler runs independently.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionClient>,
}
