use std::sync::Arc;

use crate::config::Config;
use crate::context::ContextStore;
use crate::llm_client::OllamaClient;
use crate::report::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Role catalog, loaded once at startup and read-only afterwards.
    pub roles: Arc<Vec<String>>,
    /// Pluggable context source. Default: SqlContextStore over the MySQL pool.
    pub contexts: Arc<dyn ContextStore>,
    pub llm: OllamaClient,
    pub pdf: PdfRenderer,
}
