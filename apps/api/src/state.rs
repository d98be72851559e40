use std::sync::Arc;

use crate::analysis::report::Analyzer;
use crate::config::Config;
use crate::ui::Renderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Skill extractor plus the embedder chosen at startup (`fastembed` or `hash`).
    pub analyzer: Arc<Analyzer>,
    pub renderer: Arc<Renderer>,
}
