use std::sync::Arc;

use crate::config::Config;
use crate::layout::{LayoutConfig, StyleRules};
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion capability. Production: `GroqClient`.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
    /// Line classification markers and styles for plan PDFs.
    pub style_rules: Arc<StyleRules>,
    /// Page geometry for plan PDFs: A4 with 50pt margins.
    pub layout_config: LayoutConfig,
}
