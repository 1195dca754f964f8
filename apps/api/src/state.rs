use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::RecommendationSource;
use crate::recommend::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// The outbound recommendation seam. `GeminiClient` in production,
    /// mocks in tests.
    pub source: Arc<dyn RecommendationSource>,
    pub config: Config,
}
