use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthConfig;
use crate::recommendation::pipeline::RecommendationPipeline;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub pipeline: Arc<RecommendationPipeline>,
    /// Token verification settings, pulled out by the `Caller` extractor.
    pub auth: AuthConfig,
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
