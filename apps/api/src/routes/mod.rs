pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::profiles::handlers as profiles;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API
        .route(
            "/api/v1/recommend/candidates",
            post(recommendation::handle_recommend_candidates),
        )
        .route(
            "/api/v1/recommend/jobs",
            post(recommendation::handle_recommend_jobs),
        )
        // Profile API
        .route(
            "/api/v1/candidates",
            get(profiles::handle_get_candidate).post(profiles::handle_upsert_candidate),
        )
        .route(
            "/api/v1/jobs",
            get(profiles::handle_list_jobs).post(profiles::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(profiles::handle_get_job))
        .route("/api/v1/hr/profile", post(profiles::handle_upsert_hr_profile))
        .with_state(state)
}
