//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::recommendation::schema::{RankedCandidate, RankedJob, Recommendation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendCandidatesRequest {
    pub job_id: Option<String>,
}

/// POST /api/v1/recommend/candidates
///
/// Ranks stored candidates for one of the caller's jobs. A missing or
/// malformed body is treated as a missing `jobId`, which the pipeline
/// reports only after the role check.
pub async fn handle_recommend_candidates(
    State(state): State<AppState>,
    caller: Caller,
    payload: Option<Json<RecommendCandidatesRequest>>,
) -> Result<Json<Recommendation<RankedCandidate>>, AppError> {
    let job_id = payload.and_then(|Json(request)| request.job_id);
    let result = state
        .pipeline
        .recommend_candidates(&caller, job_id.as_deref())
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/recommend/jobs
pub async fn handle_recommend_jobs(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Recommendation<RankedJob>>, AppError> {
    let result = state.pipeline.recommend_jobs(&caller).await?;
    Ok(Json(result))
}
