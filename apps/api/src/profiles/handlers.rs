use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateInput, CandidateProfile};
use crate::models::hr::{HrProfile, HrProfileInput};
use crate::models::job::{Job, JobListing, NewJob};
use crate::models::user::Role;
use crate::state::AppState;
use crate::store::Upserted;
use crate::validation::{validate_candidate_input, validate_hr_profile, validate_new_job};

/// GET /api/v1/candidates
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Candidate>, AppError> {
    caller.require(Role::Candidate)?;

    let candidate = state
        .store
        .find_candidate_by_user(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(candidate))
}

/// POST /api/v1/candidates
///
/// Creates the caller's profile on first save, updates it in place afterwards.
pub async fn handle_upsert_candidate(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CandidateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    caller.require(Role::Candidate)?;
    let Json(input) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let violations = validate_candidate_input(&input);
    if !violations.is_empty() {
        return Err(AppError::InvalidInput(violations));
    }

    let profile = CandidateProfile::from(input);
    let upserted = state
        .store
        .upsert_candidate(caller.user_id, &profile)
        .await?;
    Ok(upserted_response(upserted))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    caller.require(Role::Hr)?;
    let Json(new_job) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let violations = validate_new_job(&new_job);
    if !violations.is_empty() {
        return Err(AppError::InvalidInput(violations));
    }

    let hr = state
        .store
        .find_hr_by_user(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("HR profile not found".to_string()))?;

    let job = state.store.create_job(hr.id, &new_job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/v1/hr/profile
pub async fn handle_upsert_hr_profile(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<HrProfileInput>, JsonRejection>,
) -> Result<(StatusCode, Json<HrProfile>), AppError> {
    caller.require(Role::Hr)?;
    let Json(input) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let violations = validate_hr_profile(&input);
    if !violations.is_empty() {
        return Err(AppError::InvalidInput(violations));
    }

    let upserted = state
        .store
        .upsert_hr(caller.user_id, input.company.trim())
        .await?;
    Ok(upserted_response(upserted))
}

fn upserted_response<T>(upserted: Upserted<T>) -> (StatusCode, Json<T>) {
    let status = if upserted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(upserted.record))
}
