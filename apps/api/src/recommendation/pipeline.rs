//! Recommendation pipeline.
//!
//! RoleCheck → SubjectLookup → SetFetch → PromptBuild → ModelCall →
//! Normalize → Validate → Persist. Each step either advances or returns a
//! classified `AppError`; nothing is retried and nothing is shared between
//! requests.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::Caller;
use crate::config::AiConfig;
use crate::errors::AppError;
use crate::llm_client::{ChatModel, ChatRequest};
use crate::models::recommendation::{NewRecommendation, RequestType};
use crate::models::user::Role;
use crate::recommendation::normalize::normalize_response;
use crate::recommendation::prompts::{
    build_candidate_ranking_prompt, build_job_ranking_prompt, JobBrief, Prompt,
};
use crate::recommendation::schema::{
    validate_recommendation, RankedCandidate, RankedJob, RankedSubject, Recommendation,
};
use crate::store::{AuditLog, ProfileStore};

/// What to do when the audit record cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditPolicy {
    /// Fail the request with an internal error.
    #[default]
    Strict,
    /// Log the failure and still return the validated result.
    BestEffort,
}

impl FromStr for AuditPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AuditPolicy::Strict),
            "best_effort" | "best-effort" => Ok(AuditPolicy::BestEffort),
            other => Err(anyhow!(
                "AUDIT_POLICY must be 'strict' or 'best_effort', got '{other}'"
            )),
        }
    }
}

pub struct RecommendationPipeline {
    store: Arc<dyn ProfileStore>,
    audit: Arc<dyn AuditLog>,
    llm: Arc<dyn ChatModel>,
    model: String,
    temperature: f32,
    audit_policy: AuditPolicy,
}

impl RecommendationPipeline {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        audit: Arc<dyn AuditLog>,
        llm: Arc<dyn ChatModel>,
        ai: &AiConfig,
        audit_policy: AuditPolicy,
    ) -> Self {
        Self {
            store,
            audit,
            llm,
            model: ai.model.clone(),
            temperature: ai.temperature,
            audit_policy,
        }
    }

    /// Ranks every stored candidate against one job. HR only.
    pub async fn recommend_candidates(
        &self,
        caller: &Caller,
        job_id: Option<&str>,
    ) -> Result<Recommendation<RankedCandidate>, AppError> {
        caller.require(Role::Hr)?;
        let job_id = parse_job_id(job_id)?;

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        let candidates = self.store.list_candidates().await?;

        info!(
            "Ranking {} candidates for job {} (requested by {})",
            candidates.len(),
            job.id,
            caller.user_id
        );

        let prompt = build_candidate_ranking_prompt(&job, &candidates)
            .context("failed to serialize candidate ranking prompt")?;
        let result = self.rank::<RankedCandidate>(prompt).await?;

        let query = json!({ "jobId": job.id, "job": JobBrief::from(&job) });
        self.persist(RequestType::JobToCandidates, caller, &query, &result)
            .await?;

        Ok(result)
    }

    /// Ranks every stored job for the calling candidate. CANDIDATE only.
    pub async fn recommend_jobs(
        &self,
        caller: &Caller,
    ) -> Result<Recommendation<RankedJob>, AppError> {
        caller.require(Role::Candidate)?;

        let candidate = self
            .store
            .find_candidate_by_user(caller.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))?;
        let jobs: Vec<_> = self
            .store
            .list_jobs()
            .await?
            .into_iter()
            .map(|listing| listing.job)
            .collect();

        info!(
            "Ranking {} jobs for candidate {} (user {})",
            jobs.len(),
            candidate.id,
            caller.user_id
        );

        let prompt = build_job_ranking_prompt(&candidate, &jobs)
            .context("failed to serialize job ranking prompt")?;
        let result = self.rank::<RankedJob>(prompt).await?;

        let query = json!({ "candidateId": candidate.id });
        self.persist(RequestType::CandidateToJobs, caller, &query, &result)
            .await?;

        Ok(result)
    }

    /// ModelCall → Normalize → Validate. The only suspension point is the model call.
    async fn rank<T: RankedSubject>(&self, prompt: Prompt) -> Result<Recommendation<T>, AppError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: prompt.into_messages(),
        };

        let raw = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| AppError::Upstream(format!("model call failed: {e}")))?;

        let normalized = normalize_response(&raw).map_err(|e| {
            warn!("Discarding unparsable model output ({} bytes)", raw.len());
            AppError::Upstream(e.to_string())
        })?;

        validate_recommendation::<T>(&normalized).map_err(|violations| {
            warn!(
                "Model output failed validation with {} violation(s)",
                violations.len()
            );
            AppError::AiResponseInvalid(violations)
        })
    }

    async fn persist<T: Serialize>(
        &self,
        request_type: RequestType,
        caller: &Caller,
        query: &Value,
        result: &Recommendation<T>,
    ) -> Result<(), AppError> {
        let entry = NewRecommendation {
            request_type,
            user_id: caller.user_id,
            query: query.to_string(),
            ai_response: serde_json::to_value(result)
                .context("failed to serialize recommendation result")?,
        };

        match self.audit.append(entry).await {
            Ok(record) => {
                debug!("Recorded {request_type} recommendation {}", record.id);
                Ok(())
            }
            Err(e) => match self.audit_policy {
                AuditPolicy::Strict => Err(AppError::Internal(
                    anyhow::Error::new(e).context("failed to append recommendation audit record"),
                )),
                AuditPolicy::BestEffort => {
                    error!("Recommendation audit write failed, returning result anyway: {e}");
                    Ok(())
                }
            },
        }
    }
}

fn parse_job_id(raw: Option<&str>) -> Result<Uuid, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("jobId required".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("jobId must be a valid id".to_string()))
}
