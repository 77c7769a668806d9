//! Persistence seams. Handlers and the recommendation pipeline only see these
//! traits; `PgProfileStore` backs them in production.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::hr::HrProfile;
use crate::models::job::{Job, JobListing, NewJob};
use crate::models::recommendation::{NewRecommendation, RecommendationRecord};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of an upsert-by-owner: the stored record and whether it was newly created.
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

/// Candidate, job and employer records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// All jobs, newest first, with the posting company.
    async fn list_jobs(&self) -> Result<Vec<JobListing>, StoreError>;

    async fn create_job(&self, hr_id: Uuid, job: &NewJob) -> Result<Job, StoreError>;

    async fn find_candidate_by_user(&self, user_id: Uuid)
        -> Result<Option<Candidate>, StoreError>;

    /// All candidates with their display names.
    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    async fn upsert_candidate(
        &self,
        user_id: Uuid,
        profile: &CandidateProfile,
    ) -> Result<Upserted<Candidate>, StoreError>;

    async fn find_hr_by_user(&self, user_id: Uuid) -> Result<Option<HrProfile>, StoreError>;

    async fn upsert_hr(
        &self,
        user_id: Uuid,
        company: &str,
    ) -> Result<Upserted<HrProfile>, StoreError>;
}

/// Append-only log of recommendation requests and their validated results.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: NewRecommendation) -> Result<RecommendationRecord, StoreError>;
}
