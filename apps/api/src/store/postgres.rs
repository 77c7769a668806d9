use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::hr::HrProfile;
use crate::models::job::{Job, JobListing, NewJob};
use crate::models::recommendation::{NewRecommendation, RecommendationRecord};
use crate::store::{AuditLog, ProfileStore, StoreError, Upserted};

/// Columns of `candidates` plus the owning user's display name.
const CANDIDATE_COLUMNS: &str = "c.id, c.user_id, u.name, c.skills, c.experience, \
     c.preferences, c.resume_url, c.created_at, c.updated_at";

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UpsertedCandidateRow {
    #[sqlx(flatten)]
    candidate: Candidate,
    inserted: bool,
}

#[derive(FromRow)]
struct UpsertedHrRow {
    #[sqlx(flatten)]
    hr: HrProfile,
    inserted: bool,
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn list_jobs(&self) -> Result<Vec<JobListing>, StoreError> {
        let jobs = sqlx::query_as::<_, JobListing>(
            r#"
            SELECT j.*, h.company
            FROM jobs j
            LEFT JOIN hr_profiles h ON h.id = j.hr_id
            ORDER BY j.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn create_job(&self, hr_id: Uuid, job: &NewJob) -> Result<Job, StoreError> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (hr_id, title, description, required_skills, location, experience, salary_range)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(hr_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.location)
        .bind(job.experience)
        .bind(&job.salary_range)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created job {} for HR profile {hr_id}", created.id);
        Ok(created)
    }

    async fn find_candidate_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Candidate>, StoreError> {
        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates c \
             LEFT JOIN users u ON u.id = c.user_id WHERE c.user_id = $1"
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates c \
             LEFT JOIN users u ON u.id = c.user_id ORDER BY c.created_at"
        );
        let candidates = sqlx::query_as::<_, Candidate>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(candidates)
    }

    async fn upsert_candidate(
        &self,
        user_id: Uuid,
        profile: &CandidateProfile,
    ) -> Result<Upserted<Candidate>, StoreError> {
        // xmax = 0 only for rows written by the INSERT arm of the upsert.
        let row = sqlx::query_as::<_, UpsertedCandidateRow>(
            r#"
            WITH c AS (
                INSERT INTO candidates (user_id, skills, experience, preferences, resume_url)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (user_id) DO UPDATE SET
                    skills = EXCLUDED.skills,
                    experience = EXCLUDED.experience,
                    preferences = EXCLUDED.preferences,
                    resume_url = COALESCE(EXCLUDED.resume_url, candidates.resume_url),
                    updated_at = now()
                RETURNING *, (xmax = 0) AS inserted
            )
            SELECT c.id, c.user_id, u.name, c.skills, c.experience, c.preferences,
                   c.resume_url, c.created_at, c.updated_at, c.inserted
            FROM c
            LEFT JOIN users u ON u.id = c.user_id
            "#,
        )
        .bind(user_id)
        .bind(&profile.skills)
        .bind(profile.experience)
        .bind(&profile.preferences)
        .bind(&profile.resume_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Upserted {
            record: row.candidate,
            created: row.inserted,
        })
    }

    async fn find_hr_by_user(&self, user_id: Uuid) -> Result<Option<HrProfile>, StoreError> {
        let hr = sqlx::query_as::<_, HrProfile>("SELECT * FROM hr_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hr)
    }

    async fn upsert_hr(
        &self,
        user_id: Uuid,
        company: &str,
    ) -> Result<Upserted<HrProfile>, StoreError> {
        let row = sqlx::query_as::<_, UpsertedHrRow>(
            r#"
            INSERT INTO hr_profiles (user_id, company)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET company = EXCLUDED.company
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(user_id)
        .bind(company)
        .fetch_one(&self.pool)
        .await?;

        Ok(Upserted {
            record: row.hr,
            created: row.inserted,
        })
    }
}

#[async_trait]
impl AuditLog for PgProfileStore {
    async fn append(&self, entry: NewRecommendation) -> Result<RecommendationRecord, StoreError> {
        // Append-only: rows are never updated or deleted.
        let record = sqlx::query_as::<_, RecommendationRecord>(
            r#"
            INSERT INTO recommendations (request_type, user_id, query, ai_response)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(entry.request_type.as_str())
        .bind(entry.user_id)
        .bind(&entry.query)
        .bind(&entry.ai_response)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }
}
