use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub hr_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: Option<String>,
    pub experience: Option<i32>,
    pub salary_range: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A job plus the posting company, as shown on the public listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<String>,
}

/// Body of `POST /api/v1/jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: Option<String>,
    pub experience: Option<i32>,
    pub salary_range: Option<String>,
}
