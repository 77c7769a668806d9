use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate profile. `name` is joined from the owning user and is read-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub experience: i32,
    pub preferences: Value,
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/candidates`. Omitted fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInput {
    pub skills: Option<Vec<String>>,
    pub experience: Option<i32>,
    pub preferences: Option<Value>,
    pub resume_url: Option<String>,
}

/// Candidate fields after defaults are applied, ready for an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub experience: i32,
    pub preferences: Value,
    pub resume_url: Option<String>,
}

impl From<CandidateInput> for CandidateProfile {
    fn from(input: CandidateInput) -> Self {
        Self {
            skills: input.skills.unwrap_or_default(),
            experience: input.experience.unwrap_or(0),
            preferences: input
                .preferences
                .unwrap_or_else(|| Value::Object(Map::new())),
            resume_url: input.resume_url,
        }
    }
}
