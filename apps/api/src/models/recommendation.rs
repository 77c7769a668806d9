use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Which side is being ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    JobToCandidates,
    CandidateToJobs,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::JobToCandidates => "JOB_TO_CANDIDATES",
            RequestType::CandidateToJobs => "CANDIDATE_TO_JOBS",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An audit entry waiting to be appended.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub request_type: RequestType,
    pub user_id: Uuid,
    /// Serialized query context (JSON text).
    pub query: String,
    pub ai_response: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub request_type: String,
    pub user_id: Uuid,
    pub query: String,
    pub ai_response: Value,
    pub created_at: DateTime<Utc>,
}
