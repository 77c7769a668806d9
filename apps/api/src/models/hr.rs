use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employer profile. Jobs are owned by an HR profile, not directly by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HrProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HrProfileInput {
    pub company: String,
}
