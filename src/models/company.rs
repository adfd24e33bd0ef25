use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const HR_ROLE_ID: i32 = 2;
pub const CANDIDATE_ROLE_ID: i32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyMember {
    pub id: i64,
    pub company_id: i64,
    pub user_id: i64,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

impl CompanyMember {
    /// Candidates are scoped to a company too, but may not manage its interviews.
    pub fn is_staff(&self) -> bool {
        self.role_id != CANDIDATE_ROLE_ID
    }
}
