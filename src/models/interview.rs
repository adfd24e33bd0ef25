use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i64,
    pub vacancy_id: i64,
    pub candidate_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewEmployee {
    pub id: i64,
    pub interview_id: i64,
    pub employee_id: i64,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

/// An interview together with its interviewer links, ordered by link id.
#[derive(Debug, Clone)]
pub struct InterviewAggregate {
    pub interview: Interview,
    pub employees: Vec<InterviewEmployee>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterview {
    pub vacancy_id: i64,
    pub candidate_id: i64,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewInterviewEmployee {
    pub employee_id: i64,
    pub role_id: i32,
}

/// Partial change set for an existing interview. `None` leaves a column as is;
/// `employees: Some(_)` replaces the whole interviewer set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewChanges {
    pub vacancy_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub employees: Option<Vec<NewInterviewEmployee>>,
}
