use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::dto::attachment_dto::AttachmentResponse;
use crate::models::interview::{InterviewAggregate, InterviewEmployee};
use crate::models::user::User;

/// Raw create/update body. Fields stay untyped so that type mismatches are
/// reported per field instead of rejecting the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacancy_id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewees: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewEmployeeResponse {
    pub id: i64,
    pub employee_id: i64,
    pub role_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<AttachmentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewResponse {
    pub id: i64,
    pub vacancy_id: i64,
    pub candidate_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub candidate: Option<CandidateSummary>,
    pub interviewees: Vec<InterviewEmployeeResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewEnvelope {
    pub interview: InterviewResponse,
}

impl From<InterviewEmployee> for InterviewEmployeeResponse {
    fn from(value: InterviewEmployee) -> Self {
        Self {
            id: value.id,
            employee_id: value.employee_id,
            role_id: value.role_id,
        }
    }
}

impl CandidateSummary {
    pub fn new(user: User, avatar: Option<AttachmentResponse>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar,
        }
    }
}

impl InterviewResponse {
    pub fn new(aggregate: InterviewAggregate, candidate: Option<CandidateSummary>) -> Self {
        let interview = aggregate.interview;
        Self {
            id: interview.id,
            vacancy_id: interview.vacancy_id,
            candidate_id: interview.candidate_id,
            assigned_at: interview.assigned_at,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
            candidate,
            interviewees: aggregate.employees.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<InterviewResponse> for InterviewEnvelope {
    fn from(interview: InterviewResponse) -> Self {
        Self { interview }
    }
}
