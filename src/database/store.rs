use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    attachment::Attachment,
    company::CompanyMember,
    interview::{InterviewAggregate, InterviewChanges, NewInterview, NewInterviewEmployee},
    user::User,
    vacancy::Vacancy,
};

/// Data access used by the interview workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Resolves an API token digest to its active owner.
    async fn find_user_by_token(&self, token_digest: &str) -> Result<Option<User>>;

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>>;

    async fn find_membership(&self, company_id: i64, user_id: i64)
        -> Result<Option<CompanyMember>>;

    async fn find_memberships(&self, company_id: i64, user_ids: &[i64])
        -> Result<Vec<CompanyMember>>;

    async fn find_vacancy(&self, id: i64) -> Result<Option<Vacancy>>;

    /// Most recent attachment per owner; owners without uploads are absent.
    async fn latest_attachments(&self, owner_ids: &[i64]) -> Result<Vec<Attachment>>;

    async fn list_interviews(&self, vacancy_id: i64) -> Result<Vec<InterviewAggregate>>;

    async fn find_interview(&self, id: i64) -> Result<Option<InterviewAggregate>>;

    /// Writes the interview and every interviewer link in one transaction.
    async fn create_interview(
        &self,
        interview: NewInterview,
        employees: Vec<NewInterviewEmployee>,
    ) -> Result<InterviewAggregate>;

    /// Applies `changes` in one transaction. Returns `None` if the interview is gone.
    async fn update_interview(
        &self,
        id: i64,
        changes: InterviewChanges,
    ) -> Result<Option<InterviewAggregate>>;

    async fn delete_interview(&self, id: i64) -> Result<bool>;

    async fn delete_interview_employee(&self, interview_id: i64, employee_id: i64)
        -> Result<bool>;
}
