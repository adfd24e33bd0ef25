use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::database::store::InterviewStore;
use crate::dto::attachment_dto::AttachmentResponse;
use crate::dto::interview_dto::{CandidateSummary, InterviewPayload, InterviewResponse};
use crate::error::{Error, Result};
use crate::models::company::CompanyMember;
use crate::models::interview::InterviewAggregate;
use crate::models::vacancy::Vacancy;
use crate::services::interview_validator::InterviewValidator;
use crate::storage::MediaStorage;

/// Company/vacancy scoped interview workflow: authorization, validation and
/// transactional persistence of interviews with their interviewers.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn InterviewStore>,
    media: Arc<dyn MediaStorage>,
    validator: InterviewValidator,
}

impl InterviewService {
    pub fn new(store: Arc<dyn InterviewStore>, media: Arc<dyn MediaStorage>) -> Self {
        let validator = InterviewValidator::new(store.clone());
        Self {
            store,
            media,
            validator,
        }
    }

    /// The caller must hold a non-candidate role in the company.
    pub async fn authorize(&self, company_id: i64, user_id: i64) -> Result<CompanyMember> {
        match self.store.find_membership(company_id, user_id).await? {
            Some(member) if member.is_staff() => Ok(member),
            _ => Err(Error::Forbidden(
                "You do not have permission to manage interviews of this company".to_string(),
            )),
        }
    }

    pub async fn list(
        &self,
        user_id: i64,
        company_id: i64,
        vacancy_id: i64,
    ) -> Result<Vec<InterviewResponse>> {
        self.authorize(company_id, user_id).await?;
        let vacancy = self.scoped_vacancy(company_id, vacancy_id).await?;
        let interviews = self.store.list_interviews(vacancy.id).await?;
        self.present(interviews).await
    }

    pub async fn create(
        &self,
        user_id: i64,
        company_id: i64,
        vacancy_id: i64,
        payload: &InterviewPayload,
    ) -> Result<InterviewResponse> {
        self.authorize(company_id, user_id).await?;
        self.scoped_vacancy(company_id, vacancy_id).await?;

        let draft = self
            .validator
            .validate_create(company_id, vacancy_id, payload)
            .await?;
        let aggregate = self
            .store
            .create_interview(draft.interview, draft.employees)
            .await?;

        info!(
            interview_id = aggregate.interview.id,
            vacancy_id = aggregate.interview.vacancy_id,
            interviewers = aggregate.employees.len(),
            created_by = user_id,
            "interview scheduled"
        );
        self.present_one(aggregate).await
    }

    pub async fn update(
        &self,
        user_id: i64,
        company_id: i64,
        vacancy_id: i64,
        interview_id: i64,
        payload: &InterviewPayload,
    ) -> Result<InterviewResponse> {
        self.authorize(company_id, user_id).await?;
        let vacancy = self.scoped_vacancy(company_id, vacancy_id).await?;
        self.scoped_interview(&vacancy, interview_id).await?;

        let changes = self
            .validator
            .validate_update(company_id, &vacancy, payload)
            .await?;
        let replaces_interviewers = changes.employees.is_some();
        let aggregate = self
            .store
            .update_interview(interview_id, changes)
            .await?
            .ok_or_else(interview_not_found)?;

        info!(
            interview_id,
            replaces_interviewers,
            updated_by = user_id,
            "interview updated"
        );
        self.present_one(aggregate).await
    }

    pub async fn delete(
        &self,
        user_id: i64,
        company_id: i64,
        vacancy_id: i64,
        interview_id: i64,
    ) -> Result<()> {
        self.authorize(company_id, user_id).await?;
        let vacancy = self.scoped_vacancy(company_id, vacancy_id).await?;
        self.scoped_interview(&vacancy, interview_id).await?;

        if !self.store.delete_interview(interview_id).await? {
            return Err(interview_not_found());
        }
        info!(interview_id, deleted_by = user_id, "interview deleted");
        Ok(())
    }

    /// Drops one interviewer from an interview; the interview itself stays.
    pub async fn remove_employee(
        &self,
        user_id: i64,
        interview_id: i64,
        employee_id: i64,
    ) -> Result<()> {
        let aggregate = self
            .store
            .find_interview(interview_id)
            .await?
            .ok_or_else(interview_not_found)?;
        let vacancy = self
            .store
            .find_vacancy(aggregate.interview.vacancy_id)
            .await?
            .ok_or_else(interview_not_found)?;
        self.authorize(vacancy.company_id, user_id).await?;

        if !self
            .store
            .delete_interview_employee(interview_id, employee_id)
            .await?
        {
            return Err(Error::NotFound("Interview employee not found".to_string()));
        }
        info!(
            interview_id,
            employee_id,
            removed_by = user_id,
            "interviewer removed"
        );
        Ok(())
    }

    async fn scoped_vacancy(&self, company_id: i64, vacancy_id: i64) -> Result<Vacancy> {
        match self.store.find_vacancy(vacancy_id).await? {
            Some(vacancy) if vacancy.company_id == company_id => Ok(vacancy),
            _ => Err(Error::NotFound("Vacancy not found".to_string())),
        }
    }

    async fn scoped_interview(
        &self,
        vacancy: &Vacancy,
        interview_id: i64,
    ) -> Result<InterviewAggregate> {
        match self.store.find_interview(interview_id).await? {
            Some(aggregate) if aggregate.interview.vacancy_id == vacancy.id => Ok(aggregate),
            _ => Err(interview_not_found()),
        }
    }

    async fn present_one(&self, aggregate: InterviewAggregate) -> Result<InterviewResponse> {
        self.present(vec![aggregate])
            .await?
            .pop()
            .ok_or_else(|| Error::Internal("interview disappeared while rendering".to_string()))
    }

    async fn present(&self, interviews: Vec<InterviewAggregate>) -> Result<Vec<InterviewResponse>> {
        if interviews.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidate_ids: Vec<i64> =
            interviews.iter().map(|a| a.interview.candidate_id).collect();
        candidate_ids.sort_unstable();
        candidate_ids.dedup();

        let avatars: HashMap<i64, AttachmentResponse> = self
            .store
            .latest_attachments(&candidate_ids)
            .await?
            .iter()
            .map(|a| (a.owner_id, AttachmentResponse::new(a, self.media.as_ref())))
            .collect();
        let candidates: HashMap<i64, _> = self
            .store
            .find_users(&candidate_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(interviews
            .into_iter()
            .map(|aggregate| {
                let candidate_id = aggregate.interview.candidate_id;
                let candidate = candidates.get(&candidate_id).cloned().map(|user| {
                    CandidateSummary::new(user, avatars.get(&candidate_id).cloned())
                });
                InterviewResponse::new(aggregate, candidate)
            })
            .collect())
    }
}

fn interview_not_found() -> Error {
    Error::NotFound("Interview not found".to_string())
}
