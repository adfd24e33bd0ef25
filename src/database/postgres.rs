use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::database::store::InterviewStore;
use crate::error::Result;
use crate::models::{
    attachment::Attachment,
    company::CompanyMember,
    interview::{
        Interview, InterviewAggregate, InterviewChanges, InterviewEmployee, NewInterview,
        NewInterviewEmployee,
    },
    user::User,
    vacancy::Vacancy,
};

const USER_COLUMNS: &str = "id, email, first_name, last_name, is_active, created_at";
const INTERVIEW_COLUMNS: &str = "id, vacancy_id, candidate_id, assigned_at, created_at, updated_at";
const EMPLOYEE_COLUMNS: &str = "id, interview_id, employee_id, role_id, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn employees_for(&self, interview_ids: &[i64]) -> Result<Vec<InterviewEmployee>> {
        let query = format!(
            "SELECT {} FROM interview_employees WHERE interview_id = ANY($1) ORDER BY id",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterviewEmployee>(&query)
            .bind(interview_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

async fn insert_employees(
    conn: &mut PgConnection,
    interview_id: i64,
    employees: &[NewInterviewEmployee],
) -> Result<Vec<InterviewEmployee>> {
    let query = format!(
        "INSERT INTO interview_employees (interview_id, employee_id, role_id)
         VALUES ($1, $2, $3)
         RETURNING {}",
        EMPLOYEE_COLUMNS
    );
    let mut rows = Vec::with_capacity(employees.len());
    for employee in employees {
        let row = sqlx::query_as::<_, InterviewEmployee>(&query)
            .bind(interview_id)
            .bind(employee.employee_id)
            .bind(employee.role_id)
            .fetch_one(&mut *conn)
            .await?;
        rows.push(row);
    }
    Ok(rows)
}

fn assemble(
    interviews: Vec<Interview>,
    employees: Vec<InterviewEmployee>,
) -> Vec<InterviewAggregate> {
    let mut by_interview: HashMap<i64, Vec<InterviewEmployee>> = HashMap::new();
    for employee in employees {
        by_interview
            .entry(employee.interview_id)
            .or_default()
            .push(employee);
    }
    interviews
        .into_iter()
        .map(|interview| {
            let employees = by_interview.remove(&interview.id).unwrap_or_default();
            InterviewAggregate {
                interview,
                employees,
            }
        })
        .collect()
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn find_user_by_token(&self, token_digest: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.is_active, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key_digest = $1 AND u.is_active
            "#,
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>> {
        let query = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_membership(
        &self,
        company_id: i64,
        user_id: i64,
    ) -> Result<Option<CompanyMember>> {
        let member = sqlx::query_as::<_, CompanyMember>(
            r#"
            SELECT id, company_id, user_id, role_id, created_at
            FROM company_members
            WHERE company_id = $1 AND user_id = $2
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    async fn find_memberships(
        &self,
        company_id: i64,
        user_ids: &[i64],
    ) -> Result<Vec<CompanyMember>> {
        let members = sqlx::query_as::<_, CompanyMember>(
            r#"
            SELECT id, company_id, user_id, role_id, created_at
            FROM company_members
            WHERE company_id = $1 AND user_id = ANY($2)
            "#,
        )
        .bind(company_id)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn find_vacancy(&self, id: i64) -> Result<Option<Vacancy>> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, company_id, title, description, salary, active, created_at, updated_at
            FROM vacancies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vacancy)
    }

    async fn latest_attachments(&self, owner_ids: &[i64]) -> Result<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(
            r#"
            SELECT DISTINCT ON (owner_id) id, owner_id, data, created_at
            FROM attachments
            WHERE owner_id = ANY($1)
            ORDER BY owner_id, created_at DESC, id DESC
            "#,
        )
        .bind(owner_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    async fn list_interviews(&self, vacancy_id: i64) -> Result<Vec<InterviewAggregate>> {
        let query = format!(
            "SELECT {} FROM interviews WHERE vacancy_id = $1 ORDER BY assigned_at, id",
            INTERVIEW_COLUMNS
        );
        let interviews = sqlx::query_as::<_, Interview>(&query)
            .bind(vacancy_id)
            .fetch_all(&self.pool)
            .await?;
        let ids: Vec<i64> = interviews.iter().map(|i| i.id).collect();
        let employees = self.employees_for(&ids).await?;
        Ok(assemble(interviews, employees))
    }

    async fn find_interview(&self, id: i64) -> Result<Option<InterviewAggregate>> {
        let query = format!("SELECT {} FROM interviews WHERE id = $1", INTERVIEW_COLUMNS);
        let Some(interview) = sqlx::query_as::<_, Interview>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let employees = self.employees_for(&[interview.id]).await?;
        Ok(Some(InterviewAggregate {
            interview,
            employees,
        }))
    }

    async fn create_interview(
        &self,
        interview: NewInterview,
        employees: Vec<NewInterviewEmployee>,
    ) -> Result<InterviewAggregate> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO interviews (vacancy_id, candidate_id, assigned_at)
             VALUES ($1, $2, $3)
             RETURNING {}",
            INTERVIEW_COLUMNS
        );
        let interview = sqlx::query_as::<_, Interview>(&query)
            .bind(interview.vacancy_id)
            .bind(interview.candidate_id)
            .bind(interview.assigned_at)
            .fetch_one(&mut *tx)
            .await?;
        let employees = insert_employees(&mut tx, interview.id, &employees).await?;

        tx.commit().await?;
        Ok(InterviewAggregate {
            interview,
            employees,
        })
    }

    async fn update_interview(
        &self,
        id: i64,
        changes: InterviewChanges,
    ) -> Result<Option<InterviewAggregate>> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE interviews
             SET
                vacancy_id = COALESCE($2, vacancy_id),
                candidate_id = COALESCE($3, candidate_id),
                assigned_at = COALESCE($4, assigned_at),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            INTERVIEW_COLUMNS
        );
        let Some(interview) = sqlx::query_as::<_, Interview>(&query)
            .bind(id)
            .bind(changes.vacancy_id)
            .bind(changes.candidate_id)
            .bind(changes.assigned_at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let employees = match changes.employees {
            Some(employees) => {
                sqlx::query("DELETE FROM interview_employees WHERE interview_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_employees(&mut tx, id, &employees).await?
            }
            None => {
                let query = format!(
                    "SELECT {} FROM interview_employees WHERE interview_id = $1 ORDER BY id",
                    EMPLOYEE_COLUMNS
                );
                sqlx::query_as::<_, InterviewEmployee>(&query)
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(Some(InterviewAggregate {
            interview,
            employees,
        }))
    }

    async fn delete_interview(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_interview_employee(&self, interview_id: i64, employee_id: i64) -> Result<bool> {
        let res = sqlx::query(
            "DELETE FROM interview_employees WHERE interview_id = $1 AND employee_id = $2",
        )
        .bind(interview_id)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
