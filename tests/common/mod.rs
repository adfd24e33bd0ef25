#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use interviews_backend::{
    database::store::InterviewStore,
    error::Result,
    models::{
        attachment::Attachment,
        company::{CompanyMember, CANDIDATE_ROLE_ID, HR_ROLE_ID},
        interview::{
            Interview, InterviewAggregate, InterviewChanges, InterviewEmployee, NewInterview,
            NewInterviewEmployee,
        },
        user::User,
        vacancy::Vacancy,
    },
    routes,
    storage::PublicMediaStorage,
    utils::crypto::token_digest,
    AppState,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

pub const COMPANY: i64 = 3;
pub const OTHER_COMPANY: i64 = 5;
pub const VACANCY: i64 = 7;
pub const OTHER_VACANCY: i64 = 8;
pub const FOREIGN_VACANCY: i64 = 20;
pub const HR: i64 = 9;
pub const RECRUITER: i64 = 10;
pub const CANDIDATE: i64 = 42;
pub const OUTSIDER: i64 = 77;
pub const FIRST_INTERVIEW: i64 = 100;
pub const SECOND_INTERVIEW: i64 = 101;
pub const FOREIGN_INTERVIEW: i64 = 102;

pub const HR_TOKEN: &str = "hr-token-0f3b";
pub const CANDIDATE_TOKEN: &str = "candidate-token-77aa";
pub const OUTSIDER_TOKEN: &str = "outsider-token-c41d";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tokens: HashMap<String, i64>,
    members: Vec<CompanyMember>,
    vacancies: Vec<Vacancy>,
    interviews: Vec<Interview>,
    employees: Vec<InterviewEmployee>,
    attachments: Vec<Attachment>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn aggregate(&self, interview: &Interview) -> InterviewAggregate {
        InterviewAggregate {
            interview: interview.clone(),
            employees: self
                .employees
                .iter()
                .filter(|e| e.interview_id == interview.id)
                .cloned()
                .collect(),
        }
    }

    fn link(&mut self, interview_id: i64, employee: NewInterviewEmployee) -> InterviewEmployee {
        let row = InterviewEmployee {
            id: self.next_id(),
            interview_id,
            employee_id: employee.employee_id,
            role_id: employee.role_id,
            created_at: Utc::now(),
        };
        self.employees.push(row.clone());
        row
    }
}

/// Store double backed by plain vectors; every call runs under one lock, which
/// makes multi-row writes atomic the same way a transaction would.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock().expect("store lock");
        f(&mut guard)
    }

    pub fn add_user(&self, id: i64, token: Option<&str>) {
        self.with(|t| {
            t.users.push(User {
                id,
                email: format!("user{}@example.com", id),
                first_name: "User".into(),
                last_name: id.to_string(),
                is_active: true,
                created_at: Utc::now(),
            });
            if let Some(token) = token {
                t.tokens.insert(token_digest(token), id);
            }
        });
    }

    pub fn deactivate_user(&self, id: i64) {
        self.with(|t| {
            if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
                user.is_active = false;
            }
        });
    }

    pub fn add_member(&self, company_id: i64, user_id: i64, role_id: i32) {
        self.with(|t| {
            let id = t.next_id();
            t.members.push(CompanyMember {
                id,
                company_id,
                user_id,
                role_id,
                created_at: Utc::now(),
            });
        });
    }

    pub fn add_vacancy(&self, id: i64, company_id: i64, active: bool) {
        self.with(|t| {
            t.vacancies.push(Vacancy {
                id,
                company_id,
                title: format!("Vacancy {}", id),
                description: Some("Description".into()),
                salary: Some("120.00".parse().expect("decimal")),
                active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        });
    }

    pub fn set_vacancy_active(&self, id: i64, active: bool) {
        self.with(|t| {
            if let Some(vacancy) = t.vacancies.iter_mut().find(|v| v.id == id) {
                vacancy.active = active;
            }
        });
    }

    pub fn add_interview(
        &self,
        id: i64,
        vacancy_id: i64,
        candidate_id: i64,
        assigned_at: DateTime<Utc>,
        employees: &[(i64, i32)],
    ) {
        self.with(|t| {
            let now = Utc::now();
            t.interviews.push(Interview {
                id,
                vacancy_id,
                candidate_id,
                assigned_at,
                created_at: now,
                updated_at: now,
            });
            for (employee_id, role_id) in employees {
                t.link(
                    id,
                    NewInterviewEmployee {
                        employee_id: *employee_id,
                        role_id: *role_id,
                    },
                );
            }
        });
    }

    pub fn add_attachment(&self, owner_id: i64, data: &str) {
        self.with(|t| {
            let id = t.next_id();
            t.attachments.push(Attachment {
                id,
                owner_id,
                data: data.to_string(),
                created_at: Utc::now(),
            });
        });
    }

    pub fn interview(&self, id: i64) -> Option<Interview> {
        self.with(|t| t.interviews.iter().find(|i| i.id == id).cloned())
    }

    pub fn interview_count(&self) -> usize {
        self.with(|t| t.interviews.len())
    }

    pub fn interviewers_of(&self, interview_id: i64) -> Vec<i64> {
        self.with(|t| {
            t.employees
                .iter()
                .filter(|e| e.interview_id == interview_id)
                .map(|e| e.employee_id)
                .collect()
        })
    }
}

#[async_trait]
impl InterviewStore for InMemoryStore {
    async fn find_user_by_token(&self, digest: &str) -> Result<Option<User>> {
        Ok(self.with(|t| {
            let user_id = t.tokens.get(digest).copied()?;
            t.users
                .iter()
                .find(|u| u.id == user_id && u.is_active)
                .cloned()
        }))
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .filter(|u| ids.contains(&u.id))
                .cloned()
                .collect()
        }))
    }

    async fn find_membership(
        &self,
        company_id: i64,
        user_id: i64,
    ) -> Result<Option<CompanyMember>> {
        Ok(self.with(|t| {
            t.members
                .iter()
                .find(|m| m.company_id == company_id && m.user_id == user_id)
                .cloned()
        }))
    }

    async fn find_memberships(
        &self,
        company_id: i64,
        user_ids: &[i64],
    ) -> Result<Vec<CompanyMember>> {
        Ok(self.with(|t| {
            t.members
                .iter()
                .filter(|m| m.company_id == company_id && user_ids.contains(&m.user_id))
                .cloned()
                .collect()
        }))
    }

    async fn find_vacancy(&self, id: i64) -> Result<Option<Vacancy>> {
        Ok(self.with(|t| t.vacancies.iter().find(|v| v.id == id).cloned()))
    }

    async fn latest_attachments(&self, owner_ids: &[i64]) -> Result<Vec<Attachment>> {
        Ok(self.with(|t| {
            let mut latest: HashMap<i64, Attachment> = HashMap::new();
            for attachment in t.attachments.iter().filter(|a| owner_ids.contains(&a.owner_id)) {
                latest.insert(attachment.owner_id, attachment.clone());
            }
            latest.into_values().collect()
        }))
    }

    async fn list_interviews(&self, vacancy_id: i64) -> Result<Vec<InterviewAggregate>> {
        Ok(self.with(|t| {
            let mut interviews: Vec<&Interview> = t
                .interviews
                .iter()
                .filter(|i| i.vacancy_id == vacancy_id)
                .collect();
            interviews.sort_by_key(|i| (i.assigned_at, i.id));
            interviews.into_iter().map(|i| t.aggregate(i)).collect()
        }))
    }

    async fn find_interview(&self, id: i64) -> Result<Option<InterviewAggregate>> {
        Ok(self.with(|t| {
            t.interviews
                .iter()
                .find(|i| i.id == id)
                .map(|i| t.aggregate(i))
        }))
    }

    async fn create_interview(
        &self,
        interview: NewInterview,
        employees: Vec<NewInterviewEmployee>,
    ) -> Result<InterviewAggregate> {
        Ok(self.with(|t| {
            let now = Utc::now();
            let row = Interview {
                id: t.next_id(),
                vacancy_id: interview.vacancy_id,
                candidate_id: interview.candidate_id,
                assigned_at: interview.assigned_at,
                created_at: now,
                updated_at: now,
            };
            t.interviews.push(row.clone());
            let employees = employees.into_iter().map(|e| t.link(row.id, e)).collect();
            InterviewAggregate {
                interview: row,
                employees,
            }
        }))
    }

    async fn update_interview(
        &self,
        id: i64,
        changes: InterviewChanges,
    ) -> Result<Option<InterviewAggregate>> {
        Ok(self.with(|t| {
            let row = t.interviews.iter_mut().find(|i| i.id == id)?;
            if let Some(vacancy_id) = changes.vacancy_id {
                row.vacancy_id = vacancy_id;
            }
            if let Some(candidate_id) = changes.candidate_id {
                row.candidate_id = candidate_id;
            }
            if let Some(assigned_at) = changes.assigned_at {
                row.assigned_at = assigned_at;
            }
            row.updated_at = Utc::now();
            let row = row.clone();

            if let Some(employees) = changes.employees {
                t.employees.retain(|e| e.interview_id != id);
                for employee in employees {
                    t.link(id, employee);
                }
            }
            Some(t.aggregate(&row))
        }))
    }

    async fn delete_interview(&self, id: i64) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.interviews.len();
            t.interviews.retain(|i| i.id != id);
            t.employees.retain(|e| e.interview_id != id);
            t.interviews.len() < before
        }))
    }

    async fn delete_interview_employee(&self, interview_id: i64, employee_id: i64) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.employees.len();
            t.employees
                .retain(|e| !(e.interview_id == interview_id && e.employee_id == employee_id));
            t.employees.len() < before
        }))
    }
}

/// Company 3 owns active vacancy 7 with two interviews; HR 9 and recruiter 10
/// are staff, candidate 42 is a candidate member. Company 5 owns vacancy 20.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::default();
    store.with(|t| t.next_id = 1000);

    store.add_user(HR, Some(HR_TOKEN));
    store.add_user(RECRUITER, None);
    store.add_user(CANDIDATE, Some(CANDIDATE_TOKEN));
    store.add_user(OUTSIDER, Some(OUTSIDER_TOKEN));

    store.add_member(COMPANY, HR, HR_ROLE_ID);
    store.add_member(COMPANY, RECRUITER, HR_ROLE_ID);
    store.add_member(COMPANY, CANDIDATE, CANDIDATE_ROLE_ID);
    store.add_member(OTHER_COMPANY, OUTSIDER, HR_ROLE_ID);

    store.add_vacancy(VACANCY, COMPANY, true);
    store.add_vacancy(OTHER_VACANCY, COMPANY, true);
    store.add_vacancy(FOREIGN_VACANCY, OTHER_COMPANY, true);

    let now = Utc::now();
    store.add_interview(
        FIRST_INTERVIEW,
        VACANCY,
        CANDIDATE,
        now + Duration::days(2),
        &[(HR, HR_ROLE_ID)],
    );
    store.add_interview(
        SECOND_INTERVIEW,
        VACANCY,
        CANDIDATE,
        now + Duration::days(4),
        &[(HR, HR_ROLE_ID), (CANDIDATE, CANDIDATE_ROLE_ID)],
    );
    store.add_interview(
        FOREIGN_INTERVIEW,
        FOREIGN_VACANCY,
        OUTSIDER,
        now + Duration::days(6),
        &[(OUTSIDER, HR_ROLE_ID)],
    );
    store.add_attachment(CANDIDATE, "avatars/42.png");

    Arc::new(store)
}

pub fn app(store: Arc<InMemoryStore>) -> Router {
    let state = AppState::new(
        store,
        Arc::new(PublicMediaStorage::new("https://media.example.com", "uploads")),
    );
    routes::router(state)
}

pub fn interviews_url(company_id: i64, vacancy_id: i64) -> String {
    format!(
        "/api/v1/companies/{}/vacancies/{}/interviews/",
        company_id, vacancy_id
    )
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    send_raw(app, method, uri, token, body.map(|b| b.to_string())).await
}

/// Sends `body` verbatim as `application/json`, valid JSON or not.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Token {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
