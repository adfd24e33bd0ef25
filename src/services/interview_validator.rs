use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use validator::ValidationErrors;

use crate::database::store::InterviewStore;
use crate::dto::interview_dto::InterviewPayload;
use crate::error::{Error, Result};
use crate::models::interview::{InterviewChanges, NewInterview, NewInterviewEmployee};
use crate::models::vacancy::Vacancy;
use crate::utils::{time, validation::field_error};

const REQUIRED: &str = "This field is required.";

/// A create request that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewDraft {
    pub interview: NewInterview,
    pub employees: Vec<NewInterviewEmployee>,
}

#[derive(Clone, Copy)]
enum Mode<'a> {
    Create { vacancy_id: i64 },
    Update { current: &'a Vacancy },
}

/// Checks interview requests against the scheduling rules. Every field is
/// checked independently so that all violations are reported at once.
/// Only read lookups are issued against the store.
#[derive(Clone)]
pub struct InterviewValidator {
    store: Arc<dyn InterviewStore>,
}

impl InterviewValidator {
    pub fn new(store: Arc<dyn InterviewStore>) -> Self {
        Self { store }
    }

    /// Full validation of a create request made against the endpoint of
    /// `vacancy_id`; the body may not name any other vacancy.
    pub async fn validate_create(
        &self,
        company_id: i64,
        vacancy_id: i64,
        payload: &InterviewPayload,
    ) -> Result<InterviewDraft> {
        let checked = self
            .check(company_id, payload, Mode::Create { vacancy_id })
            .await?;
        match checked {
            InterviewChanges {
                vacancy_id: Some(vacancy_id),
                candidate_id: Some(candidate_id),
                assigned_at: Some(assigned_at),
                employees: Some(employees),
            } => Ok(InterviewDraft {
                interview: NewInterview {
                    vacancy_id,
                    candidate_id,
                    assigned_at,
                },
                employees,
            }),
            _ => Err(Error::Internal(
                "validated interview is missing required fields".to_string(),
            )),
        }
    }

    /// Partial validation: omitted fields are left alone, but the interview's
    /// current vacancy must still be active when `vacancy_id` is omitted.
    pub async fn validate_update(
        &self,
        company_id: i64,
        current_vacancy: &Vacancy,
        payload: &InterviewPayload,
    ) -> Result<InterviewChanges> {
        self.check(
            company_id,
            payload,
            Mode::Update {
                current: current_vacancy,
            },
        )
        .await
    }

    async fn check(
        &self,
        company_id: i64,
        payload: &InterviewPayload,
        mode: Mode<'_>,
    ) -> Result<InterviewChanges> {
        let required = matches!(mode, Mode::Create { .. });
        let mut errors = ValidationErrors::new();

        let vacancy_id = match (payload.vacancy_id.as_ref(), mode) {
            (Some(raw), Mode::Create { vacancy_id }) => {
                self.check_vacancy(company_id, raw, Some(vacancy_id), &mut errors)
                    .await?
            }
            (Some(raw), Mode::Update { .. }) => {
                self.check_vacancy(company_id, raw, None, &mut errors).await?
            }
            (None, Mode::Create { .. }) => {
                errors.add("vacancy_id", field_error("required", REQUIRED));
                None
            }
            (None, Mode::Update { current }) => {
                if !current.active {
                    errors.add("vacancy_id", inactive_vacancy(current.id));
                }
                None
            }
        };

        let candidate_id = match payload.candidate_id.as_ref() {
            Some(raw) => self.check_candidate(company_id, raw, &mut errors).await?,
            None => {
                if required {
                    errors.add("candidate_id", field_error("required", REQUIRED));
                }
                None
            }
        };

        let assigned_at = match payload.assigned_at.as_ref() {
            Some(raw) => check_assigned_at(raw, time::now(), &mut errors),
            None => {
                if required {
                    errors.add("assigned_at", field_error("required", REQUIRED));
                }
                None
            }
        };

        let employees = match payload.interviewees.as_ref() {
            Some(raw) => self.check_interviewees(company_id, raw, &mut errors).await?,
            None => {
                if required {
                    errors.add("interviewees", field_error("required", REQUIRED));
                }
                None
            }
        };

        if !errors.errors().is_empty() {
            tracing::debug!(company_id, ?errors, "interview request rejected");
            return Err(Error::Validation(errors));
        }

        Ok(InterviewChanges {
            vacancy_id,
            candidate_id,
            assigned_at,
            employees,
        })
    }

    async fn check_vacancy(
        &self,
        company_id: i64,
        raw: &JsonValue,
        expected: Option<i64>,
        errors: &mut ValidationErrors,
    ) -> Result<Option<i64>> {
        let Some(id) = parse_pk(raw) else {
            errors.add("vacancy_id", incorrect_pk_type(raw));
            return Ok(None);
        };
        if let Some(expected) = expected.filter(|expected| *expected != id) {
            errors.add(
                "vacancy_id",
                field_error(
                    "mismatch",
                    format!(
                        "Vacancy {} does not match the vacancy {} of this endpoint.",
                        id, expected
                    ),
                ),
            );
            return Ok(None);
        }
        let Some(vacancy) = self.store.find_vacancy(id).await? else {
            errors.add("vacancy_id", missing_pk(id));
            return Ok(None);
        };

        let mut valid = true;
        if vacancy.company_id != company_id {
            errors.add(
                "vacancy_id",
                field_error(
                    "foreign_company",
                    format!("Vacancy {} does not belong to this company.", id),
                ),
            );
            valid = false;
        }
        if !vacancy.active {
            errors.add("vacancy_id", inactive_vacancy(id));
            valid = false;
        }
        Ok(valid.then_some(id))
    }

    async fn check_candidate(
        &self,
        company_id: i64,
        raw: &JsonValue,
        errors: &mut ValidationErrors,
    ) -> Result<Option<i64>> {
        let Some(id) = parse_pk(raw) else {
            errors.add("candidate_id", incorrect_pk_type(raw));
            return Ok(None);
        };
        let users = self.store.find_users(&[id]).await?;
        if !users.iter().any(|u| u.id == id) {
            errors.add("candidate_id", missing_pk(id));
            return Ok(None);
        }
        if self.store.find_membership(company_id, id).await?.is_none() {
            errors.add("candidate_id", not_a_member(id));
            return Ok(None);
        }
        Ok(Some(id))
    }

    async fn check_interviewees(
        &self,
        company_id: i64,
        raw: &JsonValue,
        errors: &mut ValidationErrors,
    ) -> Result<Option<Vec<NewInterviewEmployee>>> {
        let JsonValue::Array(items) = raw else {
            errors.add(
                "interviewees",
                field_error(
                    "not_a_list",
                    format!(
                        "Expected a list of items but got type \"{}\".",
                        json_type(raw)
                    ),
                ),
            );
            return Ok(None);
        };
        if items.is_empty() {
            errors.add(
                "interviewees",
                field_error("empty", "This list may not be empty."),
            );
            return Ok(None);
        }

        let mut ids = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();
        let mut valid = true;
        for item in items {
            match parse_pk(item) {
                Some(id) if seen.insert(id) => ids.push(id),
                Some(id) => {
                    errors.add(
                        "interviewees",
                        field_error("duplicate", format!("Interviewer {} is listed twice.", id)),
                    );
                    valid = false;
                }
                None => {
                    errors.add("interviewees", incorrect_pk_type(item));
                    valid = false;
                }
            }
        }
        if !valid {
            return Ok(None);
        }

        let users = self.store.find_users(&ids).await?;
        let members = self.store.find_memberships(company_id, &ids).await?;

        let mut employees = Vec::with_capacity(ids.len());
        for id in ids {
            if !users.iter().any(|u| u.id == id) {
                errors.add("interviewees", missing_pk(id));
                valid = false;
                continue;
            }
            match members.iter().find(|m| m.user_id == id) {
                Some(member) => employees.push(NewInterviewEmployee {
                    employee_id: id,
                    role_id: member.role_id,
                }),
                None => {
                    errors.add("interviewees", not_a_member(id));
                    valid = false;
                }
            }
        }
        Ok(valid.then_some(employees))
    }
}

fn check_assigned_at(
    raw: &JsonValue,
    now: DateTime<Utc>,
    errors: &mut ValidationErrors,
) -> Option<DateTime<Utc>> {
    let Some(assigned_at) = raw.as_str().and_then(time::parse_timestamp) else {
        errors.add(
            "assigned_at",
            field_error(
                "invalid",
                "Datetime has wrong format. Use one of these formats instead: \
                 YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].",
            ),
        );
        return None;
    };
    if assigned_at <= now {
        errors.add(
            "assigned_at",
            field_error("not_in_future", "Interview must be assigned to a future date."),
        );
        return None;
    }
    Some(assigned_at)
}

/// Primary keys arrive as JSON integers or as numeric strings (form posts).
fn parse_pk(raw: &JsonValue) -> Option<i64> {
    match raw {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type(raw: &JsonValue) -> &'static str {
    match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "int",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "str",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "dict",
    }
}

fn incorrect_pk_type(raw: &JsonValue) -> validator::ValidationError {
    field_error(
        "incorrect_type",
        format!("Incorrect type. Expected pk value, received {}.", json_type(raw)),
    )
}

fn missing_pk(id: i64) -> validator::ValidationError {
    field_error(
        "does_not_exist",
        format!("Invalid pk \"{}\" - object does not exist.", id),
    )
}

fn not_a_member(id: i64) -> validator::ValidationError {
    field_error(
        "not_a_member",
        format!("User {} is not a member of this company.", id),
    )
}

fn inactive_vacancy(id: i64) -> validator::ValidationError {
    field_error("inactive", format!("Vacancy {} is not active.", id))
}
