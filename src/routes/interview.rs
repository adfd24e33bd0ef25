use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::interview_dto::{InterviewEnvelope, InterviewPayload, InterviewResponse},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/companies/{company_id}/vacancies/{vacancy_id}/interviews/",
    params(
        ("company_id" = i64, Path, description = "Company ID"),
        ("vacancy_id" = i64, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Interviews of the vacancy", body = [InterviewResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not staff of the company"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((company_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list(auth.id, company_id, vacancy_id)
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    post,
    path = "/api/v1/companies/{company_id}/vacancies/{vacancy_id}/interviews/",
    params(
        ("company_id" = i64, Path, description = "Company ID"),
        ("vacancy_id" = i64, Path, description = "Vacancy ID")
    ),
    request_body = InterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewEnvelope>),
        (status = 400, description = "Field validation errors"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((company_id, vacancy_id)): Path<(i64, i64)>,
    payload: std::result::Result<Json<InterviewPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let interview = state
        .interview_service
        .create(auth.id, company_id, vacancy_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewEnvelope::from(interview))))
}

#[utoipa::path(
    put,
    path = "/api/v1/companies/{company_id}/vacancies/{vacancy_id}/interviews/{id}/",
    params(
        ("company_id" = i64, Path, description = "Company ID"),
        ("vacancy_id" = i64, Path, description = "Vacancy ID"),
        ("id" = i64, Path, description = "Interview ID")
    ),
    request_body = InterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewEnvelope>),
        (status = 400, description = "Field validation errors"),
        (status = 404, description = "Interview not found in this vacancy")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((company_id, vacancy_id, id)): Path<(i64, i64, i64)>,
    payload: std::result::Result<Json<InterviewPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let interview = state
        .interview_service
        .update(auth.id, company_id, vacancy_id, id, &payload)
        .await?;
    Ok(Json(InterviewEnvelope::from(interview)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/companies/{company_id}/vacancies/{vacancy_id}/interviews/{id}/",
    params(
        ("company_id" = i64, Path, description = "Company ID"),
        ("vacancy_id" = i64, Path, description = "Vacancy ID"),
        ("id" = i64, Path, description = "Interview ID")
    ),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 404, description = "Interview not found in this vacancy")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((company_id, vacancy_id, id)): Path<(i64, i64, i64)>,
) -> Result<impl IntoResponse> {
    state
        .interview_service
        .delete(auth.id, company_id, vacancy_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/interviews/{interview_id}/employees/{employee_id}/",
    params(
        ("interview_id" = i64, Path, description = "Interview ID"),
        ("employee_id" = i64, Path, description = "Interviewer user ID")
    ),
    responses(
        (status = 204, description = "Interviewer removed from the interview"),
        (status = 404, description = "No such interviewer on this interview")
    )
)]
#[axum::debug_handler]
pub async fn remove_interview_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((interview_id, employee_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    state
        .interview_service
        .remove_employee(auth.id, interview_id, employee_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
