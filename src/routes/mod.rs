pub mod health;
pub mod interview;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::middleware::auth::require_token_auth;
use crate::AppState;

const INTERVIEWS: &str = "/api/v1/companies/:company_id/vacancies/:vacancy_id/interviews";
const INTERVIEW: &str = "/api/v1/companies/:company_id/vacancies/:vacancy_id/interviews/:id";
const INTERVIEW_EMPLOYEE: &str = "/api/v1/interviews/:interview_id/employees/:employee_id";

/// Full API router. Every `/api` route requires token authentication and is
/// reachable with or without a trailing slash.
pub fn router(state: AppState) -> Router {
    let mut api = Router::new();
    for slash in ["", "/"] {
        api = api
            .route(
                &format!("{}{}", INTERVIEWS, slash),
                get(interview::list_interviews).post(interview::create_interview),
            )
            .route(
                &format!("{}{}", INTERVIEW, slash),
                axum::routing::put(interview::update_interview)
                    .delete(interview::delete_interview),
            )
            .route(
                &format!("{}{}", INTERVIEW_EMPLOYEE, slash),
                delete(interview::remove_interview_employee),
            );
    }
    let api = api.route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_token_auth,
    ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
}
