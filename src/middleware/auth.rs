use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::utils::crypto::token_digest;
use crate::AppState;

/// The caller resolved from `Authorization: Token <key>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub async fn require_token_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(key) = auth_str.strip_prefix("Token ").map(str::trim) else {
        return unauthorized("unsupported_scheme");
    };
    if key.is_empty() {
        return unauthorized("invalid_token");
    }

    match state.store.find_user_by_token(&token_digest(key)).await {
        Ok(Some(user)) if user.is_active => {
            req.extensions_mut().insert(AuthUser {
                id: user.id,
                email: user.email,
            });
            next.run(req).await
        }
        Ok(_) => unauthorized("invalid_token"),
        Err(err) => err.into_response(),
    }
}
