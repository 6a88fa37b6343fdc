//! Authentication endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::middleware::{CurrentUser, clear_session_cookie, session_cookie};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`
///
/// Exchanges credentials for a session cookie. Every failure mode - missing
/// or malformed body, unknown identifier, wrong password - produces the
/// same 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Ok(Json(request)) = payload else {
        return Err(AppError::Authentication);
    };

    let principal = state
        .credentials()
        .authenticate(&request.email, &request.password)
        .ok_or(AppError::Authentication)?;

    let token = state.tokens().issue(principal)?;
    let cookie = session_cookie(&token, state.config().is_secure());

    tracing::info!(principal = %principal.email, role = %principal.role, "Login succeeded");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "role": principal.role,
            "branch": principal.branch,
        })),
    )
        .into_response())
}

/// `GET /api/auth/me`
///
/// Public: reports the signed-in principal, or `null` for anonymous
/// callers, so the client can decide what to render without tripping the
/// route guard.
pub async fn whoami(CurrentUser(user): CurrentUser) -> Json<Value> {
    let user = user.map(|claims| {
        json!({
            "email": claims.sub,
            "role": claims.role,
            "branch": claims.branch,
        })
    });
    Json(json!({ "user": user }))
}

/// `POST /api/auth/logout`
///
/// Clears the session cookie. Idempotent: logging out while logged out is a
/// success.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config().is_secure());
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response()
}
