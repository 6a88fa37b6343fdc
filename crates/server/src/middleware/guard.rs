//! Route guard middleware.
//!
//! Runs before every handler and enforces the portal's navigation rules:
//!
//! - `/health`, `/login`, and the `/api/auth/*` endpoints are public.
//! - An already-authenticated visit to `/login` is redirected to `/`.
//! - Any other path without a valid session redirects to `/login`; an
//!   invalid or expired cookie is cleared on the way out.
//! - A valid session's claims are stashed in request extensions so
//!   extractors can pick them up without re-verifying the token.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

use super::session::{clear_session_cookie, token_from_headers};

/// Path prefixes reachable without a session.
const PUBLIC_PREFIXES: [&str; 3] = ["/health", "/login", "/api/auth"];

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Gate every request on session state.
pub async fn route_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let token = token_from_headers(req.headers());
    let claims = token.and_then(|token| state.tokens().verify(&token).ok());

    if is_public(&path) {
        // A logged-in user has no business on the login page.
        if path == "/login" && claims.is_some() {
            return Redirect::to("/").into_response();
        }
        if let Some(claims) = claims {
            req.extensions_mut().insert(claims);
        }
        return next.run(req).await;
    }

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => {
            // Clear whatever cookie was presented; it was absent, garbage,
            // or expired, and the distinction does not matter to the client.
            let mut response = Redirect::to("/login").into_response();
            if let Ok(value) = clear_session_cookie(state.config().is_secure()).parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            response
        }
    }
}
