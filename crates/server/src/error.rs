//! Unified error handling for the portal.
//!
//! The propagation policy is asymmetric on purpose: authentication and
//! authorization failures are constant-shape (never say which check
//! failed), validation failures name the failing fields, and store/infra
//! failures are generic to the caller but fully detailed in server-side
//! diagnostics.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::auth::TokenError;
use crate::store::StoreError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad credentials or a missing/invalid session. The body never says
    /// which.
    #[error("authentication failed")]
    Authentication,

    /// Role or scope mismatch. Generic by design.
    #[error("forbidden")]
    Forbidden,

    /// A submitted entry did not validate; carries the failing field names
    /// so the submitter can correct input.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Row store operation failed.
    #[error("row store error: {0}")]
    Store(#[from] StoreError),

    /// Token signing failed (server fault, not caller fault).
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Store and internal faults get full server-side detail and a
        // Sentry event; the client sees a generic body.
        if matches!(self, Self::Store(_) | Self::Token(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Portal request error"
            );
        }

        let (status, body) = match &self {
            Self::Authentication => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid credentials" }),
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "forbidden" })),
            Self::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "fields": fields }),
            ),
            Self::Store(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "service unavailable" }),
            ),
            Self::Token(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
