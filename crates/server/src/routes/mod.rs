//! HTTP surface of the portal.
//!
//! | Method | Path                    | Access  | Purpose                     |
//! |--------|-------------------------|---------|-----------------------------|
//! | POST   | `/api/auth/login`       | public  | Exchange credentials for a session cookie |
//! | GET    | `/api/auth/me`          | public  | Who is signed in, if anyone |
//! | POST   | `/api/auth/logout`      | public  | Clear the session cookie    |
//! | POST   | `/api/reports`          | branch  | Submit a daily report       |
//! | GET    | `/api/entries`          | admin   | Full ledger                 |
//! | GET    | `/api/entries/mine`     | branch  | Own branch's ledger slice   |
//! | GET    | `/api/analytics`        | admin   | Dashboard aggregates        |
//! | GET    | `/api/analytics/export` | admin   | Export-shaped rows          |
//! | GET    | `/health`               | public  | Liveness probe              |
//!
//! Everything not listed as public sits behind the route guard, which
//! redirects unauthenticated browsers to `/login`.

pub mod analytics;
pub mod auth;
pub mod reports;

use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::middleware::route_guard;
use crate::state::AppState;

/// API routes, without the guard or state applied.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::whoami))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/reports", post(reports::submit))
        .route("/api/entries", get(reports::list_entries))
        .route("/api/entries/mine", get(reports::my_entries))
        .route("/api/analytics", get(analytics::dashboard))
        .route("/api/analytics/export", get(analytics::export))
}

/// The complete application router: routes, health probe, and the route
/// guard wired to the shared state.
pub fn app(state: &AppState) -> Router {
    Router::new()
        .merge(routes())
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state.clone())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
