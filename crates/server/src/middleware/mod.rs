//! Request middleware: the route guard, authentication extractors, and
//! session-cookie plumbing.

pub mod auth;
pub mod guard;
pub mod session;

pub use auth::{CurrentUser, RequireAdmin, RequireAuth, RequireBranch};
pub use guard::route_guard;
pub use session::{AUTH_COOKIE, clear_session_cookie, session_cookie, token_from_headers};
