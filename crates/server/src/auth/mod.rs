//! Authentication: the static credential store and the stateless token
//! service.
//!
//! There is a fixed, small set of principals known at process start (one
//! admin, one per branch); both the credential store and the signing secret
//! are read-only for the process lifetime. Session state lives entirely in
//! the signed token - there is no server-side session table.

pub mod credentials;
pub mod token;

pub use credentials::{CredentialStore, Principal};
pub use token::{Claims, TOKEN_TTL_SECONDS, TokenError, TokenService};
