//! Branchboard server library.
//!
//! This crate provides the portal functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! The portal gates a single shared ledger behind two roles:
//! - `admin` reads everything (entries, analytics, exports)
//! - `branch` appends entries for its own branch only
//!
//! All row-level scoping lives in [`services::reports`]; the route guard in
//! [`middleware::guard`] only decides authenticated vs. not.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
