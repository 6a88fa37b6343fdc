//! Branchboard Core - Shared types library.
//!
//! This crate provides common types used across all Branchboard components:
//! - `server` - The reporting portal (JSON API)
//! - `integration-tests` - End-to-end tests against a running portal
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no clock
//! reads. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Roles, acquisition sources, the ledger row unit, and the
//!   email identifier type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
