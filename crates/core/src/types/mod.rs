//! Core types for Branchboard.
//!
//! This module provides type-safe wrappers for the portal's domain concepts.

pub mod email;
pub mod entry;
pub mod role;
pub mod source;

pub use email::{Email, EmailError};
pub use entry::RetailEntry;
pub use role::Role;
pub use source::{Source, UnknownSource};
