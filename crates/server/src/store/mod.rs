//! Row store gateway.
//!
//! The ledger lives in an external tabular store with a fixed seven-column
//! schema (A-G: timestamp, date, branch, walkins, sales, source, brand; row
//! 1 is headers). This module owns the append/read contract against it;
//! everything above works with [`RetailEntry`] values or raw row cells.
//!
//! Every operation is a single remote round trip with no retry or backoff.
//! A failed call surfaces as a generic operational failure to the user and
//! is retried by the user, never looped internally.

pub mod memory;
pub mod sheets;

use async_trait::async_trait;
use thiserror::Error;

use branchboard_core::RetailEntry;

pub use memory::MemoryStore;
pub use sheets::SheetsStore;

/// Errors from the row store gateway.
///
/// None of these are retryable within a request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store credentials are malformed or unusable (bad PEM, bad config).
    #[error("row store credentials invalid: {0}")]
    Credentials(String),

    /// The service-account token exchange was rejected.
    #[error("row store token exchange failed: {0}")]
    TokenExchange(String),

    /// Transport-level failure reaching the remote store.
    #[error("row store transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a non-success status.
    #[error("row store API error (status {status}): {message}")]
    Api {
        /// HTTP status returned by the store.
        status: u16,
        /// Response body, for server-side diagnostics only.
        message: String,
    },
}

/// Append/read operations against the external ledger.
///
/// Object safe so [`crate::state::AppState`] can hold the production
/// Sheets-backed implementation or the in-memory one used by tests.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Append one entry in strict A-G column order. Atomic per call; any
    /// ordering between concurrent appends is the remote store's concern.
    async fn append(&self, entry: &RetailEntry) -> Result<(), StoreError>;

    /// Read all data rows (row 2 onward) as raw cells. Mapping raw cells
    /// to [`RetailEntry`] - including the malformed-number coercion - is
    /// the caller's job, not the gateway's.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>, StoreError>;
}
