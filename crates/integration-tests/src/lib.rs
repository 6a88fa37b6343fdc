//! Integration tests for Branchboard.
//!
//! These run against a live portal instance over HTTP, cookies and all, so
//! they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the portal with a test spreadsheet configured
//! cargo run -p branchboard-server
//!
//! # Run integration tests
//! cargo test -p branchboard-integration-tests -- --ignored
//! ```
//!
//! Configuration comes from the environment:
//!
//! - `PORTAL_BASE_URL` - portal under test (default `http://localhost:3000`)
//! - `PORTAL_TEST_ADMIN_EMAIL` / `PORTAL_TEST_ADMIN_PASSWORD`
//! - `PORTAL_TEST_BRANCH_EMAIL` / `PORTAL_TEST_BRANCH_PASSWORD`
//!
//! The submission tests append real rows to whatever spreadsheet the portal
//! is pointed at; run them against a throwaway sheet.
