//! Business services sitting between the HTTP handlers and the row store.

pub mod reports;

pub use reports::{NewReport, ReportService};
