//! Daily report submission and retrieval.
//!
//! Enforces the one business rule the store cannot: a branch principal may
//! only write rows for its own branch. Timestamps are assigned here, server
//! side, so the ledger's ordering never depends on client clocks.

use chrono::Utc;
use rust_decimal::Decimal;

use branchboard_core::{RetailEntry, Source};

use crate::error::AppError;
use crate::store::RowStore;

/// A validated report ready to be written to the ledger.
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Reporting date as entered (`YYYY-MM-DD`).
    pub date: String,
    /// Branch the report is for.
    pub branch: String,
    /// Walk-in count for the day.
    pub walkins: u32,
    /// Sales total for the day.
    pub sales: Decimal,
    /// Lead source.
    pub source: Source,
    /// Best-selling brand of the day, free text.
    pub top_brand: String,
}

/// Report operations over a [`RowStore`].
pub struct ReportService<'a> {
    store: &'a dyn RowStore,
}

impl<'a> ReportService<'a> {
    #[must_use]
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }

    /// Append a branch's daily report to the ledger.
    ///
    /// `scope` is the branch the caller's session is bound to; a report
    /// naming any other branch is rejected regardless of payload validity.
    ///
    /// # Errors
    ///
    /// [`AppError::Forbidden`] on a branch-scope mismatch, or
    /// [`AppError::Store`] if the append fails.
    pub async fn submit(&self, scope: &str, report: NewReport) -> Result<RetailEntry, AppError> {
        if report.branch != scope {
            tracing::warn!(
                scope = %scope,
                requested = %report.branch,
                "Rejected cross-branch report submission"
            );
            return Err(AppError::Forbidden);
        }

        let entry = RetailEntry {
            timestamp: Utc::now(),
            date: report.date,
            branch: report.branch,
            walkins: report.walkins,
            sales: report.sales,
            source: report.source,
            top_brand: report.top_brand,
        };
        self.store.append(&entry).await?;

        tracing::info!(
            branch = %entry.branch,
            date = %entry.date,
            "Report submitted"
        );
        Ok(entry)
    }

    /// Every ledger entry, in ledger (append) order.
    ///
    /// Rows are decoded leniently: a malformed cell degrades to its zero
    /// value rather than poisoning the whole read.
    ///
    /// # Errors
    ///
    /// [`AppError::Store`] if the read fails.
    pub async fn all_entries(&self) -> Result<Vec<RetailEntry>, AppError> {
        let rows = self.store.read_rows().await?;
        Ok(rows.iter().map(|row| RetailEntry::from_row(row)).collect())
    }

    /// Ledger entries for a single branch, in ledger order.
    ///
    /// # Errors
    ///
    /// [`AppError::Store`] if the read fails.
    pub async fn branch_entries(&self, branch: &str) -> Result<Vec<RetailEntry>, AppError> {
        let entries = self.all_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.branch == branch)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn report(branch: &str) -> NewReport {
        NewReport {
            date: "2024-03-20".to_string(),
            branch: branch.to_string(),
            walkins: 12,
            sales: Decimal::new(45_000, 0),
            source: Source::GoogleAds,
            top_brand: "Jaquar".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_appends_with_server_timestamp() {
        let store = MemoryStore::new();
        let before = Utc::now();

        let entry = ReportService::new(&store)
            .submit("Kolathur", report("Kolathur"))
            .await
            .unwrap();

        assert!(entry.timestamp >= before && entry.timestamp <= Utc::now());
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_cross_branch() {
        let store = MemoryStore::new();
        let result = ReportService::new(&store)
            .submit("Kolathur", report("Velacherry"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_all_entries_decodes_ledger_order() {
        let store = MemoryStore::new();
        let service = ReportService::new(&store);
        service.submit("Kolathur", report("Kolathur")).await.unwrap();
        service
            .submit("Velacherry", report("Velacherry"))
            .await
            .unwrap();

        let entries = service.all_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.first().unwrap().branch, "Kolathur");
        assert_eq!(entries.last().unwrap().branch, "Velacherry");
    }

    #[tokio::test]
    async fn test_branch_entries_filters_scope() {
        let store = MemoryStore::new();
        let service = ReportService::new(&store);
        service.submit("Kolathur", report("Kolathur")).await.unwrap();
        service
            .submit("Velacherry", report("Velacherry"))
            .await
            .unwrap();

        let entries = service.branch_entries("Velacherry").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().unwrap().branch, "Velacherry");
    }

    #[tokio::test]
    async fn test_repeated_reads_of_unchanged_store_agree() {
        let store = MemoryStore::new();
        let service = ReportService::new(&store);
        service.submit("Kolathur", report("Kolathur")).await.unwrap();

        let first = service.all_entries().await.unwrap();
        let second = service.all_entries().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_all_entries_tolerates_malformed_rows() {
        let store = MemoryStore::with_rows(vec![vec![
            "not-a-timestamp".to_string(),
            "2024-03-20".to_string(),
            "Kolathur".to_string(),
            "many".to_string(),
            "lots".to_string(),
            "Telegram".to_string(),
            String::new(),
        ]]);

        let entries = ReportService::new(&store).all_entries().await.unwrap();
        let entry = entries.first().unwrap();
        assert_eq!(entry.walkins, 0);
        assert_eq!(entry.sales, Decimal::ZERO);
        assert_eq!(entry.source, Source::Other);
    }
}
