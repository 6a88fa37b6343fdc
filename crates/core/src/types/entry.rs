//! The ledger row unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Source;

/// One daily report submitted by a branch.
///
/// Entries are append-only: once written to the row store they are never
/// mutated or deleted. The store is the sole durable owner; everything the
/// portal computes is derived from a snapshot of these rows.
///
/// # Row schema
///
/// The backing table has seven columns in fixed A-G order: timestamp,
/// business date, branch, walk-ins, sales, source, top brand. Row 1 is the
/// header row; data begins at row 2. [`RetailEntry::to_row`] and
/// [`RetailEntry::from_row`] are the only places that know this mapping, and
/// they must stay in agreement - a reorder is a breaking schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailEntry {
    /// Submission instant, stamped server-side at append time.
    pub timestamp: DateTime<Utc>,
    /// Business date the report covers, `YYYY-MM-DD`.
    pub date: String,
    /// Branch that owns the entry. Always equals the submitting
    /// principal's scope; the data service enforces this at write time.
    pub branch: String,
    /// Walk-in count for the day.
    pub walkins: u32,
    /// Sales revenue for the day.
    pub sales: Decimal,
    /// Acquisition channel reported for the day.
    pub source: Source,
    /// Best-selling brand reported for the day.
    pub top_brand: String,
}

impl RetailEntry {
    /// Number of columns in the backing table (A-G).
    pub const COLUMNS: usize = 7;

    /// Maps a raw stored row to an entry.
    ///
    /// Stored rows are not trusted: short rows read as empty cells, a
    /// malformed `walkins` or `sales` cell coerces to 0 (never NaN, never an
    /// error), an unknown `source` coerces to [`Source::Other`], and an
    /// unparseable `timestamp` coerces to the Unix epoch. A malformed cell
    /// must never make the whole read fail.
    #[must_use]
    pub fn from_row(row: &[String]) -> Self {
        let cell = |idx: usize| row.get(idx).map_or("", String::as_str);

        Self {
            timestamp: cell(0)
                .parse::<DateTime<Utc>>()
                .unwrap_or(DateTime::UNIX_EPOCH),
            date: cell(1).to_owned(),
            branch: cell(2).to_owned(),
            walkins: cell(3).parse().unwrap_or(0),
            sales: cell(4).parse().unwrap_or(Decimal::ZERO),
            source: Source::from_cell(cell(5)),
            top_brand: cell(6).to_owned(),
        }
    }

    /// Serializes the entry into the fixed A-G column order.
    #[must_use]
    pub fn to_row(&self) -> [String; Self::COLUMNS] {
        [
            self.timestamp.to_rfc3339(),
            self.date.clone(),
            self.branch.clone(),
            self.walkins.to_string(),
            self.sales.to_string(),
            self.source.to_string(),
            self.top_brand.clone(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn test_from_row_well_formed() {
        let entry = RetailEntry::from_row(&row(&[
            "2024-03-20T09:30:00+00:00",
            "2024-03-20",
            "Kolathur",
            "12",
            "45000.50",
            "Walk-by",
            "Jaquar",
        ]));

        assert_eq!(entry.date, "2024-03-20");
        assert_eq!(entry.branch, "Kolathur");
        assert_eq!(entry.walkins, 12);
        assert_eq!(entry.sales, Decimal::new(4_500_050, 2));
        assert_eq!(entry.source, Source::WalkBy);
        assert_eq!(entry.top_brand, "Jaquar");
    }

    #[test]
    fn test_from_row_malformed_numbers_coerce_to_zero() {
        let entry = RetailEntry::from_row(&row(&[
            "not-a-timestamp",
            "2024-03-20",
            "Kolathur",
            "abc",
            "lots",
            "Carrier pigeon",
            "",
        ]));

        assert_eq!(entry.walkins, 0);
        assert_eq!(entry.sales, Decimal::ZERO);
        assert_eq!(entry.source, Source::Other);
        assert_eq!(entry.timestamp, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_from_row_short_row_reads_empty_cells() {
        let entry = RetailEntry::from_row(&row(&["2024-03-20T09:30:00Z"]));
        assert_eq!(entry.date, "");
        assert_eq!(entry.branch, "");
        assert_eq!(entry.walkins, 0);
        assert_eq!(entry.sales, Decimal::ZERO);
    }

    #[test]
    fn test_to_row_fixed_column_order() {
        let entry = RetailEntry {
            timestamp: "2024-03-20T09:30:00Z".parse().unwrap(),
            date: "2024-03-20".to_owned(),
            branch: "Velacherry".to_owned(),
            walkins: 8,
            sales: Decimal::new(120_000, 0),
            source: Source::JustDial,
            top_brand: "Kohler".to_owned(),
        };

        let cells = entry.to_row();
        assert_eq!(cells[1], "2024-03-20");
        assert_eq!(cells[2], "Velacherry");
        assert_eq!(cells[3], "8");
        assert_eq!(cells[4], "120000");
        assert_eq!(cells[5], "JustDial");
        assert_eq!(cells[6], "Kohler");
    }

    #[test]
    fn test_row_round_trip() {
        let entry = RetailEntry {
            timestamp: "2024-03-21T10:00:00Z".parse().unwrap(),
            date: "2024-03-21".to_owned(),
            branch: "Kodambakkam".to_owned(),
            walkins: 3,
            sales: Decimal::new(999_99, 2),
            source: Source::OldCustomer,
            top_brand: "Grohe".to_owned(),
        };

        let back = RetailEntry::from_row(&entry.to_row());
        assert_eq!(back, entry);
    }
}
