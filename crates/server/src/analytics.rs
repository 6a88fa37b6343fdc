//! Dashboard analytics over ledger entries.
//!
//! Pure functions: entries in, aggregates out. All filtering happens here
//! after the full ledger read, which is the right trade at this scale (a
//! few rows per branch per day) and keeps the store interface to exactly
//! two operations.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use branchboard_core::{RetailEntry, Source};

/// Fraction of sales counted as gross profit.
const GROSS_MARGIN: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Number of trailing entries plotted on the sales trend.
const TREND_WINDOW: usize = 15;

/// Reporting window, anchored to "today" in the portal's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Entries dated today.
    Today,
    /// Entries from the start of the current week (Sunday) onward.
    Week,
    /// Entries from the first of the current month onward.
    Month,
    /// No date restriction.
    #[default]
    All,
}

impl TimeRange {
    /// Inclusive lower bound for the window, or `None` for [`TimeRange::All`].
    fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Today => Some(today),
            Self::Week => {
                let days = i64::from(today.weekday().num_days_from_sunday());
                Some(today - chrono::Duration::days(days))
            }
            Self::Month => today.with_day(1),
            Self::All => None,
        }
    }
}

/// Dashboard filters, deserialized straight from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Reporting window.
    pub range: TimeRange,
    /// Exact branch name.
    pub branch: Option<String>,
    /// Exact lead source.
    pub source: Option<Source>,
    /// Substring match against the entry's date cell.
    pub date_contains: Option<String>,
    /// Minimum walk-in count, inclusive.
    pub min_walkins: Option<u32>,
    /// Minimum sales total, inclusive.
    pub min_sales: Option<Decimal>,
}

/// Headline numbers for the filtered window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_walkins: u64,
    pub total_sales: Decimal,
    /// Reports per hundred walk-ins; 0 when there are no walk-ins.
    pub conversion_rate: f64,
    /// Sales at the fixed margin. An estimate for the dashboard, not an
    /// accounting figure.
    pub estimated_gross_profit: Decimal,
}

/// Walk-in total for one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchWalkins {
    pub branch: String,
    pub walkins: u64,
}

/// One point on the sales trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Day label, e.g. `Mar 20`.
    pub date: String,
    pub sales: Decimal,
}

/// One CSV-shaped export row; the serde names are the column headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "Walk-ins")]
    pub walkins: u32,
    #[serde(rename = "Sales")]
    pub sales: Decimal,
    #[serde(rename = "Source")]
    pub source: Source,
    #[serde(rename = "Top Brand")]
    pub top_brand: String,
}

/// Apply all filters, AND-combined, preserving ledger order.
///
/// Date-window checks parse the entry's date cell; an unparseable date
/// fails the check (excluded from any window narrower than
/// [`TimeRange::All`]) rather than slipping through.
#[must_use]
pub fn filter_entries(entries: &[RetailEntry], filters: &Filters, today: NaiveDate) -> Vec<RetailEntry> {
    let window_start = filters.range.start(today);

    entries
        .iter()
        .filter(|entry| {
            if let Some(start) = window_start {
                let Ok(date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") else {
                    return false;
                };
                if date < start || date > today {
                    return false;
                }
            }
            if let Some(branch) = &filters.branch
                && entry.branch != *branch
            {
                return false;
            }
            if let Some(source) = filters.source
                && entry.source != source
            {
                return false;
            }
            if let Some(fragment) = &filters.date_contains
                && !entry.date.contains(fragment.as_str())
            {
                return false;
            }
            if let Some(min) = filters.min_walkins
                && entry.walkins < min
            {
                return false;
            }
            if let Some(min) = filters.min_sales
                && entry.sales < min
            {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Headline KPIs for a set of entries.
#[must_use]
pub fn kpis(entries: &[RetailEntry]) -> Kpis {
    let total_walkins: u64 = entries.iter().map(|e| u64::from(e.walkins)).sum();
    let total_sales: Decimal = entries.iter().map(|e| e.sales).sum();

    #[allow(clippy::cast_precision_loss)] // Daily report counts stay far below f64 precision
    let conversion_rate = if total_walkins == 0 {
        0.0
    } else {
        entries.len() as f64 / total_walkins as f64 * 100.0
    };

    Kpis {
        total_walkins,
        total_sales,
        conversion_rate,
        estimated_gross_profit: total_sales * GROSS_MARGIN,
    }
}

/// Walk-in totals per branch, in order of first appearance in the ledger.
#[must_use]
pub fn walkins_by_branch(entries: &[RetailEntry]) -> Vec<BranchWalkins> {
    let mut totals: Vec<BranchWalkins> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|t| t.branch == entry.branch) {
            Some(total) => total.walkins += u64::from(entry.walkins),
            None => totals.push(BranchWalkins {
                branch: entry.branch.clone(),
                walkins: u64::from(entry.walkins),
            }),
        }
    }
    totals
}

/// Sales trend over the last [`TREND_WINDOW`] entries, grouped by day.
///
/// Entries whose date cell does not parse are skipped; day labels appear in
/// the order the days first occur within the window.
#[must_use]
pub fn sales_trend(entries: &[RetailEntry]) -> Vec<TrendPoint> {
    let window = entries
        .iter()
        .skip(entries.len().saturating_sub(TREND_WINDOW));

    let mut points: Vec<TrendPoint> = Vec::new();
    for entry in window {
        let Ok(date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") else {
            continue;
        };
        let label = date.format("%b %d").to_string();
        match points.iter_mut().find(|p| p.date == label) {
            Some(point) => point.sales += entry.sales,
            None => points.push(TrendPoint {
                date: label,
                sales: entry.sales,
            }),
        }
    }
    points
}

/// Shape entries for spreadsheet export, ledger order preserved.
#[must_use]
pub fn export_rows(entries: &[RetailEntry]) -> Vec<ExportRow> {
    entries
        .iter()
        .map(|entry| ExportRow {
            date: entry.date.clone(),
            branch: entry.branch.clone(),
            walkins: entry.walkins,
            sales: entry.sales,
            source: entry.source,
            top_brand: entry.top_brand.clone(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(date: &str, branch: &str, walkins: u32, sales: i64, source: Source) -> RetailEntry {
        RetailEntry {
            timestamp: Utc::now(),
            date: date.to_string(),
            branch: branch.to_string(),
            walkins,
            sales: Decimal::new(sales, 0),
            source,
            top_brand: "Jaquar".to_string(),
        }
    }

    fn sample() -> Vec<RetailEntry> {
        vec![
            entry("2024-03-18", "Kolathur", 10, 20_000, Source::GoogleAds),
            entry("2024-03-19", "Velacherry", 5, 10_000, Source::WalkBy),
            entry("2024-03-20", "Kolathur", 15, 30_000, Source::GoogleAds),
        ]
    }

    #[test]
    fn test_kpis_totals_and_margin() {
        let k = kpis(&sample());
        assert_eq!(k.total_walkins, 30);
        assert_eq!(k.total_sales, Decimal::new(60_000, 0));
        assert_eq!(k.estimated_gross_profit, Decimal::new(15_000, 0));
        assert!((k.conversion_rate - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kpis_empty_set_is_all_zero() {
        let k = kpis(&[]);
        assert_eq!(k.total_walkins, 0);
        assert_eq!(k.total_sales, Decimal::ZERO);
        assert_eq!(k.estimated_gross_profit, Decimal::ZERO);
        assert!((k.conversion_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kpis_zero_walkins_does_not_divide() {
        let entries = vec![entry("2024-03-20", "Kolathur", 0, 5_000, Source::Other)];
        assert!((kpis(&entries).conversion_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filter_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let filters = Filters {
            range: TimeRange::Today,
            ..Filters::default()
        };
        let kept = filter_entries(&sample(), &filters, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.first().unwrap().date, "2024-03-20");
    }

    #[test]
    fn test_filter_week_starts_sunday() {
        // 2024-03-20 is a Wednesday; the week began Sunday 2024-03-17.
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut entries = sample();
        entries.push(entry("2024-03-16", "Kolathur", 7, 1_000, Source::JustDial));

        let filters = Filters {
            range: TimeRange::Week,
            ..Filters::default()
        };
        let kept = filter_entries(&entries, &filters, today);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|e| e.date.as_str() >= "2024-03-17"));
    }

    #[test]
    fn test_filter_month() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut entries = sample();
        entries.push(entry("2024-02-29", "Kolathur", 3, 2_000, Source::OldCustomer));

        let filters = Filters {
            range: TimeRange::Month,
            ..Filters::default()
        };
        assert_eq!(filter_entries(&entries, &filters, today).len(), 3);
    }

    #[test]
    fn test_filter_unparseable_date_fails_closed() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut entries = sample();
        entries.push(entry("yesterday-ish", "Kolathur", 3, 2_000, Source::Other));

        let windowed = Filters {
            range: TimeRange::Month,
            ..Filters::default()
        };
        assert_eq!(filter_entries(&entries, &windowed, today).len(), 3);

        // With no window the raw cell passes through untouched.
        assert_eq!(filter_entries(&entries, &Filters::default(), today).len(), 4);
    }

    #[test]
    fn test_filter_window_excludes_future_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut entries = sample();
        entries.push(entry("2024-03-25", "Kolathur", 9, 4_000, Source::GoogleAds));

        let filters = Filters {
            range: TimeRange::Month,
            ..Filters::default()
        };
        assert_eq!(filter_entries(&entries, &filters, today).len(), 3);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let filters = Filters {
            branch: Some("Kolathur".to_string()),
            source: Some(Source::GoogleAds),
            min_walkins: Some(12),
            ..Filters::default()
        };
        let kept = filter_entries(&sample(), &filters, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.first().unwrap().walkins, 15);
    }

    #[test]
    fn test_filter_min_sales_and_date_fragment() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let filters = Filters {
            date_contains: Some("2024-03".to_string()),
            min_sales: Some(Decimal::new(15_000, 0)),
            ..Filters::default()
        };
        assert_eq!(filter_entries(&sample(), &filters, today).len(), 2);
    }

    #[test]
    fn test_branch_and_min_sales_worked_example() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let entries = vec![
            entry("2024-03-20", "A", 10, 1_000, Source::Other),
            entry("2024-03-21", "B", 5, 500, Source::Other),
        ];

        let by_branch = Filters {
            branch: Some("A".to_string()),
            ..Filters::default()
        };
        let k = kpis(&filter_entries(&entries, &by_branch, today));
        assert_eq!(k.total_walkins, 10);
        assert_eq!(k.total_sales, Decimal::new(1_000, 0));

        let by_min_sales = Filters {
            min_sales: Some(Decimal::new(600, 0)),
            ..Filters::default()
        };
        assert!(filter_entries(&entries, &by_min_sales, today).is_empty());
    }

    #[test]
    fn test_walkins_by_branch_first_appearance_order() {
        let totals = walkins_by_branch(&sample());
        assert_eq!(
            totals,
            vec![
                BranchWalkins {
                    branch: "Kolathur".to_string(),
                    walkins: 25,
                },
                BranchWalkins {
                    branch: "Velacherry".to_string(),
                    walkins: 5,
                },
            ]
        );
    }

    #[test]
    fn test_sales_trend_groups_by_day() {
        let mut entries = sample();
        entries.push(entry("2024-03-20", "Velacherry", 2, 5_000, Source::WalkBy));

        let trend = sales_trend(&entries);
        assert_eq!(trend.len(), 3);
        let last = trend.last().unwrap();
        assert_eq!(last.date, "Mar 20");
        assert_eq!(last.sales, Decimal::new(35_000, 0));
    }

    #[test]
    fn test_sales_trend_window_takes_last_entries() {
        let entries: Vec<RetailEntry> = (1..=20)
            .map(|day| entry(&format!("2024-03-{day:02}"), "Kolathur", 1, 100, Source::Other))
            .collect();

        let trend = sales_trend(&entries);
        assert_eq!(trend.len(), TREND_WINDOW);
        assert_eq!(trend.first().unwrap().date, "Mar 06");
        assert_eq!(trend.last().unwrap().date, "Mar 20");
    }

    #[test]
    fn test_sales_trend_skips_unparseable_dates() {
        let entries = vec![
            entry("garbage", "Kolathur", 1, 100, Source::Other),
            entry("2024-03-20", "Kolathur", 1, 200, Source::Other),
        ];
        let trend = sales_trend(&entries);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend.first().unwrap().sales, Decimal::new(200, 0));
    }

    #[test]
    fn test_export_rows_use_display_headers() {
        let rows = export_rows(&sample());
        let json = serde_json::to_value(rows.first().unwrap()).unwrap();
        assert_eq!(json["Date"], "2024-03-18");
        assert_eq!(json["Branch"], "Kolathur");
        assert_eq!(json["Walk-ins"], 10);
        assert_eq!(json["Source"], "Google Ads");
        assert_eq!(json["Top Brand"], "Jaquar");
    }
}
