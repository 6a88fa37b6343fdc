//! Admin analytics endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde_json::{Value, json};

use branchboard_core::RetailEntry;

use crate::analytics::{Filters, export_rows, filter_entries, kpis, sales_trend, walkins_by_branch};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::services::ReportService;
use crate::state::AppState;

async fn filtered_entries(
    state: &AppState,
    filters: &Filters,
) -> Result<Vec<RetailEntry>, AppError> {
    let entries = ReportService::new(state.store()).all_entries().await?;
    let today = Utc::now().date_naive();
    Ok(filter_entries(&entries, filters, today))
}

/// `GET /api/analytics`
///
/// Admin-only dashboard payload: KPIs, per-branch walk-ins, the sales
/// trend, and the filtered entries newest-first for the table view.
pub async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> Result<Json<Value>, AppError> {
    let entries = filtered_entries(&state, &filters).await?;

    let body = json!({
        "kpis": kpis(&entries),
        "branches": walkins_by_branch(&entries),
        "trend": sales_trend(&entries),
        "entries": entries.iter().rev().collect::<Vec<_>>(),
    });
    Ok(Json(body))
}

/// `GET /api/analytics/export`
///
/// Admin-only: the filtered entries shaped for spreadsheet export, with
/// display column names.
pub async fn export(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> Result<Json<Value>, AppError> {
    let entries = filtered_entries(&state, &filters).await?;
    let rows = export_rows(&entries);
    Ok(Json(json!({ "count": rows.len(), "rows": rows })))
}
