//! Report submission and ledger listing endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use branchboard_core::{RetailEntry, Source};
use chrono::NaiveDate;

use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireBranch};
use crate::services::{NewReport, ReportService};
use crate::state::AppState;

/// Incoming report body, deliberately loose: every field is optional or
/// stringly typed so validation can name each failing field instead of
/// bailing on the first deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportPayload {
    pub date: String,
    pub branch: String,
    pub walkins: Option<i64>,
    pub sales: Option<Decimal>,
    pub source: String,
    pub brand: String,
}

impl ReportPayload {
    /// Validate the payload into a [`NewReport`], collecting every failing
    /// field name.
    fn validate(self) -> Result<NewReport, Vec<String>> {
        let mut failed = Vec::new();

        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            failed.push("date".to_string());
        }
        if self.branch.trim().is_empty() {
            failed.push("branch".to_string());
        }
        let walkins = match self.walkins.and_then(|n| u32::try_from(n).ok()) {
            Some(walkins) => walkins,
            None => {
                failed.push("walkins".to_string());
                0
            }
        };
        let sales = match self.sales.filter(|s| !s.is_sign_negative()) {
            Some(sales) => sales,
            None => {
                failed.push("sales".to_string());
                Decimal::ZERO
            }
        };
        let source = match self.source.parse::<Source>() {
            Ok(source) => source,
            Err(_) => {
                failed.push("source".to_string());
                Source::Other
            }
        };
        if self.brand.trim().is_empty() {
            failed.push("brand".to_string());
        }

        if failed.is_empty() {
            Ok(NewReport {
                date: self.date,
                branch: self.branch,
                walkins,
                sales,
                source,
                top_brand: self.brand,
            })
        } else {
            Err(failed)
        }
    }
}

/// `POST /api/reports`
///
/// Branch-only. Validates the payload, checks the branch scope, and appends
/// to the ledger with a server-side timestamp.
pub async fn submit(
    scope: RequireBranch,
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    // A missing or unparseable body gets the same field-list shape as a
    // payload that deserialized but failed validation.
    let Ok(Json(payload)) = payload else {
        return Err(AppError::Validation(vec!["body".to_string()]));
    };
    let report = payload.validate().map_err(AppError::Validation)?;

    let entry = ReportService::new(state.store())
        .submit(&scope.branch, report)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "entry": entry })),
    ))
}

/// `GET /api/entries`
///
/// Admin-only: the full ledger in append order.
pub async fn list_entries(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let entries = ReportService::new(state.store()).all_entries().await?;
    Ok(Json(entries_body(entries)))
}

/// `GET /api/entries/mine`
///
/// Branch-only: the caller's own slice of the ledger.
pub async fn my_entries(
    scope: RequireBranch,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let entries = ReportService::new(state.store())
        .branch_entries(&scope.branch)
        .await?;
    Ok(Json(entries_body(entries)))
}

fn entries_body(entries: Vec<RetailEntry>) -> Value {
    json!({ "count": entries.len(), "entries": entries })
}
