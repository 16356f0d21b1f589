//! Axum route handlers for the Reports API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::directory::queries::{get_employee, list_employees};
use crate::errors::AppError;
use crate::models::report::ReportRow;
use crate::month::Month;
use crate::reports::backfill::{backfill_reports, generate_for_month, BackfillOutcome};
use crate::reports::ranking::{rank_employees, RankingReport, RANKING_WINDOW_MONTHS};
use crate::reports::store::{fetch_report, fetch_reports_for_months, list_reports};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub employee_id: Uuid,
    pub month: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillRequest {
    pub employee_id: Uuid,
    pub months: Vec<String>,
}

/// POST /api/v1/reports/generate
///
/// Idempotent: an already-generated report comes back with 200, a newly
/// synthesized one with 201. Regeneration never replaces an existing row.
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<GenerateReportRequest>,
) -> Result<(StatusCode, Json<ReportRow>), AppError> {
    let month = Month::parse(&request.month)?;
    let employee = get_employee(&state.db, auth.organization_id, request.employee_id).await?;

    if let Some(existing) =
        fetch_report(&state.db, auth.organization_id, employee.id, month).await?
    {
        return Ok((StatusCode::OK, Json(existing)));
    }

    let report =
        generate_for_month(&state.db, state.synthesizer.as_ref(), &employee, month).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// POST /api/v1/reports/backfill
///
/// Generates every missing report in the requested set of months. Months
/// are validated up front; per-month synthesis failures are collected in
/// the outcome rather than aborting the batch.
pub async fn handle_backfill(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<BackfillRequest>,
) -> Result<Json<BackfillOutcome>, AppError> {
    if request.months.is_empty() {
        return Err(AppError::Validation("months cannot be empty".to_string()));
    }
    let months = request
        .months
        .iter()
        .map(|m| Month::parse(m))
        .collect::<Result<Vec<_>, _>>()?;

    let employee = get_employee(&state.db, auth.organization_id, request.employee_id).await?;

    let outcome =
        backfill_reports(&state.db, state.synthesizer.as_ref(), &employee, &months).await;
    Ok(Json(outcome))
}

/// GET /api/v1/reports/employee/:id
pub async fn handle_list_reports(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<ReportRow>>, AppError> {
    let employee = get_employee(&state.db, auth.organization_id, employee_id).await?;
    Ok(Json(
        list_reports(&state.db, auth.organization_id, employee.id).await?,
    ))
}

/// GET /api/v1/reports/employee/:id/:month
pub async fn handle_get_report(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((employee_id, month)): Path<(Uuid, String)>,
) -> Result<Json<ReportRow>, AppError> {
    let month = Month::parse(&month)?;
    let employee = get_employee(&state.db, auth.organization_id, employee_id).await?;

    fetch_report(&state.db, auth.organization_id, employee.id, month)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No report for employee {} in {month}", employee.id))
        })
}

/// GET /api/v1/reports/rankings
///
/// Ranks every employee of the organization over the three most recent
/// completed calendar months.
pub async fn handle_rankings(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<RankingReport>, AppError> {
    let months = Month::latest_completed(RANKING_WINDOW_MONTHS, Utc::now().date_naive());
    let employees = list_employees(&state.db, auth.organization_id).await?;

    let mut rows = Vec::with_capacity(employees.len());
    for employee in employees {
        let reports =
            fetch_reports_for_months(&state.db, auth.organization_id, employee.id, &months)
                .await?;
        rows.push((employee, reports));
    }

    let rankings = rank_employees(rows, &months);
    Ok(Json(RankingReport {
        months: months.iter().map(|m| m.to_string()).collect(),
        rankings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_uses_camel_case() {
        let json = serde_json::json!({
            "employeeId": Uuid::new_v4(),
            "month": "2024-03",
        });
        let request: GenerateReportRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.month, "2024-03");
    }

    #[test]
    fn backfill_request_uses_camel_case() {
        let json = serde_json::json!({
            "employeeId": Uuid::new_v4(),
            "months": ["2024-01", "2024-02"],
        });
        let request: BackfillRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.months.len(), 2);
    }
}
