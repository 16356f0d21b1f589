//! Report persistence. One report per (employee, month) — the uniqueness
//! invariant lives in DDL, so a concurrent duplicate insert surfaces as a
//! detectable conflict instead of a second row.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::ReportRow;
use crate::month::Month;
use crate::reports::synthesizer::SynthesizedReport;

pub async fn fetch_report(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
    month: Month,
) -> Result<Option<ReportRow>, AppError> {
    Ok(sqlx::query_as::<_, ReportRow>(
        "SELECT * FROM reports WHERE organization_id = $1 AND employee_id = $2 AND month = $3",
    )
    .bind(org_id)
    .bind(employee_id)
    .bind(month.to_string())
    .fetch_optional(pool)
    .await?)
}

/// All reports for one employee, most recent month first. `YYYY-MM` keys
/// sort chronologically as text.
pub async fn list_reports(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
) -> Result<Vec<ReportRow>, AppError> {
    Ok(sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT * FROM reports
        WHERE organization_id = $1 AND employee_id = $2
        ORDER BY month DESC
        "#,
    )
    .bind(org_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?)
}

pub async fn fetch_reports_for_months(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
    months: &[Month],
) -> Result<Vec<ReportRow>, AppError> {
    let keys: Vec<String> = months.iter().map(|m| m.to_string()).collect();

    Ok(sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT * FROM reports
        WHERE organization_id = $1 AND employee_id = $2 AND month = ANY($3)
        ORDER BY month DESC
        "#,
    )
    .bind(org_id)
    .bind(employee_id)
    .bind(&keys)
    .fetch_all(pool)
    .await?)
}

/// Inserts the report row for (employee, month). A duplicate surfaces as
/// `Conflict` via the uniqueness constraint — the application never
/// pre-checks, retries, or merges on that race.
pub async fn insert_report(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
    month: Month,
    report: &SynthesizedReport,
) -> Result<ReportRow, AppError> {
    sqlx::query_as::<_, ReportRow>(
        r#"
        INSERT INTO reports
            (organization_id, employee_id, month, ranking, improvements, qualities, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(org_id)
    .bind(employee_id)
    .bind(month.to_string())
    .bind(report.ranking)
    .bind(&report.improvements)
    .bind(&report.qualities)
    .bind(&report.summary)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(
            e,
            format!("A report for employee {employee_id} and month {month} already exists"),
        )
    })
}
