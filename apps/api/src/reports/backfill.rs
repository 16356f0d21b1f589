//! Missing-report backfill — generates any report not yet present for a
//! set of target months, strictly sequentially, tolerating per-month
//! failure.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::employee::EmployeeRow;
use crate::models::report::ReportRow;
use crate::month::Month;
use crate::reports::aggregator::collect_review_texts;
use crate::reports::store::{fetch_report, insert_report};
use crate::reports::synthesizer::{ReportSynthesizer, SynthesizedReport};

/// One month the batch could not produce a report for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFailure {
    pub month: String,
    pub error: String,
}

/// The outcome of one backfill batch. Every requested month lands in
/// exactly one of `reports` or `failed_months`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillOutcome {
    pub success: bool,
    pub reports: Vec<ReportRow>,
    pub failed_months: Vec<MonthFailure>,
}

/// Produces the report for one month: reuses an existing row, substitutes
/// the zero-score placeholder when the month has no reviews, and invokes
/// the synthesizer otherwise. This is the single canonical generation
/// path — the generate endpoint and the backfill batch both go through
/// here, so validation and duplicate handling cannot diverge.
pub async fn generate_for_month(
    pool: &PgPool,
    synthesizer: &dyn ReportSynthesizer,
    employee: &EmployeeRow,
    month: Month,
) -> Result<ReportRow, AppError> {
    if let Some(existing) =
        fetch_report(pool, employee.organization_id, employee.id, month).await?
    {
        return Ok(existing);
    }

    let texts = collect_review_texts(pool, employee.organization_id, employee.id, month).await?;

    let synthesized = if texts.is_empty() {
        info!(
            "No reviews for employee {} in {month}; storing placeholder",
            employee.id
        );
        SynthesizedReport::empty_month()
    } else {
        info!(
            "Synthesizing report for employee {} in {month} from {} review(s)",
            employee.id,
            texts.len()
        );
        synthesizer
            .synthesize(&employee.name, &employee.role, &texts)
            .await?
    };

    insert_report(
        pool,
        employee.organization_id,
        employee.id,
        month,
        &synthesized,
    )
    .await
}

/// Runs the batch strictly sequentially (one outstanding model call at a
/// time) and folds the per-month results into the outcome. A single
/// month's failure never aborts the batch.
pub async fn backfill_reports(
    pool: &PgPool,
    synthesizer: &dyn ReportSynthesizer,
    employee: &EmployeeRow,
    months: &[Month],
) -> BackfillOutcome {
    let mut results = Vec::with_capacity(months.len());
    for &month in months {
        let result = generate_for_month(pool, synthesizer, employee, month).await;
        if let Err(err) = &result {
            warn!(
                "Backfill month {month} failed for employee {}: {err}",
                employee.id
            );
        }
        results.push((month, result));
    }
    fold_outcomes(results)
}

/// Folds per-month results into `(successes, failures)`.
fn fold_outcomes(results: Vec<(Month, Result<ReportRow, AppError>)>) -> BackfillOutcome {
    let mut reports = Vec::new();
    let mut failed_months = Vec::new();

    for (month, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => failed_months.push(MonthFailure {
                month: month.to_string(),
                error: err.to_string(),
            }),
        }
    }

    BackfillOutcome {
        success: failed_months.is_empty(),
        reports,
        failed_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn report_for(month: Month) -> ReportRow {
        ReportRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            month: month.to_string(),
            ranking: 5.0,
            improvements: vec![],
            qualities: vec![],
            summary: "ok".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    #[test]
    fn every_month_lands_in_exactly_one_bucket() {
        let months = ["2024-01", "2024-02", "2024-03"];
        let results = vec![
            (month("2024-01"), Ok(report_for(month("2024-01")))),
            (
                month("2024-02"),
                Err(AppError::Llm("malformed AI response: no JSON object".to_string())),
            ),
            (month("2024-03"), Ok(report_for(month("2024-03")))),
        ];

        let outcome = fold_outcomes(results);
        assert_eq!(
            outcome.reports.len() + outcome.failed_months.len(),
            months.len()
        );
        assert!(!outcome.success);
        assert_eq!(outcome.failed_months[0].month, "2024-02");
        assert!(outcome.failed_months[0].error.contains("malformed AI response"));
    }

    #[test]
    fn success_iff_no_month_failed() {
        let all_ok = fold_outcomes(vec![
            (month("2024-01"), Ok(report_for(month("2024-01")))),
            (month("2024-02"), Ok(report_for(month("2024-02")))),
        ]);
        assert!(all_ok.success);
        assert!(all_ok.failed_months.is_empty());

        let all_failed = fold_outcomes(vec![
            (
                month("2024-01"),
                Err(AppError::Llm("model call failed".to_string())),
            ),
            (
                month("2024-02"),
                Err(AppError::Llm("model call failed".to_string())),
            ),
        ]);
        assert!(!all_failed.success);
        assert!(all_failed.reports.is_empty());
        assert_eq!(all_failed.failed_months.len(), 2);
    }

    #[test]
    fn report_order_follows_request_order() {
        let outcome = fold_outcomes(vec![
            (month("2024-03"), Ok(report_for(month("2024-03")))),
            (month("2024-01"), Ok(report_for(month("2024-01")))),
            (month("2024-02"), Ok(report_for(month("2024-02")))),
        ]);
        let months: Vec<&str> = outcome.reports.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-03", "2024-01", "2024-02"]);
    }

    #[test]
    fn empty_batch_is_successful() {
        let outcome = fold_outcomes(vec![]);
        assert!(outcome.success);
        assert!(outcome.reports.is_empty());
        assert!(outcome.failed_months.is_empty());
    }
}
