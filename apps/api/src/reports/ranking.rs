//! Best-employee ranking over the trailing three completed months.

use serde::Serialize;

use crate::models::employee::EmployeeRow;
use crate::models::report::ReportRow;
use crate::month::Month;

/// How many completed months feed the ranking window.
pub const RANKING_WINDOW_MONTHS: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEmployee {
    pub employee: EmployeeRow,
    pub average_score: f64,
    /// Window months with no report for this employee, most recent first.
    pub missing_months: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    /// The month identifiers considered, most recent first.
    pub months: Vec<String>,
    pub rankings: Vec<RankedEmployee>,
}

/// Ranks employees by average report score over `months`.
///
/// The average covers only the reports that exist; an employee with no
/// reports in the window scores 0 with every month missing. The sort is
/// stable, so ties keep the original fetch order.
pub fn rank_employees(
    rows: Vec<(EmployeeRow, Vec<ReportRow>)>,
    months: &[Month],
) -> Vec<RankedEmployee> {
    let month_keys: Vec<String> = months.iter().map(|m| m.to_string()).collect();

    let mut ranked: Vec<RankedEmployee> = rows
        .into_iter()
        .map(|(employee, reports)| {
            let average_score = if reports.is_empty() {
                0.0
            } else {
                reports.iter().map(|r| r.ranking).sum::<f64>() / reports.len() as f64
            };
            let missing_months: Vec<String> = month_keys
                .iter()
                .filter(|key| !reports.iter().any(|r| &r.month == *key))
                .cloned()
                .collect();
            RankedEmployee {
                employee,
                average_score,
                missing_months,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn employee(name: &str) -> EmployeeRow {
        EmployeeRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            department_id: None,
            name: name.to_string(),
            role: "Engineer".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(month: &str, ranking: f64) -> ReportRow {
        ReportRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            month: month.to_string(),
            ranking,
            improvements: vec![],
            qualities: vec![],
            summary: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn window() -> Vec<Month> {
        ["2024-04", "2024-03", "2024-02"]
            .iter()
            .map(|m| Month::parse(m).unwrap())
            .collect()
    }

    #[test]
    fn sorts_by_average_descending() {
        let rows = vec![
            (
                employee("Ana"),
                vec![report("2024-04", 9.0), report("2024-03", 9.0), report("2024-02", 9.0)],
            ),
            (
                employee("Ben"),
                vec![report("2024-04", 7.0), report("2024-03", 7.0), report("2024-02", 7.0)],
            ),
            (
                employee("Cora"),
                vec![report("2024-04", 8.0), report("2024-03", 8.0), report("2024-02", 8.0)],
            ),
        ];

        let ranked = rank_employees(rows, &window());
        let scores: Vec<f64> = ranked.iter().map(|r| r.average_score).collect();
        assert_eq!(scores, vec![9.0, 8.0, 7.0]);
        assert_eq!(ranked[0].employee.name, "Ana");
        assert_eq!(ranked[1].employee.name, "Cora");
        assert_eq!(ranked[2].employee.name, "Ben");
    }

    #[test]
    fn average_covers_only_existing_reports() {
        let rows = vec![(
            employee("Ana"),
            vec![report("2024-04", 6.0), report("2024-02", 8.0)],
        )];

        let ranked = rank_employees(rows, &window());
        assert_eq!(ranked[0].average_score, 7.0);
        assert_eq!(ranked[0].missing_months, vec!["2024-03"]);
    }

    #[test]
    fn no_reports_scores_zero_with_all_months_missing() {
        let ranked = rank_employees(vec![(employee("Ana"), vec![])], &window());
        assert_eq!(ranked[0].average_score, 0.0);
        assert_eq!(
            ranked[0].missing_months,
            vec!["2024-04", "2024-03", "2024-02"]
        );
    }

    #[test]
    fn ties_keep_fetch_order() {
        let rows = vec![
            (employee("First"), vec![report("2024-04", 5.0)]),
            (employee("Second"), vec![report("2024-04", 5.0)]),
        ];

        let ranked = rank_employees(rows, &window());
        assert_eq!(ranked[0].employee.name, "First");
        assert_eq!(ranked[1].employee.name, "Second");
    }
}
