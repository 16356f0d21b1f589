//! Report rows and their wire shape.
//!
//! The serialized form is a stable contract consumed by the UI:
//! `{ _id, employeeId, month, ranking, improvements, qualities, summary,
//! createdAt, updatedAt }`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One synthesized performance evaluation for an employee for one
/// calendar month. Never mutated after creation.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    /// `YYYY-MM`.
    pub month: String,
    /// 0–10 overall score for the month.
    pub ranking: f64,
    pub improvements: Vec<String>,
    pub qualities: Vec<String>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_ui_contract() {
        let row = ReportRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            month: "2024-03".to_string(),
            ranking: 7.5,
            improvements: vec!["delegate more".to_string()],
            qualities: vec!["clear communicator".to_string()],
            summary: "A strong month.".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "_id",
            "employeeId",
            "month",
            "ranking",
            "improvements",
            "qualities",
            "summary",
            "createdAt",
            "updatedAt",
        ] {
            assert!(object.contains_key(key), "missing wire key '{key}'");
        }
        assert!(!object.contains_key("organizationId"));
        assert!(!object.contains_key("organization_id"));
        assert_eq!(object.len(), 9);
    }
}
