//! Report synthesis — turns raw peer review text into a structured report
//! via the generative model.
//!
//! Pluggable behind the `ReportSynthesizer` trait (`AppState` holds an
//! `Arc<dyn ReportSynthesizer>`), so handlers and the backfill
//! orchestrator never touch the LLM client directly.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::reports::prompts::{build_report_prompt, report_system};

/// The four fields every synthesized report carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedReport {
    pub ranking: f64,
    pub improvements: Vec<String>,
    pub qualities: Vec<String>,
    pub summary: String,
}

impl SynthesizedReport {
    /// The zero-score report substituted for a month with no reviews.
    /// The model is never called for such months.
    pub fn empty_month() -> Self {
        Self {
            ranking: 0.0,
            improvements: Vec::new(),
            qualities: Vec::new(),
            summary: "No peer reviews were submitted for this month.".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("model call failed: {0}")]
    Client(#[from] LlmError),

    #[error("malformed AI response: {0}")]
    Malformed(String),
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        AppError::Llm(err.to_string())
    }
}

/// The synthesizer seam. Implement this to swap the model backend without
/// touching handler or orchestrator code.
#[async_trait]
pub trait ReportSynthesizer: Send + Sync {
    /// Synthesizes a report from a non-empty list of review texts.
    async fn synthesize(
        &self,
        employee_name: &str,
        employee_role: &str,
        reviews: &[String],
    ) -> Result<SynthesizedReport, SynthesisError>;
}

/// Production synthesizer backed by the Anthropic client.
pub struct LlmReportSynthesizer {
    llm: LlmClient,
}

impl LlmReportSynthesizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ReportSynthesizer for LlmReportSynthesizer {
    async fn synthesize(
        &self,
        employee_name: &str,
        employee_role: &str,
        reviews: &[String],
    ) -> Result<SynthesizedReport, SynthesisError> {
        let prompt = build_report_prompt(employee_name, employee_role, reviews);
        let raw = self.llm.complete(&prompt, &report_system()).await?;
        debug!("Synthesizer received {} chars of model output", raw.len());
        parse_model_output(&raw)
    }
}

/// Matches the outermost `{...}` block in the model's reply. Greedy, so
/// prose before and after the object is discarded while the full block,
/// including nested braces, is kept.
static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Extracts and validates the model's JSON reply.
///
/// The model is instructed to answer with a bare JSON object, but replies
/// wrapped in prose or code fences are tolerated: the outermost `{...}`
/// block is taken. Each of the four fields is type-checked. No retry on
/// failure — the caller records the month as failed.
pub fn parse_model_output(raw: &str) -> Result<SynthesizedReport, SynthesisError> {
    let block = JSON_BLOCK
        .find(raw)
        .ok_or_else(|| SynthesisError::Malformed("no JSON object in model output".to_string()))?;

    let value: Value = serde_json::from_str(block.as_str())
        .map_err(|e| SynthesisError::Malformed(format!("invalid JSON: {e}")))?;

    let ranking = value
        .get("ranking")
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed_field("ranking", "a number"))?;
    let improvements = string_list(&value, "improvements")?;
    let qualities = string_list(&value, "qualities")?;
    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed_field("summary", "a string"))?
        .to_string();

    Ok(SynthesizedReport {
        ranking,
        improvements,
        qualities,
        summary,
    })
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>, SynthesisError> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed_field(field, "a list of strings"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| malformed_field(field, "a list of strings"))
        })
        .collect()
}

fn malformed_field(field: &str, expected: &str) -> SynthesisError {
    SynthesisError::Malformed(format!("`{field}` must be {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "ranking": 8.5,
        "improvements": ["delegate more"],
        "qualities": ["mentors juniors", "ships reliably"],
        "summary": "A strong month overall."
    }"#;

    #[test]
    fn parses_bare_json_object() {
        let report = parse_model_output(VALID).unwrap();
        assert_eq!(report.ranking, 8.5);
        assert_eq!(report.improvements, vec!["delegate more"]);
        assert_eq!(report.qualities.len(), 2);
        assert_eq!(report.summary, "A strong month overall.");
    }

    #[test]
    fn parses_object_embedded_in_prose() {
        let raw = format!("Here is the report you asked for:\n{VALID}\nLet me know!");
        let report = parse_model_output(&raw).unwrap();
        assert_eq!(report.ranking, 8.5);
    }

    #[test]
    fn parses_object_inside_code_fences() {
        let raw = format!("```json\n{VALID}\n```");
        let report = parse_model_output(&raw).unwrap();
        assert_eq!(report.summary, "A strong month overall.");
    }

    #[test]
    fn integer_ranking_is_accepted() {
        let raw = r#"{"ranking": 7, "improvements": [], "qualities": [], "summary": "ok"}"#;
        let report = parse_model_output(raw).unwrap();
        assert_eq!(report.ranking, 7.0);
    }

    #[test]
    fn missing_object_is_malformed() {
        let err = parse_model_output("I cannot produce a report.").unwrap_err();
        assert!(err.to_string().starts_with("malformed AI response"));
    }

    #[test]
    fn non_numeric_ranking_is_malformed() {
        let raw = r#"{"ranking": "eight", "improvements": [], "qualities": [], "summary": "ok"}"#;
        let err = parse_model_output(raw).unwrap_err();
        assert!(err.to_string().contains("`ranking` must be a number"));
    }

    #[test]
    fn non_string_list_entry_is_malformed() {
        let raw = r#"{"ranking": 5, "improvements": [1, 2], "qualities": [], "summary": "ok"}"#;
        let err = parse_model_output(raw).unwrap_err();
        assert!(err.to_string().contains("`improvements` must be a list of strings"));
    }

    #[test]
    fn missing_summary_is_malformed() {
        let raw = r#"{"ranking": 5, "improvements": [], "qualities": []}"#;
        let err = parse_model_output(raw).unwrap_err();
        assert!(err.to_string().contains("`summary` must be a string"));
    }

    #[test]
    fn truncated_json_is_malformed() {
        let raw = r#"{"ranking": 5, "improvements": ["a"], "qualities": ["b"], "summary": "cut"#;
        assert!(parse_model_output(raw).is_err());
    }

    #[test]
    fn fields_round_trip_through_serde() {
        let report = parse_model_output(VALID).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let recovered: SynthesizedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, report);
    }

    #[test]
    fn empty_month_placeholder_scores_zero() {
        let placeholder = SynthesizedReport::empty_month();
        assert_eq!(placeholder.ranking, 0.0);
        assert!(placeholder.improvements.is_empty());
        assert!(placeholder.qualities.is_empty());
        assert!(!placeholder.summary.is_empty());
    }
}
