// All LLM prompt constants for the reports module.
// Composes the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Role fragment for report synthesis.
pub const REPORT_SYSTEM_ROLE: &str = "You are an experienced people manager \
    synthesizing a monthly performance report from peer feedback. \
    Be specific, balanced, and grounded in the feedback you are given.";

pub fn report_system() -> String {
    format!("{REPORT_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Report synthesis prompt template.
/// Replace: {employee_name}, {employee_role}, {review_block}
pub const REPORT_PROMPT_TEMPLATE: &str = r#"Synthesize a monthly performance report for the employee below from their peer reviews.

EMPLOYEE: {employee_name}
ROLE: {employee_role}

PEER REVIEWS (verbatim, one per line):
{review_block}

Return a JSON object with this EXACT schema (no extra fields):
{
  "ranking": 7.5,
  "improvements": ["specific area to improve"],
  "qualities": ["specific observed strength"],
  "summary": "3-5 sentence narrative summary of the month"
}

Rules:
- "ranking" is a number from 0 to 10 scoring overall performance this month
- "improvements" and "qualities" are short, concrete bullet strings drawn from the reviews
- Base every statement on the reviews above; do NOT invent feedback"#;

/// Builds the synthesis prompt. Every review text is embedded verbatim as
/// a numbered line.
pub fn build_report_prompt(employee_name: &str, employee_role: &str, reviews: &[String]) -> String {
    let review_block = reviews
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n");

    REPORT_PROMPT_TEMPLATE
        .replace("{employee_name}", employee_name)
        .replace("{employee_role}", employee_role)
        .replace("{review_block}", &review_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_every_review_verbatim() {
        let reviews = vec![
            "Alice unblocked the migration twice this month.".to_string(),
            "Could communicate schedule slips earlier.".to_string(),
        ];
        let prompt = build_report_prompt("Alice Moreau", "Backend Engineer", &reviews);

        for review in &reviews {
            assert!(prompt.contains(review), "missing review: {review}");
        }
        assert!(prompt.contains("EMPLOYEE: Alice Moreau"));
        assert!(prompt.contains("ROLE: Backend Engineer"));
    }

    #[test]
    fn prompt_numbers_reviews_in_order() {
        let reviews = vec!["first".to_string(), "second".to_string()];
        let prompt = build_report_prompt("A", "B", &reviews);
        assert!(prompt.contains("1. first\n2. second"));
    }

    #[test]
    fn system_prompt_composes_json_only_fragment() {
        let system = report_system();
        assert!(system.starts_with(REPORT_SYSTEM_ROLE));
        assert!(system.contains("valid JSON only"));
    }
}
