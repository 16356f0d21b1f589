//! Review aggregation — collects the review texts feeding one report.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::month::Month;

/// Returns the contents of every review written about `employee_id`
/// during `month`, oldest first. An empty result means the caller must
/// substitute the zero-score placeholder instead of calling the model.
pub async fn collect_review_texts(
    pool: &PgPool,
    organization_id: Uuid,
    employee_id: Uuid,
    month: Month,
) -> Result<Vec<String>, AppError> {
    let (start, end) = month.bounds();

    Ok(sqlx::query_scalar::<_, String>(
        r#"
        SELECT content FROM reviews
        WHERE organization_id = $1 AND subject_id = $2
          AND created_at >= $3 AND created_at < $4
        ORDER BY created_at
        "#,
    )
    .bind(organization_id)
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?)
}
