use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::ReviewRow;

pub async fn list_reviews_for_subject(
    pool: &PgPool,
    org_id: Uuid,
    subject_id: Uuid,
) -> Result<Vec<ReviewRow>, AppError> {
    Ok(sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT * FROM reviews
        WHERE organization_id = $1 AND subject_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(org_id)
    .bind(subject_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_review(
    pool: &PgPool,
    org_id: Uuid,
    review_id: Uuid,
) -> Result<ReviewRow, AppError> {
    sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1 AND organization_id = $2")
        .bind(review_id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))
}

pub async fn create_review(
    pool: &PgPool,
    org_id: Uuid,
    author_id: Uuid,
    subject_id: Uuid,
    content: &str,
) -> Result<ReviewRow, AppError> {
    Ok(sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (organization_id, author_id, subject_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(org_id)
    .bind(author_id)
    .bind(subject_id)
    .bind(content)
    .fetch_one(pool)
    .await?)
}

/// Only `content` is mutable; author and subject are fixed at creation.
pub async fn update_review_content(
    pool: &PgPool,
    org_id: Uuid,
    review_id: Uuid,
    content: &str,
) -> Result<ReviewRow, AppError> {
    sqlx::query_as::<_, ReviewRow>(
        r#"
        UPDATE reviews
        SET content = $3, updated_at = now()
        WHERE id = $1 AND organization_id = $2
        RETURNING *
        "#,
    )
    .bind(review_id)
    .bind(org_id)
    .bind(content)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))
}
