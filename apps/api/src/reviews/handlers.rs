//! Axum route handlers for the Reviews API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::directory::queries::{assignment_exists, get_employee};
use crate::errors::AppError;
use crate::models::review::ReviewRow;
use crate::reviews::queries;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectQuery {
    pub subject_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub subject_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub content: String,
}

/// GET /api/v1/reviews?subjectId=…
pub async fn handle_list_reviews(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<SubjectQuery>,
) -> Result<Json<Vec<ReviewRow>>, AppError> {
    let subject = get_employee(&state.db, auth.organization_id, params.subject_id).await?;
    Ok(Json(
        queries::list_reviews_for_subject(&state.db, auth.organization_id, subject.id).await?,
    ))
}

/// POST /api/v1/reviews
///
/// The caller must hold an assignment edge to the subject.
pub async fn handle_create_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewRow>), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let subject = get_employee(&state.db, auth.organization_id, request.subject_id).await?;

    if !assignment_exists(&state.db, auth.organization_id, auth.employee_id, subject.id).await? {
        return Err(AppError::Forbidden);
    }

    let review = queries::create_review(
        &state.db,
        auth.organization_id,
        auth.employee_id,
        subject.id,
        request.content.trim(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /api/v1/reviews/:id
///
/// Author-only, and edit rights lapse once the assignment edge is removed.
pub async fn handle_update_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(review_id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewRow>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let review = queries::get_review(&state.db, auth.organization_id, review_id).await?;

    if review.author_id != auth.employee_id {
        return Err(AppError::Forbidden);
    }
    if !assignment_exists(
        &state.db,
        auth.organization_id,
        review.author_id,
        review.subject_id,
    )
    .await?
    {
        return Err(AppError::Forbidden);
    }

    Ok(Json(
        queries::update_review_content(
            &state.db,
            auth.organization_id,
            review_id,
            request.content.trim(),
        )
        .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_review_request_uses_camel_case() {
        let json = serde_json::json!({
            "subjectId": Uuid::new_v4(),
            "content": "Great collaborator this month.",
        });
        let request: CreateReviewRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.content, "Great collaborator this month.");
    }
}
