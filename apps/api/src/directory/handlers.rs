//! Axum route handlers for the Directory API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::directory::queries;
use crate::errors::AppError;
use crate::models::employee::{EmployeeRow, ReviewAssignmentRow};
use crate::models::org::{DepartmentRow, OrganizationRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub role: String,
    pub email: String,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilter {
    pub reviewer_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Organization profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/organization
pub async fn handle_get_organization(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<OrganizationRow>, AppError> {
    Ok(Json(
        queries::get_organization(&state.db, auth.organization_id).await?,
    ))
}

/// PATCH /api/v1/organization
pub async fn handle_update_organization(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationRow>, AppError> {
    auth.require_admin()?;
    Ok(Json(
        queries::update_organization(
            &state.db,
            auth.organization_id,
            request.name.as_deref(),
            request.contact_email.as_deref(),
        )
        .await?,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Departments
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/departments
pub async fn handle_list_departments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<DepartmentRow>>, AppError> {
    Ok(Json(
        queries::list_departments(&state.db, auth.organization_id).await?,
    ))
}

/// POST /api/v1/departments
pub async fn handle_create_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentRow>), AppError> {
    auth.require_admin()?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let department = queries::create_department(&state.db, auth.organization_id, name).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// DELETE /api/v1/departments/:id
///
/// Rejected with a conflict while any employee still references the
/// department.
pub async fn handle_delete_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(department_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    queries::delete_department(&state.db, auth.organization_id, department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Employees
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/employees
pub async fn handle_list_employees(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<EmployeeRow>>, AppError> {
    Ok(Json(
        queries::list_employees(&state.db, auth.organization_id).await?,
    ))
}

/// GET /api/v1/employees/:id
pub async fn handle_get_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<EmployeeRow>, AppError> {
    Ok(Json(
        queries::get_employee(&state.db, auth.organization_id, employee_id).await?,
    ))
}

/// POST /api/v1/employees
pub async fn handle_create_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeRow>), AppError> {
    auth.require_admin()?;

    let name = request.name.trim();
    let role = request.role.trim();
    let email = request.email.trim();
    if name.is_empty() || role.is_empty() {
        return Err(AppError::Validation(
            "name and role cannot be empty".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }

    let employee = queries::create_employee(
        &state.db,
        auth.organization_id,
        request.department_id,
        name,
        role,
        email,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PATCH /api/v1/employees/:id
pub async fn handle_update_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeRow>, AppError> {
    auth.require_admin()?;
    Ok(Json(
        queries::update_employee(
            &state.db,
            auth.organization_id,
            employee_id,
            request.name.as_deref(),
            request.role.as_deref(),
            request.department_id,
        )
        .await?,
    ))
}

/// DELETE /api/v1/employees/:id
pub async fn handle_delete_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    queries::delete_employee(&state.db, auth.organization_id, employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Assignment edges
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/assignments?reviewerId=…
pub async fn handle_list_assignments(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<Vec<ReviewAssignmentRow>>, AppError> {
    Ok(Json(
        queries::list_assignments(&state.db, auth.organization_id, filter.reviewer_id).await?,
    ))
}

/// POST /api/v1/assignments
pub async fn handle_create_assignment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<ReviewAssignmentRow>), AppError> {
    auth.require_admin()?;
    let assignment = queries::create_assignment(
        &state.db,
        auth.organization_id,
        request.reviewer_id,
        request.reviewee_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// DELETE /api/v1/assignments/:id
pub async fn handle_delete_assignment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(assignment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    queries::delete_assignment(&state.db, auth.organization_id, assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_employee_request_uses_camel_case() {
        let json = serde_json::json!({
            "name": "Alice Moreau",
            "role": "Backend Engineer",
            "email": "alice@example.com",
            "departmentId": Uuid::new_v4(),
        });
        let request: CreateEmployeeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.name, "Alice Moreau");
        assert!(request.department_id.is_some());
    }

    #[test]
    fn create_assignment_request_uses_camel_case() {
        let json = serde_json::json!({
            "reviewerId": Uuid::new_v4(),
            "revieweeId": Uuid::new_v4(),
        });
        let request: CreateAssignmentRequest = serde_json::from_value(json).unwrap();
        assert_ne!(request.reviewer_id, request.reviewee_id);
    }
}
