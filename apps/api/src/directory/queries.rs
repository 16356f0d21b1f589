use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{EmployeeRow, ReviewAssignmentRow};
use crate::models::org::{DepartmentRow, OrganizationRow};

// ────────────────────────────────────────────────────────────────────────────
// Organization profile
// ────────────────────────────────────────────────────────────────────────────

pub async fn get_organization(pool: &PgPool, org_id: Uuid) -> Result<OrganizationRow, AppError> {
    sqlx::query_as::<_, OrganizationRow>("SELECT * FROM organizations WHERE id = $1")
        .bind(org_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organization {org_id} not found")))
}

pub async fn update_organization(
    pool: &PgPool,
    org_id: Uuid,
    name: Option<&str>,
    contact_email: Option<&str>,
) -> Result<OrganizationRow, AppError> {
    sqlx::query_as::<_, OrganizationRow>(
        r#"
        UPDATE organizations
        SET name = COALESCE($2, name),
            contact_email = COALESCE($3, contact_email),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(org_id)
    .bind(name)
    .bind(contact_email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Organization {org_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Departments
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_departments(pool: &PgPool, org_id: Uuid) -> Result<Vec<DepartmentRow>, AppError> {
    Ok(sqlx::query_as::<_, DepartmentRow>(
        "SELECT * FROM departments WHERE organization_id = $1 ORDER BY name",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await?)
}

pub async fn create_department(
    pool: &PgPool,
    org_id: Uuid,
    name: &str,
) -> Result<DepartmentRow, AppError> {
    sqlx::query_as::<_, DepartmentRow>(
        "INSERT INTO departments (organization_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(org_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, format!("Department '{name}' already exists")))
}

/// Deletes a department, rejecting the deletion while any employee still
/// references it. The employees FK backs this check against a concurrent
/// assignment.
pub async fn delete_department(
    pool: &PgPool,
    org_id: Uuid,
    department_id: Uuid,
) -> Result<(), AppError> {
    let in_use: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM employees WHERE organization_id = $1 AND department_id = $2",
    )
    .bind(org_id)
    .bind(department_id)
    .fetch_one(pool)
    .await?;

    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Department is still assigned to {in_use} employee(s)"
        )));
    }

    let deleted = sqlx::query("DELETE FROM departments WHERE id = $1 AND organization_id = $2")
        .bind(department_id)
        .bind(org_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Department {department_id} not found"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Employees
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_employees(pool: &PgPool, org_id: Uuid) -> Result<Vec<EmployeeRow>, AppError> {
    Ok(sqlx::query_as::<_, EmployeeRow>(
        "SELECT * FROM employees WHERE organization_id = $1 ORDER BY created_at",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_employee(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
) -> Result<EmployeeRow, AppError> {
    sqlx::query_as::<_, EmployeeRow>(
        "SELECT * FROM employees WHERE id = $1 AND organization_id = $2",
    )
    .bind(employee_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {employee_id} not found")))
}

pub async fn create_employee(
    pool: &PgPool,
    org_id: Uuid,
    department_id: Option<Uuid>,
    name: &str,
    role: &str,
    email: &str,
) -> Result<EmployeeRow, AppError> {
    if let Some(department_id) = department_id {
        ensure_department(pool, org_id, department_id).await?;
    }

    sqlx::query_as::<_, EmployeeRow>(
        r#"
        INSERT INTO employees (organization_id, department_id, name, role, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(org_id)
    .bind(department_id)
    .bind(name)
    .bind(role)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, format!("An employee with email '{email}' already exists"))
    })
}

pub async fn update_employee(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
    name: Option<&str>,
    role: Option<&str>,
    department_id: Option<Uuid>,
) -> Result<EmployeeRow, AppError> {
    if let Some(department_id) = department_id {
        ensure_department(pool, org_id, department_id).await?;
    }

    sqlx::query_as::<_, EmployeeRow>(
        r#"
        UPDATE employees
        SET name = COALESCE($3, name),
            role = COALESCE($4, role),
            department_id = COALESCE($5, department_id),
            updated_at = now()
        WHERE id = $1 AND organization_id = $2
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(org_id)
    .bind(name)
    .bind(role)
    .bind(department_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {employee_id} not found")))
}

/// Deletes an employee and cascades its assignment edges, in either
/// direction, in one transaction.
pub async fn delete_employee(
    pool: &PgPool,
    org_id: Uuid,
    employee_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM review_assignments
        WHERE organization_id = $1 AND (reviewer_id = $2 OR reviewee_id = $2)
        "#,
    )
    .bind(org_id)
    .bind(employee_id)
    .execute(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM employees WHERE id = $1 AND organization_id = $2")
        .bind(employee_id)
        .bind(org_id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Employee {employee_id} not found"
        )));
    }

    tx.commit().await?;
    info!("Deleted employee {employee_id} and its assignment edges");
    Ok(())
}

async fn ensure_department(
    pool: &PgPool,
    org_id: Uuid,
    department_id: Uuid,
) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1 AND organization_id = $2)",
    )
    .bind(department_id)
    .bind(org_id)
    .fetch_one(pool)
    .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unknown department {department_id}"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assignment edges
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_assignments(
    pool: &PgPool,
    org_id: Uuid,
    reviewer_id: Option<Uuid>,
) -> Result<Vec<ReviewAssignmentRow>, AppError> {
    Ok(sqlx::query_as::<_, ReviewAssignmentRow>(
        r#"
        SELECT * FROM review_assignments
        WHERE organization_id = $1 AND ($2::uuid IS NULL OR reviewer_id = $2)
        ORDER BY created_at
        "#,
    )
    .bind(org_id)
    .bind(reviewer_id)
    .fetch_all(pool)
    .await?)
}

pub async fn create_assignment(
    pool: &PgPool,
    org_id: Uuid,
    reviewer_id: Uuid,
    reviewee_id: Uuid,
) -> Result<ReviewAssignmentRow, AppError> {
    if reviewer_id == reviewee_id {
        return Err(AppError::Validation(
            "An employee cannot review themselves".to_string(),
        ));
    }

    // Both endpoints must be employees of this organization
    get_employee(pool, org_id, reviewer_id).await?;
    get_employee(pool, org_id, reviewee_id).await?;

    sqlx::query_as::<_, ReviewAssignmentRow>(
        r#"
        INSERT INTO review_assignments (organization_id, reviewer_id, reviewee_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(org_id)
    .bind(reviewer_id)
    .bind(reviewee_id)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Assignment already exists".to_string()))
}

pub async fn delete_assignment(
    pool: &PgPool,
    org_id: Uuid,
    assignment_id: Uuid,
) -> Result<(), AppError> {
    let deleted =
        sqlx::query("DELETE FROM review_assignments WHERE id = $1 AND organization_id = $2")
            .bind(assignment_id)
            .bind(org_id)
            .execute(pool)
            .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Assignment {assignment_id} not found"
        )));
    }
    Ok(())
}

/// Whether `reviewer_id` currently holds an assignment edge to
/// `reviewee_id`. Review authoring and editing both hinge on this.
pub async fn assignment_exists(
    pool: &PgPool,
    org_id: Uuid,
    reviewer_id: Uuid,
    reviewee_id: Uuid,
) -> Result<bool, AppError> {
    Ok(sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM review_assignments
            WHERE organization_id = $1 AND reviewer_id = $2 AND reviewee_id = $3
        )
        "#,
    )
    .bind(org_id)
    .bind(reviewer_id)
    .bind(reviewee_id)
    .fetch_one(pool)
    .await?)
}
