pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::directory::handlers as directory;
use crate::reports::handlers as reports;
use crate::reviews::handlers as reviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Directory API
        .route(
            "/api/v1/organization",
            get(directory::handle_get_organization).patch(directory::handle_update_organization),
        )
        .route(
            "/api/v1/departments",
            get(directory::handle_list_departments).post(directory::handle_create_department),
        )
        .route(
            "/api/v1/departments/:id",
            delete(directory::handle_delete_department),
        )
        .route(
            "/api/v1/employees",
            get(directory::handle_list_employees).post(directory::handle_create_employee),
        )
        .route(
            "/api/v1/employees/:id",
            get(directory::handle_get_employee)
                .patch(directory::handle_update_employee)
                .delete(directory::handle_delete_employee),
        )
        .route(
            "/api/v1/assignments",
            get(directory::handle_list_assignments).post(directory::handle_create_assignment),
        )
        .route(
            "/api/v1/assignments/:id",
            delete(directory::handle_delete_assignment),
        )
        // Reviews API
        .route(
            "/api/v1/reviews",
            get(reviews::handle_list_reviews).post(reviews::handle_create_review),
        )
        .route("/api/v1/reviews/:id", patch(reviews::handle_update_review))
        // Reports API
        .route("/api/v1/reports/generate", post(reports::handle_generate))
        .route("/api/v1/reports/backfill", post(reports::handle_backfill))
        .route(
            "/api/v1/reports/employee/:id",
            get(reports::handle_list_reports),
        )
        .route(
            "/api/v1/reports/employee/:id/:month",
            get(reports::handle_get_report),
        )
        .route("/api/v1/reports/rankings", get(reports::handle_rankings))
        .with_state(state)
}
