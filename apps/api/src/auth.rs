//! Request principal extraction.
//!
//! Authentication is delegated to the external identity provider: the
//! gateway validates the session and forwards the resolved principal in
//! trusted headers. The API never sees credentials.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

pub const ORG_ID_HEADER: &str = "x-org-id";
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";
pub const ROLE_HEADER: &str = "x-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

/// The authenticated principal for one request. Every query is scoped by
/// `organization_id`; admin-only routes call `require_admin` first.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Member => Err(AppError::Forbidden),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let organization_id = header_uuid(parts, ORG_ID_HEADER)?;
        let employee_id = header_uuid(parts, EMPLOYEE_ID_HEADER)?;
        let role = match parts.headers.get(ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            Some("admin") => Role::Admin,
            Some("member") => Role::Member,
            _ => return Err(AppError::Unauthorized),
        };

        Ok(AuthContext {
            organization_id,
            employee_id,
            role,
        })
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_admin_principal() {
        let org = Uuid::new_v4();
        let employee = Uuid::new_v4();
        let mut parts = parts_with(&[
            (ORG_ID_HEADER, &org.to_string()),
            (EMPLOYEE_ID_HEADER, &employee.to_string()),
            (ROLE_HEADER, "admin"),
        ]);

        let ctx = AuthContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ctx.organization_id, org);
        assert_eq!(ctx.employee_id, employee);
        assert_eq!(ctx.role, Role::Admin);
        assert!(ctx.require_admin().is_ok());
    }

    #[tokio::test]
    async fn member_cannot_pass_admin_check() {
        let mut parts = parts_with(&[
            (ORG_ID_HEADER, &Uuid::new_v4().to_string()),
            (EMPLOYEE_ID_HEADER, &Uuid::new_v4().to_string()),
            (ROLE_HEADER, "member"),
        ]);

        let ctx = AuthContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(matches!(ctx.require_admin(), Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn missing_org_header_is_unauthorized() {
        let mut parts = parts_with(&[
            (EMPLOYEE_ID_HEADER, &Uuid::new_v4().to_string()),
            (ROLE_HEADER, "member"),
        ]);

        let result = AuthContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn unknown_role_is_unauthorized() {
        let mut parts = parts_with(&[
            (ORG_ID_HEADER, &Uuid::new_v4().to_string()),
            (EMPLOYEE_ID_HEADER, &Uuid::new_v4().to_string()),
            (ROLE_HEADER, "superuser"),
        ]);

        let result = AuthContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
