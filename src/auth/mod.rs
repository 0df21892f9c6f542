//! Caller identity capability.
//!
//! Authentication itself happens upstream (gateway or auth service); by the
//! time a request reaches this API the caller's user id, store id, and roles
//! arrive as trusted headers. They are modeled as an explicit context object
//! passed into every core operation so the business logic never reads
//! process-wide session state and stays testable without one.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::ServiceError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const STORE_ID_HEADER: &str = "x-store-id";
pub const ROLES_HEADER: &str = "x-roles";

/// Identity of the caller for the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub roles: Vec<String>,
}

impl RequestContext {
    pub fn new(user_id: Uuid, store_id: Uuid, roles: Vec<String>) -> Self {
        Self {
            user_id,
            store_id,
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Fails with Forbidden unless the caller holds `role`.
    pub fn require_role(&self, role: &str) -> Result<(), ServiceError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "caller lacks required role '{}'",
                role
            )))
        }
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ServiceError> {
    let raw = parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized(format!("missing {} header", name)))?;

    Uuid::parse_str(raw)
        .map_err(|_| ServiceError::Unauthorized(format!("malformed {} header", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_uuid(parts, USER_ID_HEADER)?;
        let store_id = header_uuid(parts, STORE_ID_HEADER)?;

        let roles = parts
            .headers
            .get(ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|raw| {
                raw.split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(RequestContext::new(user_id, store_id, roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_roles(roles: &[&str]) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            roles.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn role_check_is_case_insensitive() {
        let ctx = ctx_with_roles(&["Purchasing", "finance"]);
        assert!(ctx.has_role("purchasing"));
        assert!(ctx.has_role("FINANCE"));
        assert!(!ctx.has_role("sales"));
    }

    #[test]
    fn require_role_rejects_missing_role() {
        let ctx = ctx_with_roles(&["sales"]);
        assert!(ctx.require_role("sales").is_ok());
        assert!(matches!(
            ctx.require_role("finance"),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
