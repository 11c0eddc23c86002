//! Role checks layered on top of [`require_auth`](super::auth::require_auth).

use anyhow::anyhow;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use elysia_auth::Role;
use elysia_core::AppError;
use elysia_models::auth::RoleProfile;

use crate::middleware::auth::Identity;

/// Checks the identity left by `require_auth` for the admin route group.
pub fn check_admin(identity: Option<&Identity>) -> Result<(), AppError> {
    let identity = identity.ok_or_else(|| AppError::unauthorized(anyhow!("not authenticated")))?;

    if identity.role != Role::Admin {
        return Err(AppError::forbidden(anyhow!("admin access required")));
    }
    if identity.profile_id().is_empty() {
        return Err(AppError::unauthorized(anyhow!("admin profile missing")));
    }
    match &identity.profile {
        RoleProfile::Admin(admin) if admin.is_enabled() => Ok(()),
        _ => Err(AppError::forbidden(anyhow!("admin account disabled"))),
    }
}

/// Must run after `require_auth`; register it as the inner `route_layer`.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match check_admin(req.extensions().get::<Identity>()) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use elysia_models::admins::{AdminStatus, AdminUser};

    fn admin_identity(admin_id: &str) -> Identity {
        let now = Utc::now();
        Identity {
            subject_id: admin_id.to_string(),
            role: Role::Admin,
            profile: RoleProfile::Admin(AdminUser {
                admin_id: admin_id.to_string(),
                username: "root".into(),
                phone_number: None,
                password_hash: String::new(),
                real_name: None,
                email: "root@admin.local".into(),
                role: "admin".into(),
                status: AdminStatus::Enabled,
                last_login_time: None,
                login_fail_count: 0,
                password_update_time: None,
                remark: None,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    #[test]
    fn test_missing_identity_is_unauthorized() {
        let err = check_admin(None).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_admin_passes() {
        assert!(check_admin(Some(&admin_identity("adm_1"))).is_ok());
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let mut identity = admin_identity("stu_1");
        identity.role = Role::Student;
        let err = check_admin(Some(&identity)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_disabled_admin_is_forbidden() {
        let mut identity = admin_identity("adm_2");
        if let RoleProfile::Admin(admin) = &mut identity.profile {
            admin.status = AdminStatus::Disabled;
        }
        let err = check_admin(Some(&identity)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_empty_profile_id_is_unauthorized() {
        let err = check_admin(Some(&admin_identity(""))).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
