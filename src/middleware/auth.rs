use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use elysia_auth::{Role, TokenError, resolve_role};
use elysia_core::AppError;
use elysia_models::auth::RoleProfile;

use crate::state::AppState;
use crate::stores::store_error;

/// The authenticated subject, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject_id: String,
    pub role: Role,
    pub profile: RoleProfile,
}

impl Identity {
    pub fn profile_id(&self) -> &str {
        self.profile.id()
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_self(&self, id: &str) -> bool {
        self.subject_id == id
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        Err(AppError::forbidden(anyhow!("access denied for role {}", self.role)))
    }

    /// Allows the subject itself or an admin.
    pub fn require_self_or_admin(&self, id: &str) -> Result<(), AppError> {
        if self.is_self(id) || self.is(Role::Admin) {
            return Ok(());
        }
        Err(AppError::forbidden(anyhow!("access denied")))
    }
}

/// The raw bearer token of the current request, used by logout.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("not authenticated")))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("not authenticated")))
    }
}

/// API clients get a JSON 401; browsers are redirected to the login page.
fn is_api_request(headers: &HeaderMap, path: &str) -> bool {
    let json_like = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.contains("application/json") || ct.contains("application/x-www-form-urlencoded")
        });
    json_like || path.starts_with("/api/")
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject(api: bool, message: &'static str) -> Response {
    if api {
        AppError::unauthorized(anyhow!(message)).into_response()
    } else {
        Redirect::temporary("/login").into_response()
    }
}

/// Loads the profile row for an already-resolved role.
pub async fn resolve_profile(
    state: &AppState,
    subject_id: &str,
    role: Role,
) -> Result<Option<RoleProfile>, AppError> {
    let profile = match role {
        Role::Student => state
            .students
            .find_student(subject_id)
            .await
            .map_err(store_error)?
            .map(RoleProfile::Student),
        Role::Teacher => state
            .teachers
            .find_teacher(subject_id)
            .await
            .map_err(store_error)?
            .map(RoleProfile::Teacher),
        Role::Admin => state
            .admins
            .find_admin(subject_id)
            .await
            .map_err(store_error)?
            .map(RoleProfile::Admin),
    };
    Ok(profile)
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let api = is_api_request(req.headers(), &path);

    let Some(token) = bearer_token(req.headers()).map(str::to_string) else {
        debug!(path = %path, "Missing or malformed authorization header");
        return reject(api, "missing or malformed authorization header");
    };

    let claims = match state.tokens.validate(&token).await {
        Ok(claims) => claims,
        Err(TokenError::Expired) => return reject(api, "token expired"),
        Err(TokenError::Revoked) => return reject(api, "token revoked"),
        Err(TokenError::Denylist(err)) => {
            return AppError::internal(anyhow!("denylist lookup failed: {err}")).into_response();
        }
        Err(_) => return reject(api, "invalid token"),
    };

    let role = match resolve_role(&claims.sub) {
        Ok(role) => role,
        Err(err) => {
            warn!(subject = %claims.sub, error = %err, "Token subject has no known role");
            return AppError::unauthorized(anyhow!("unrecognized identity")).into_response();
        }
    };

    let profile = match resolve_profile(&state, &claims.sub, role).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return AppError::unauthorized(anyhow!("account not found")).into_response();
        }
        Err(err) => return err.into_response(),
    };

    req.extensions_mut().insert(Identity {
        subject_id: claims.sub,
        role,
        profile,
    });
    req.extensions_mut().insert(BearerToken(token));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_api_detection_by_path() {
        assert!(is_api_request(&HeaderMap::new(), "/api/students"));
        assert!(!is_api_request(&HeaderMap::new(), "/dashboard"));
    }

    #[test]
    fn test_api_detection_by_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_api_request(&headers, "/dashboard"));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(is_api_request(&headers, "/dashboard"));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_browser_rejection_redirects() {
        let response = reject(false, "missing");
        assert_eq!(response.status(), axum::http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let response = reject(true, "missing");
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
