use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_admin;
use crate::modules::admins::init_admins_router;
use crate::modules::approvals::{init_approvals_router, init_teacher_verification_router};
use crate::modules::auth::{
    init_admin_auth_router, init_session_router, init_student_auth_router,
    init_teacher_auth_router,
};
use crate::modules::auth::controller::verify_code;
use crate::modules::classes::init_classes_router;
use crate::modules::problems::init_problems_router;
use crate::modules::students::init_students_router;
use crate::modules::subjects::{init_subject_admin_router, init_subjects_router};
use crate::modules::teachers::init_teachers_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::post;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/student/auth", init_student_auth_router())
        .nest("/teacher/auth", init_teacher_auth_router())
        .nest("/admin/auth", init_admin_auth_router())
        .route("/auth/verify-code", post(verify_code))
}

/// Everything behind `require_auth`; the admin group adds `require_admin`.
fn protected_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .nest("/admin/users", init_admins_router())
        .nest("/admin/approvals", init_approvals_router())
        .nest("/admin/teachers", init_teacher_verification_router())
        .nest("/admin/subjects", init_subject_admin_router())
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .nest("/auth", init_session_router())
        .nest("/students", init_students_router())
        .nest("/teachers", init_teachers_router())
        .nest("/classes", init_classes_router())
        .nest("/subjects", init_subjects_router())
        .nest("/problems", init_problems_router())
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            public_routes().merge(protected_routes(&state)),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    REQUEST_ID_HEADER,
                ])
                .expose_headers([REQUEST_ID_HEADER])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
