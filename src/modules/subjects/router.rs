use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_subject, delete_subject, disable_subject, enable_subject, get_subject,
    get_subject_by_code, get_subjects, update_subject,
};

/// Read-only catalogue for any signed-in user.
pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_subjects))
        .route("/code/{code}", get(get_subject_by_code))
        .route("/{id}", get(get_subject))
}

/// Catalogue management; mounted in the admin group.
pub fn init_subject_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject))
        .route("/{id}", put(update_subject).delete(delete_subject))
        .route("/{id}/enable", post(enable_subject))
        .route("/{id}/disable", post(disable_subject))
}
