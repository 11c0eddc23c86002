use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    approve_teacher, delete_approval, get_approval, get_approvals, verify_teacher,
};

pub fn init_approvals_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_approvals))
        .route("/{id}", get(get_approval).delete(delete_approval))
        .route("/{id}/approve", post(approve_teacher))
}

pub fn init_teacher_verification_router() -> Router<AppState> {
    Router::new().route("/{id}/verify", post(verify_teacher))
}
