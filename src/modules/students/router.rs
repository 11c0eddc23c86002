use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

use super::controller::{
    get_student, get_students, update_learning_progress, update_student, update_student_status,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students))
        .route("/{id}", get(get_student).put(update_student))
        .route("/{id}/progress", put(update_learning_progress))
        .route("/{id}/status", patch(update_student_status))
}
