use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_teacher, get_teacher_approval, get_teachers, update_teacher};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers))
        .route("/{id}", get(get_teacher).put(update_teacher))
        .route("/{id}/approval", get(get_teacher_approval))
}
