use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_class, get_class, get_class_by_code, get_class_members, get_my_classes, join_class,
    leave_class, remove_class_member, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class))
        .route("/mine", get(get_my_classes))
        .route("/join", post(join_class))
        .route("/code/{code}", get(get_class_by_code))
        .route("/{id}", get(get_class).put(update_class))
        .route("/{id}/leave", post(leave_class))
        .route("/{id}/members", get(get_class_members))
        .route("/{id}/members/{student_id}", delete(remove_class_member))
}
