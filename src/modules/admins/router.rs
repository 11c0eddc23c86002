use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_admin, get_admin, get_admins, update_admin_password, update_admin_status,
};

pub fn init_admins_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_admin).get(get_admins))
        .route("/{id}", get(get_admin))
        .route("/{id}/password", put(update_admin_password))
        .route("/{id}/status", patch(update_admin_status))
}
