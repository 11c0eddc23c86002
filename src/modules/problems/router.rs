use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_problem, delete_problem, get_problem, get_problems, update_problem};

pub fn init_problems_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_problems).post(create_problem))
        .route(
            "/{id}",
            get(get_problem).put(update_problem).delete(delete_problem),
        )
}
