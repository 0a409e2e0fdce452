use axum::{Router, middleware, routing::get};

use crate::middleware::role::require_teacher;
use crate::state::AppState;

use super::controller::{get_students, get_user_by_id, get_users};

pub fn init_users_router(state: AppState) -> Router<AppState> {
    let teacher_only = Router::new()
        .route("/", get(get_users))
        .route_layer(middleware::from_fn_with_state(state, require_teacher));

    Router::new()
        .route("/students", get(get_students))
        .route("/{id}", get(get_user_by_id))
        .merge(teacher_only)
}
