use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_task, delete_task, get_task_by_id, get_tasks, update_task};

pub fn init_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route(
            "/{id}",
            get(get_task_by_id).put(update_task).delete(delete_task),
        )
}
