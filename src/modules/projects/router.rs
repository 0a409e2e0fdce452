use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_project, delete_project, get_project_by_id, get_projects, update_project,
};

pub fn init_projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project_by_id)
                .put(update_project)
                .delete(delete_project),
        )
}
