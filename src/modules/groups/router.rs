use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_group, delete_group, get_group_by_id, get_group_members, get_groups, manage_membership,
    update_group,
};

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_groups).post(create_group))
        .route(
            "/{id}",
            get(get_group_by_id).put(update_group).delete(delete_group),
        )
        .route("/{id}/members", get(get_group_members))
        .route("/{id}/membership", post(manage_membership))
}
