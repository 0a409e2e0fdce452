use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    add_comment, create_submission, delete_submission, get_comments, get_submission_by_id,
    get_submissions, grade_submission,
};

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_submissions).post(create_submission))
        .route(
            "/{id}",
            get(get_submission_by_id).delete(delete_submission),
        )
        .route("/{id}/grade", patch(grade_submission))
        .route("/{id}/comments", get(get_comments).post(add_comment))
}
