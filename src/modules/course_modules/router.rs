use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_module, delete_module, enroll_student, get_module_by_id, get_modules, unenroll_student,
    update_module,
};

pub fn init_course_modules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_modules).post(create_module))
        .route(
            "/{id}",
            get(get_module_by_id)
                .put(update_module)
                .delete(delete_module),
        )
        .route("/{id}/students", post(enroll_student))
        .route("/{id}/students/{student_id}", delete(unenroll_student))
}
