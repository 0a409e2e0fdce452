use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use edugroup_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireTeacher;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CreateTaskDto, TaskDetails, TaskId, UpdateTaskDto};
use super::service::TaskService;

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks visible to the caller, nearest due first", body = Vec<TaskDetails>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_tasks(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<TaskDetails>>, AppError> {
    let tasks = TaskService::list_tasks(&state.db, auth_user.actor()?).await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = TaskDetails),
        (status = 400, description = "Project belongs to another module", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teacher privileges required", body = ErrorResponse),
        (status = 404, description = "Module or project not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_task(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<TaskDetails>), AppError> {
    let task = TaskService::create_task(&state.db, auth_user.actor()?, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = TaskDetails),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_task_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<TaskId>,
) -> Result<Json<TaskDetails>, AppError> {
    let task = TaskService::get_task(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(task))
}

/// Update a task
///
/// Learners enrolled in the module may only change `status`.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = TaskDetails),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not allowed to change these fields", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<TaskId>,
    ValidatedJson(dto): ValidatedJson<UpdateTaskDto>,
) -> Result<Json<TaskDetails>, AppError> {
    let task = TaskService::update_task(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may delete", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    TaskService::delete_task(&state.db, auth_user.actor()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
