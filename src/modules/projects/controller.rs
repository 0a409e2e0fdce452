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

use super::model::{CreateProjectDto, ProjectId, ProjectWithSteps, UpdateProjectDto};
use super::service::ProjectService;

#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Projects visible to the caller, with ordered steps", body = Vec<ProjectWithSteps>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_projects(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ProjectWithSteps>>, AppError> {
    let projects = ProjectService::list_projects(&state.db, auth_user.actor()?).await?;
    Ok(Json(projects))
}

/// Create a project with its steps
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "Project created", body = ProjectWithSteps),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teacher privileges required", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_project(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateProjectDto>,
) -> Result<(StatusCode, Json<ProjectWithSteps>), AppError> {
    let project = ProjectService::create_project(&state.db, auth_user.actor()?, dto).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with steps", body = ProjectWithSteps),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_project_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectWithSteps>, AppError> {
    let project = ProjectService::get_project(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(project))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = ProjectWithSteps),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may update", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ProjectId>,
    ValidatedJson(dto): ValidatedJson<UpdateProjectDto>,
) -> Result<Json<ProjectWithSteps>, AppError> {
    let project = ProjectService::update_project(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may delete", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "Projects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode, AppError> {
    ProjectService::delete_project(&state.db, auth_user.actor()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
