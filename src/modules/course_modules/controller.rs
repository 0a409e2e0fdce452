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

use super::model::{
    CourseModule, CreateModuleDto, EnrollStudentDto, ModuleDetail, ModuleId, ModuleWithStats,
    UpdateModuleDto, UserId,
};
use super::service::CourseModuleService;

/// Modules visible to the caller
///
/// Teachers see the modules they own; learners see the modules they are
/// enrolled in.
#[utoipa::path(
    get,
    path = "/api/modules",
    responses(
        (status = 200, description = "Modules with counts, newest first", body = Vec<ModuleWithStats>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_modules(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ModuleWithStats>>, AppError> {
    let modules = CourseModuleService::list_modules(&state.db, auth_user.actor()?).await?;
    Ok(Json(modules))
}

#[utoipa::path(
    post,
    path = "/api/modules",
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = CourseModule),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teacher privileges required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_module(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<CourseModule>), AppError> {
    let module = CourseModuleService::create_module(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/modules/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module with enrolled students", body = ModuleDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_module_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ModuleId>,
) -> Result<Json<ModuleDetail>, AppError> {
    let module = CourseModuleService::get_module(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(module))
}

#[utoipa::path(
    put,
    path = "/api/modules/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = CourseModule),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may update", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_module(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<UpdateModuleDto>,
) -> Result<Json<CourseModule>, AppError> {
    let module = CourseModuleService::update_module(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}",
    params(("id" = Uuid, Path, description = "Module ID")),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may delete", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ModuleId>,
) -> Result<StatusCode, AppError> {
    CourseModuleService::delete_module(&state.db, auth_user.actor()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enrol a student or coordinator
#[utoipa::path(
    post,
    path = "/api/modules/{id}/students",
    params(("id" = Uuid, Path, description = "Module ID")),
    request_body = EnrollStudentDto,
    responses(
        (status = 200, description = "Student enrolled (idempotent)", body = ModuleDetail),
        (status = 400, description = "Target is not a learner", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may enrol", body = ErrorResponse),
        (status = 404, description = "Module or student not found", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn enroll_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<EnrollStudentDto>,
) -> Result<Json<ModuleDetail>, AppError> {
    let module =
        CourseModuleService::enroll_student(&state.db, auth_user.actor()?, id, dto.student_id)
            .await?;
    Ok(Json(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}/students/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Module ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student removed from the module"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the owning teacher may remove students", body = ErrorResponse),
        (status = 404, description = "Module not found or student not enrolled", body = ErrorResponse)
    ),
    tag = "Modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn unenroll_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((id, student_id)): Path<(ModuleId, UserId)>,
) -> Result<StatusCode, AppError> {
    CourseModuleService::unenroll_student(&state.db, auth_user.actor()?, id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
