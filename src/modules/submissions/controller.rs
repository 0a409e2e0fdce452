use axum::{
    Json,
    extract::{Path, Query, State},
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
    CreateCommentDto, CreateSubmissionDto, GradeSubmissionDto, SubmissionComment,
    SubmissionDetails, SubmissionFilterParams, SubmissionId,
};
use super::service::SubmissionService;

#[utoipa::path(
    get,
    path = "/api/submissions",
    params(SubmissionFilterParams),
    responses(
        (status = 200, description = "Submissions visible to the caller, newest first", body = Vec<SubmissionDetails>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<SubmissionFilterParams>,
) -> Result<Json<Vec<SubmissionDetails>>, AppError> {
    let submissions =
        SubmissionService::list_submissions(&state.db, auth_user.actor()?, filters).await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission created", body = SubmissionDetails),
        (status = 400, description = "Group belongs to another module", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a learner, or not a member of the group", body = ErrorResponse),
        (status = 404, description = "Task or group not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<SubmissionDetails>), AppError> {
    let submission =
        SubmissionService::create_submission(&state.db, auth_user.actor()?, dto).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission details", body = SubmissionDetails),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_submission_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<SubmissionId>,
) -> Result<Json<SubmissionDetails>, AppError> {
    let submission = SubmissionService::get_submission(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(submission))
}

/// Grade a submission
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}/grade",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded", body = SubmissionDetails),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teacher privileges required", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 422, description = "Grade out of range", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<SubmissionId>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<SubmissionDetails>, AppError> {
    let submission =
        SubmissionService::grade_submission(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(submission))
}

#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission withdrawn"),
        (status = 400, description = "Already graded", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the author may delete", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<SubmissionId>,
) -> Result<StatusCode, AppError> {
    SubmissionService::delete_submission(&state.db, auth_user.actor()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}/comments",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<SubmissionComment>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_comments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<SubmissionId>,
) -> Result<Json<Vec<SubmissionComment>>, AppError> {
    let comments = SubmissionService::list_comments(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    post,
    path = "/api/submissions/{id}/comments",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = SubmissionComment),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<SubmissionId>,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<SubmissionComment>), AppError> {
    let comment = SubmissionService::add_comment(&state.db, auth_user.actor()?, id, dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
