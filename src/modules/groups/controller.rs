use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use edugroup_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateGroupDto, GroupId, GroupWithMembers, ManageMembershipDto, UpdateGroupDto, UserSummary,
};
use super::service::GroupService;

#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups visible to the caller, with members", body = Vec<GroupWithMembers>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<GroupWithMembers>>, AppError> {
    let groups = GroupService::list_groups(&state.db, auth_user.actor()?).await?;
    Ok(Json(groups))
}

/// Create a group
///
/// A learner must be enrolled in the module and becomes the coordinator.
/// The module's teacher may also create groups; the first listed member
/// then coordinates.
#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = GroupWithMembers),
        (status = 400, description = "A member is not enrolled in the module", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not enrolled in the module", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<GroupWithMembers>), AppError> {
    let group = GroupService::create_group(&state.db, auth_user.actor()?, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group with members", body = GroupWithMembers),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_group_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GroupId>,
) -> Result<Json<GroupWithMembers>, AppError> {
    let group = GroupService::get_group(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = UpdateGroupDto,
    responses(
        (status = 200, description = "Group updated", body = GroupWithMembers),
        (status = 400, description = "New coordinator is not a member", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the teacher or coordinator may update", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GroupId>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<GroupWithMembers>, AppError> {
    let group = GroupService::update_group(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the module's teacher may delete", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GroupId>,
) -> Result<StatusCode, AppError> {
    GroupService::delete_group(&state.db, auth_user.actor()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/groups/{id}/members",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Members ordered by name", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_group_members(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GroupId>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let members = GroupService::list_members(&state.db, auth_user.actor()?, id).await?;
    Ok(Json(members))
}

/// Add or remove a member
#[utoipa::path(
    post,
    path = "/api/groups/{id}/membership",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = ManageMembershipDto,
    responses(
        (status = 200, description = "Membership updated", body = GroupWithMembers),
        (status = 400, description = "User not enrolled, or removing the coordinator", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only the teacher or coordinator may manage members", body = ErrorResponse),
        (status = 404, description = "Group not found or user not a member", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn manage_membership(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GroupId>,
    ValidatedJson(dto): ValidatedJson<ManageMembershipDto>,
) -> Result<Json<GroupWithMembers>, AppError> {
    let group = GroupService::manage_membership(&state.db, auth_user.actor()?, id, dto).await?;
    Ok(Json(group))
}
