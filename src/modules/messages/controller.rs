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

use super::model::{ConversationSummary, MessageId, MessageWithParties, SendMessageDto, UserId};
use super::service::MessageService;

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = MessageWithParties),
        (status = 400, description = "Messaging yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipient not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SendMessageDto>,
) -> Result<(StatusCode, Json<MessageWithParties>), AppError> {
    let message = MessageService::send_message(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages/received",
    responses(
        (status = 200, description = "Messages received, newest first", body = Vec<MessageWithParties>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_received(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<MessageWithParties>>, AppError> {
    let messages = MessageService::received(&state.db, auth_user.user_id()?).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    get,
    path = "/api/messages/sent",
    responses(
        (status = 200, description = "Messages sent, newest first", body = Vec<MessageWithParties>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_sent(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<MessageWithParties>>, AppError> {
    let messages = MessageService::sent(&state.db, auth_user.user_id()?).await?;
    Ok(Json(messages))
}

/// Thread with one user
///
/// Marks the other user's messages to the caller as read.
#[utoipa::path(
    get,
    path = "/api/messages/conversation/{user_id}",
    params(("user_id" = Uuid, Path, description = "The other participant")),
    responses(
        (status = 200, description = "Messages in the thread, oldest first", body = Vec<MessageWithParties>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<MessageWithParties>>, AppError> {
    let messages = MessageService::conversation(&state.db, auth_user.user_id()?, user_id).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    put,
    path = "/api/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = MessageWithParties),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Message not found or caller is not the recipient", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_as_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<MessageId>,
) -> Result<Json<MessageWithParties>, AppError> {
    let message = MessageService::mark_as_read(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(message))
}

/// Conversation list
///
/// One entry per peer with the latest message and the unread count.
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    responses(
        (status = 200, description = "Conversations, most recent first", body = Vec<ConversationSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_conversations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let conversations = MessageService::conversations(&state.db, auth_user.user_id()?).await?;
    Ok(Json(conversations))
}
