use sqlx::PgPool;
use tracing::instrument;

use edugroup_core::AppError;

use crate::metrics::track_message_sent;

use super::conversations::build_conversations;
use super::model::{
    ConversationSummary, MessageId, MessageRow, MessageWithParties, SendMessageDto, UserId,
};

const MESSAGE_ROW: &str = r#"SELECT
        m.id,
        m.sender_id,
        m.recipient_id,
        m.content,
        m.is_read,
        m.created_at,
        s.first_name AS sender_first_name,
        s.last_name AS sender_last_name,
        s.email AS sender_email,
        s.role AS sender_role,
        r.first_name AS recipient_first_name,
        r.last_name AS recipient_last_name,
        r.email AS recipient_email,
        r.role AS recipient_role
       FROM messages m
       LEFT JOIN users s ON s.id = m.sender_id
       LEFT JOIN users r ON r.id = m.recipient_id"#;

pub struct MessageService;

impl MessageService {
    #[instrument(skip(db, dto), fields(recipient_id = %dto.recipient_id))]
    pub async fn send_message(
        db: &PgPool,
        sender_id: UserId,
        dto: SendMessageDto,
    ) -> Result<MessageWithParties, AppError> {
        if dto.recipient_id == sender_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "You cannot send a message to yourself"
            )));
        }

        let recipient_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(dto.recipient_id)
                .fetch_one(db)
                .await?;
        if !recipient_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Recipient not found")));
        }

        let message_id = sqlx::query_scalar::<_, MessageId>(
            r#"INSERT INTO messages (sender_id, recipient_id, content)
               VALUES ($1, $2, $3)
               RETURNING id"#,
        )
        .bind(sender_id)
        .bind(dto.recipient_id)
        .bind(dto.content.trim())
        .fetch_one(db)
        .await?;

        track_message_sent();

        let row = sqlx::query_as::<_, MessageRow>(&format!("{MESSAGE_ROW} WHERE m.id = $1"))
            .bind(message_id)
            .fetch_one(db)
            .await?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn received(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<MessageWithParties>, AppError> {
        Self::fetch(db, "m.recipient_id = $1 ORDER BY m.created_at DESC", user_id).await
    }

    #[instrument(skip(db))]
    pub async fn sent(db: &PgPool, user_id: UserId) -> Result<Vec<MessageWithParties>, AppError> {
        Self::fetch(db, "m.sender_id = $1 ORDER BY m.created_at DESC", user_id).await
    }

    /// Full thread with `peer_id`, oldest first. Messages from the peer are
    /// marked read after the thread has been loaded, so the response still
    /// shows which ones were new.
    #[instrument(skip(db))]
    pub async fn conversation(
        db: &PgPool,
        user_id: UserId,
        peer_id: UserId,
    ) -> Result<Vec<MessageWithParties>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r#"{MESSAGE_ROW}
               WHERE (m.sender_id = $1 AND m.recipient_id = $2)
                  OR (m.sender_id = $2 AND m.recipient_id = $1)
               ORDER BY m.created_at ASC"#
        ))
        .bind(user_id)
        .bind(peer_id)
        .fetch_all(db)
        .await?;

        let marked = sqlx::query(
            r#"UPDATE messages SET is_read = TRUE
               WHERE sender_id = $1 AND recipient_id = $2 AND is_read = FALSE"#,
        )
        .bind(peer_id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

        tracing::debug!(marked, "Conversation messages marked as read");

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Only the recipient may mark a message read; anyone else gets 404.
    #[instrument(skip(db))]
    pub async fn mark_as_read(
        db: &PgPool,
        user_id: UserId,
        message_id: MessageId,
    ) -> Result<MessageWithParties, AppError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(message_id)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Message not found")));
        }

        let row = sqlx::query_as::<_, MessageRow>(&format!("{MESSAGE_ROW} WHERE m.id = $1"))
            .bind(message_id)
            .fetch_one(db)
            .await?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn conversations(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let received = Self::received(db, user_id).await?;
        let sent = Self::sent(db, user_id).await?;

        Ok(build_conversations(user_id, &received, &sent))
    }

    async fn fetch(
        db: &PgPool,
        condition: &str,
        user_id: UserId,
    ) -> Result<Vec<MessageWithParties>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!("{MESSAGE_ROW} WHERE {condition}"))
            .bind(user_id)
            .fetch_all(db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
