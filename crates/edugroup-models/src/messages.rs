//! Direct message models and conversation summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{MessageId, UserId};
use crate::users::{UserRole, UserSummary};

/// Flat row produced by joining `messages` with both parties.
///
/// Either party may be missing once the user row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: MessageId,
    pub sender_id: Option<UserId>,
    pub recipient_id: Option<UserId>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_first_name: Option<String>,
    pub sender_last_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_role: Option<UserRole>,
    pub recipient_first_name: Option<String>,
    pub recipient_last_name: Option<String>,
    pub recipient_email: Option<String>,
    pub recipient_role: Option<UserRole>,
}

/// A message with the embedded sender and recipient summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageWithParties {
    pub id: MessageId,
    pub sender_id: Option<UserId>,
    pub recipient_id: Option<UserId>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: Option<UserSummary>,
    pub recipient: Option<UserSummary>,
}

fn party(
    id: Option<UserId>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    role: Option<UserRole>,
) -> Option<UserSummary> {
    Some(UserSummary {
        id: id?,
        first_name: first_name?,
        last_name: last_name?,
        email: email?,
        role: role?,
    })
}

impl From<MessageRow> for MessageWithParties {
    fn from(row: MessageRow) -> Self {
        let sender = party(
            row.sender_id,
            row.sender_first_name,
            row.sender_last_name,
            row.sender_email,
            row.sender_role,
        );
        let recipient = party(
            row.recipient_id,
            row.recipient_first_name,
            row.recipient_last_name,
            row.recipient_email,
            row.recipient_role,
        );

        Self {
            id: row.id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            content: row.content,
            is_read: row.is_read,
            created_at: row.created_at,
            sender,
            recipient,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageDto {
    pub recipient_id: UserId,
    #[validate(
        length(min = 1, max = 5000, message = "Message content is required"),
        custom(function = "crate::validation::non_blank")
    )]
    #[schema(example = "Are we meeting tomorrow?")]
    pub content: String,
}

/// One entry of the conversation list: the latest exchange with a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummary {
    pub peer_id: UserId,
    pub name: String,
    pub peer_role: UserRole,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sender: Option<UserId>, with_sender_details: bool) -> MessageRow {
        MessageRow {
            id: MessageId::new(),
            sender_id: sender,
            recipient_id: Some(UserId::new()),
            content: "hi".to_string(),
            is_read: false,
            created_at: Utc::now(),
            sender_first_name: with_sender_details.then(|| "Ada".to_string()),
            sender_last_name: with_sender_details.then(|| "Lovelace".to_string()),
            sender_email: with_sender_details.then(|| "ada@example.com".to_string()),
            sender_role: with_sender_details.then_some(UserRole::Student),
            recipient_first_name: Some("Alan".to_string()),
            recipient_last_name: Some("Turing".to_string()),
            recipient_email: Some("alan@example.com".to_string()),
            recipient_role: Some(UserRole::Teacher),
        }
    }

    #[test]
    fn test_row_embeds_both_parties() {
        let sender = UserId::new();
        let message = MessageWithParties::from(row(Some(sender), true));
        assert_eq!(message.sender.as_ref().map(|s| s.id), Some(sender));
        assert_eq!(
            message.recipient.as_ref().map(|r| r.display_name()),
            Some("Alan Turing".to_string())
        );
    }

    #[test]
    fn test_missing_sender_is_none() {
        let message = MessageWithParties::from(row(None, false));
        assert!(message.sender.is_none());
        assert!(message.recipient.is_some());
    }

    #[test]
    fn test_send_message_rejects_blank_content() {
        let dto = SendMessageDto {
            recipient_id: UserId::new(),
            content: " \n ".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
