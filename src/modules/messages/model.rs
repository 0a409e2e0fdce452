pub use edugroup_models::messages::{
    ConversationSummary, MessageRow, MessageWithParties, SendMessageDto,
};
pub use edugroup_models::{MessageId, UserId};
