use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    get_conversation, get_conversations, get_received, get_sent, mark_as_read, send_message,
};

pub fn init_messages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/received", get(get_received))
        .route("/sent", get(get_sent))
        .route("/conversations", get(get_conversations))
        .route("/conversation/{user_id}", get(get_conversation))
        .route("/{id}/read", put(mark_as_read))
}
