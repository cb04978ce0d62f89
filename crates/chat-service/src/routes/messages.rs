use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::Message;
use crate::state::AppState;

use super::AppResult;

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessage {
    chat: i64,
    author: i64,
    text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageId {
    id: i64,
}

/// Store a message and bump the chat's recency in one transaction, keeping
/// `/chats/get` ordering consistent with the messages actually stored.
pub(crate) async fn add(
    State(state): State<AppState>,
    Json(req): Json<SendMessage>,
) -> AppResult<Json<MessageId>> {
    let mut client = state.db.get().await?;
    let tx = client.transaction().await?;

    let row = tx
        .query_one(
            "INSERT INTO messages (chat_id, author_id, body)
             VALUES ($1, $2, $3)
             RETURNING id",
            &[&req.chat, &req.author, &req.text],
        )
        .await?;
    tx.execute(
        "UPDATE chats SET last_message_at = now() WHERE id = $1",
        &[&req.chat],
    )
    .await?;

    tx.commit().await?;
    Ok(Json(MessageId { id: row.get(0) }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetMessages {
    chat: i64,
    count: Option<i64>,
    offset: Option<i64>,
}

/// Messages in a chat, oldest first.
pub(crate) async fn list(
    State(state): State<AppState>,
    Json(req): Json<GetMessages>,
) -> AppResult<Json<Vec<Message>>> {
    let (limit, offset) = super::page(req.count, req.offset, state.limits.max_messages);

    let client = state.db.get().await?;
    let rows = client
        .query(
            "SELECT id, chat_id, author_id, body, created_at
               FROM messages
              WHERE chat_id = $1
              ORDER BY created_at ASC, id ASC
              LIMIT $2 OFFSET $3",
            &[&req.chat, &limit, &offset],
        )
        .await?;

    Ok(Json(rows.iter().map(Message::from_row).collect()))
}
