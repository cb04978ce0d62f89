use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::Chat;
use crate::state::AppState;

use super::AppResult;

#[derive(Debug, Deserialize)]
pub(crate) struct AddChat {
    name: String,
    users: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatId {
    id: i64,
}

/// Create a chat and enroll its members in one transaction; a bad member id
/// leaves no half-created chat behind.
pub(crate) async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddChat>,
) -> AppResult<Json<ChatId>> {
    let mut client = state.db.get().await?;
    let tx = client.transaction().await?;

    let row = tx
        .query_one(
            "INSERT INTO chats (name) VALUES ($1) RETURNING id",
            &[&req.name],
        )
        .await?;
    let id: i64 = row.get(0);

    for user_id in &req.users {
        tx.execute(
            "INSERT INTO chat_members (chat_id, user_id) VALUES ($1, $2)",
            &[&id, user_id],
        )
        .await?;
    }

    tx.commit().await?;
    Ok(Json(ChatId { id }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetChats {
    user: i64,
    count: Option<i64>,
    offset: Option<i64>,
}

/// Chats the user participates in, most recent message first.
pub(crate) async fn list(
    State(state): State<AppState>,
    Json(req): Json<GetChats>,
) -> AppResult<Json<Vec<Chat>>> {
    let (limit, offset) = super::page(req.count, req.offset, state.limits.max_chats);

    let client = state.db.get().await?;
    let rows = client
        .query(
            "SELECT c.id, c.name, c.created_at, c.last_message_at
               FROM chats c
               JOIN chat_members m ON m.chat_id = c.id
              WHERE m.user_id = $1
              ORDER BY c.last_message_at DESC
              LIMIT $2 OFFSET $3",
            &[&req.user, &limit, &offset],
        )
        .await?;

    Ok(Json(rows.iter().map(Chat::from_row).collect()))
}
