use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::domain::User;
use crate::state::AppState;

use super::AppResult;

#[derive(Debug, Deserialize)]
pub(crate) struct AddUser {
    username: String,
}

pub(crate) async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddUser>,
) -> AppResult<Json<User>> {
    let client = state.db.get().await?;
    let row = client
        .query_one(
            "INSERT INTO users (username) VALUES ($1)
             RETURNING id, username, created_at",
            &[&req.username],
        )
        .await?;
    Ok(Json(User::from_row(&row)))
}
