//! Row types shared by the HTTP handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

#[derive(Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            created_at: row.get("created_at"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Chat {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
            last_message_at: row.get("last_message_at"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            chat_id: row.get("chat_id"),
            author_id: row.get("author_id"),
            text: row.get("body"),
            created_at: row.get("created_at"),
        }
    }
}
