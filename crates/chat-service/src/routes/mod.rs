//! HTTP surface: JSON over POST, matching the original wire contract.
//! Non-POST methods get axum's 405.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::state::AppState;

mod chats;
mod messages;
mod users;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/add", post(users::add))
        .route("/chats/add", post(chats::add))
        .route("/chats/get", post(chats::list))
        .route("/messages/add", post(messages::add))
        .route("/messages/get", post(messages::list))
        .with_state(state)
}

/// Handler failure: logged in full, reported to the client as a bare 500.
pub(crate) struct AppError(color_eyre::Report);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub(crate) type AppResult<T> = Result<T, AppError>;

/// Normalized LIMIT/OFFSET for a list request: missing or non-positive
/// counts mean a full page, counts above `max` clamp to `max`, negative
/// offsets clamp to zero.
pub(crate) fn page(count: Option<i64>, offset: Option<i64>, max: i64) -> (i64, i64) {
    let limit = match count {
        Some(c) if c > 0 => c.min(max),
        _ => max,
    };
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::page;

    #[test]
    fn counts_clamp_to_the_configured_maximum() {
        assert_eq!(page(Some(500), None, 20), (20, 0));
        assert_eq!(page(Some(5), None, 20), (5, 0));
    }

    #[test]
    fn missing_or_nonpositive_counts_get_a_full_page() {
        assert_eq!(page(None, None, 20), (20, 0));
        assert_eq!(page(Some(0), None, 20), (20, 0));
        assert_eq!(page(Some(-3), None, 20), (20, 0));
    }

    #[test]
    fn negative_offsets_clamp_to_zero() {
        assert_eq!(page(Some(5), Some(-10), 20), (5, 0));
        assert_eq!(page(Some(5), Some(10), 20), (5, 10));
    }
}
