use deadpool_postgres::Pool;

/// Shared handler state. Cloned per request; the pool is internally
/// reference-counted so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Pool,
    pub limits: PageLimits,
}

/// Upper bounds for list endpoints, from `AppSettings`.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub max_chats: i64,
    pub max_messages: i64,
}
