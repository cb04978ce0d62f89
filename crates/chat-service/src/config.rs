//! Settings loaded from environment variables.
//!
//! Database knobs carry a `DB_` prefix, application knobs an `APP_` prefix.
//! Required variables abort startup with a named error when missing;
//! optional ones fall back to their defaults.

use std::path::PathBuf;
use std::str::FromStr;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

/// Database connection settings (`DB_*`).
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Upper bound on pooled connections.
    pub max_pool_size: usize,
    /// Root of the SQL migration tree applied at startup.
    pub migrations_dir: PathBuf,
}

impl DbSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: required("DB_HOST")?,
            port: parsed("DB_PORT")?,
            dbname: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASS")?,
            max_pool_size: parsed_or("DB_MAX_POOL_SIZE", 16)?,
            migrations_dir: PathBuf::from(
                std::env::var("DB_MIGRATIONS_DIR").unwrap_or_else(|_| "./migrations".to_string()),
            ),
        })
    }
}

/// HTTP server settings (`APP_*`).
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub server_port: u16,
    /// Largest page a `/chats/get` request may ask for.
    pub max_chats_count: i64,
    /// Largest page a `/messages/get` request may ask for.
    pub max_messages_count: i64,
}

impl AppSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_port: parsed("APP_SERVER_PORT")?,
            max_chats_count: parsed_or("APP_MAX_CHATS_COUNT", 20)?,
            max_messages_count: parsed_or("APP_MAX_MESSAGES_COUNT", 50)?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).wrap_err_with(|| format!("{name} must be set"))
}

fn parsed<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required(name)?
        .parse()
        .wrap_err_with(|| format!("{name} is not a valid value"))
}

fn parsed_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .wrap_err_with(|| format!("{name} is not a valid value")),
        Err(_) => Ok(default),
    }
}
