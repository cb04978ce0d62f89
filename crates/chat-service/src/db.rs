use chat_migrate::Migrator;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

use crate::config::DbSettings;

/// Ledger table tracking this service's applied migrations.
const MIGRATION_TABLE: &str = "migrations_chat_service";

pub fn create_pool(settings: &DbSettings) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(settings.host.clone());
    cfg.port = Some(settings.port);
    cfg.dbname = Some(settings.dbname.clone());
    cfg.user = Some(settings.user.clone());
    cfg.password = Some(settings.password.clone());
    cfg.pool = Some(PoolConfig::new(settings.max_pool_size));

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .wrap_err("failed to create database pool")
}

/// Connect and bring the schema up to date.
///
/// Startup must not proceed past a failure here: serving traffic against a
/// partially migrated schema is worse than not starting at all.
pub async fn setup(settings: &DbSettings) -> Result<Pool> {
    let pool = create_pool(settings)?;

    let summary = Migrator::new(MIGRATION_TABLE)
        .run(&pool, &settings.migrations_dir)
        .await
        .wrap_err("database migration failed")?;
    tracing::info!(
        applied = summary.applied,
        already_applied = summary.already_applied,
        "database schema is up to date"
    );

    Ok(pool)
}
