use thiserror::Error;

/// Error type for migration operations.
///
/// Every variant is terminal for the whole run; the runner never retries.
/// A failure means a human has to fix something (the SQL, connectivity,
/// permissions) before running again.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Walking the migration tree or reading a migration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Checking a connection out of the pool failed.
    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A ledger query, the ledger bootstrap DDL, or a commit failed.
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A migration file's own SQL failed. The transaction was rolled back,
    /// so neither the schema change nor the ledger row survives.
    #[error("migration {name} failed: {message}")]
    MigrationFailed { name: String, message: String },
}
