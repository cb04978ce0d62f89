use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Transaction};

use crate::error::MigrationError;

/// Outcome of recording a migration name in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The row was inserted; it becomes durable when the transaction commits.
    Recorded,
    /// The primary key already holds this name: a concurrent runner recorded
    /// it first. The surrounding transaction is aborted and must be rolled
    /// back by the caller.
    Duplicate,
}

/// Durable record of which migrations have been applied, kept as a table in
/// the same database the migrations modify.
///
/// Co-locating the ledger with the data it protects is what lets the runner
/// wrap "apply migration N" and "record migration N" in one transaction, so
/// the schema and the ledger can never disagree about what happened.
pub struct Ledger {
    table: String,
}

impl Ledger {
    /// Ledger handle for the given tracking table.
    ///
    /// The table name is spliced into DDL and queries verbatim (identifiers
    /// cannot be bound as statement parameters), so it must be an unqualified
    /// identifier coming from operator configuration, never from untrusted
    /// input.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the tracking table and its insert trigger if missing.
    ///
    /// The trigger stamps `applied_at` on the database server at insert
    /// time; host clocks never supply the timestamp, so skew between runner
    /// machines cannot scramble the audit trail. Safe to run on every
    /// process start: the table is `IF NOT EXISTS`, the function is
    /// `CREATE OR REPLACE`, and the trigger is dropped before recreation.
    pub async fn ensure(&self, client: &Client) -> Result<(), MigrationError> {
        let table = &self.table;
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                migration_name VARCHAR(80) PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL
            );

            CREATE OR REPLACE FUNCTION {table}_stamp_applied_at()
                RETURNS TRIGGER
                LANGUAGE plpgsql
                AS $$
            BEGIN
                NEW.applied_at = now();
                RETURN NEW;
            END;
            $$;

            DROP TRIGGER IF EXISTS {table}_applied_at ON {table};
            CREATE TRIGGER {table}_applied_at
                BEFORE INSERT ON {table}
                FOR EACH ROW
                EXECUTE PROCEDURE {table}_stamp_applied_at();"
        );
        client.batch_execute(&ddl).await?;
        Ok(())
    }

    /// Whether `name` has already been recorded.
    ///
    /// Always a single fresh round trip. Another runner may be racing this
    /// one against the same database, so a cached answer would be a lie.
    pub async fn is_applied(&self, client: &Client, name: &str) -> Result<bool, MigrationError> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE migration_name = $1)",
            self.table
        );
        let row = client.query_one(&query, &[&name]).await?;
        Ok(row.get(0))
    }

    /// Insert `name` inside the caller's transaction.
    ///
    /// A unique-constraint conflict on the name is reported as
    /// [`RecordOutcome::Duplicate`] instead of an error, so the caller can
    /// tell "lost a race to another runner" apart from a genuinely broken
    /// insert.
    pub async fn record(
        &self,
        tx: &Transaction<'_>,
        name: &str,
    ) -> Result<RecordOutcome, MigrationError> {
        let insert = format!("INSERT INTO {} (migration_name) VALUES ($1)", self.table);
        match tx.execute(&insert, &[&name]).await {
            Ok(_) => Ok(RecordOutcome::Recorded),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Ok(RecordOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }
}
