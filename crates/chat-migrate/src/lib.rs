//! Schema migration runner backed by the target database itself.
//!
//! Migrations are plain SQL files in a directory tree. Each file is applied
//! at most once, in a deterministic order, and every application is recorded
//! in a ledger table living in the same database the migrations modify.
//! Executing a file's SQL and recording it happen in one transaction, so a
//! crash or a failed statement can never leave the schema and the ledger
//! disagreeing.
//!
//! File names are the ordering contract: give migrations a monotonically
//! increasing prefix (`001_create_users.sql`, `002_...`) so they sort into
//! the intended execution order. Subdirectories are walked depth-first
//! before their sibling files. Files without a `.sql` suffix are skipped.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_migrate::Migrator;
//!
//! # async fn example(pool: deadpool_postgres::Pool) -> Result<(), chat_migrate::MigrationError> {
//! let migrator = Migrator::new("migrations_chat_service");
//! let summary = migrator.run(&pool, "./migrations").await?;
//! println!(
//!     "{} applied, {} already there",
//!     summary.applied, summary.already_applied
//! );
//! # Ok(())
//! # }
//! ```

mod discover;
mod error;
mod ledger;
mod migrator;

pub use error::MigrationError;
pub use ledger::{Ledger, RecordOutcome};
pub use migrator::{ApplyOutcome, MigrationSummary, Migrator};

pub use deadpool_postgres;
pub use tokio_postgres;
