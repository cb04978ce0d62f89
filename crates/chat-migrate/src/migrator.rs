use std::fs;
use std::path::Path;

use deadpool_postgres::{ClientWrapper, Pool};

use crate::discover::{discover, DiscoveredFile};
use crate::error::MigrationError;
use crate::ledger::{Ledger, RecordOutcome};

/// Terminal state for one discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The file's SQL ran and its ledger row committed with it.
    Applied,
    /// The ledger already had this name; nothing was executed.
    AlreadyApplied,
    /// A concurrent runner recorded this name while our transaction was in
    /// flight. Our copy rolled back; the other runner's changes are live,
    /// so this counts as success.
    RaceLost,
    /// Not a `.sql` file; ignored and never recorded.
    Skipped,
}

/// Per-run counts, one bucket per [`ApplyOutcome`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSummary {
    pub applied: usize,
    pub already_applied: usize,
    pub race_lost: usize,
    pub skipped: usize,
}

/// Applies a directory tree of SQL files to a database, each file exactly
/// once.
///
/// Files apply in a deterministic order: subdirectories expand depth-first
/// before their sibling files, and entries of each kind go in name order.
/// File names are therefore the ordering contract; give migrations a
/// monotonically increasing prefix so they sort into the intended
/// execution sequence. Files without a `.sql` suffix are skipped.
///
/// Each file's SQL executes verbatim as one statement batch inside a
/// transaction that also writes the ledger row, so a failed statement rolls
/// the whole file back and leaves no record of it. Re-running after a crash
/// is a no-op for every file already in the ledger.
pub struct Migrator {
    ledger: Ledger,
    log_progress: bool,
    log_errors: bool,
}

impl Migrator {
    /// Runner tracking applied migrations in `table`, with progress and
    /// error logging enabled.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            ledger: Ledger::new(table),
            log_progress: true,
            log_errors: true,
        }
    }

    /// Toggle per-file progress lines, so the runner can work silently when
    /// embedded. Several runner instances can carry different settings; the
    /// flags are per-instance, not process-wide.
    #[must_use]
    pub fn log_progress(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }

    /// Toggle error lines. Errors are still returned to the caller either
    /// way.
    #[must_use]
    pub fn log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = enabled;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Apply every not-yet-applied migration under `root`.
    ///
    /// Bootstraps the ledger first, then walks the tree and drives each
    /// file through its lifecycle sequentially on a single connection. The
    /// run aborts on the first failure of any kind; files after the failing
    /// one are not attempted. Returns per-outcome counts on success.
    pub async fn run(
        &self,
        pool: &Pool,
        root: impl AsRef<Path>,
    ) -> Result<MigrationSummary, MigrationError> {
        let root = root.as_ref();
        let mut client = pool.get().await?;

        self.ledger.ensure(&client).await?;

        if self.log_progress {
            tracing::info!(root = %root.display(), "starting migration run");
        }

        let files = match discover(root) {
            Ok(files) => files,
            Err(e) => {
                if self.log_errors {
                    tracing::error!(root = %root.display(), error = %e, "cannot read migration tree");
                }
                return Err(e.into());
            }
        };

        let mut summary = MigrationSummary::default();
        for file in &files {
            let outcome = match self.apply_file(&mut client, file).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    if self.log_progress {
                        tracing::warn!(file = %file.file_name, "migration run stopped");
                    }
                    return Err(e);
                }
            };
            match outcome {
                ApplyOutcome::Applied => summary.applied += 1,
                ApplyOutcome::AlreadyApplied => summary.already_applied += 1,
                ApplyOutcome::RaceLost => summary.race_lost += 1,
                ApplyOutcome::Skipped => summary.skipped += 1,
            }
        }

        if self.log_progress {
            tracing::info!(
                applied = summary.applied,
                already_applied = summary.already_applied,
                race_lost = summary.race_lost,
                skipped = summary.skipped,
                "migration run complete"
            );
        }
        Ok(summary)
    }

    /// Drive one file through
    /// `Discovered -> (AlreadyApplied | Applied | RaceLost | Skipped)`,
    /// or fail the run.
    async fn apply_file(
        &self,
        client: &mut ClientWrapper,
        file: &DiscoveredFile,
    ) -> Result<ApplyOutcome, MigrationError> {
        let Some(name) = migration_name(&file.file_name) else {
            if self.log_progress {
                tracing::debug!(file = %file.file_name, "not a migration file, skipping");
            }
            return Ok(ApplyOutcome::Skipped);
        };

        if self.log_progress {
            tracing::info!(migration = name, "processing");
        }

        if self.ledger.is_applied(client, name).await? {
            if self.log_progress {
                tracing::info!(migration = name, "already migrated");
            }
            return Ok(ApplyOutcome::AlreadyApplied);
        }

        let sql = match fs::read_to_string(&file.path) {
            Ok(sql) => sql,
            Err(e) => {
                if self.log_errors {
                    tracing::error!(file = %file.path.display(), error = %e, "cannot read migration file");
                }
                return Err(e.into());
            }
        };

        let tx = client.transaction().await?;

        if let Err(e) = tx.batch_execute(&sql).await {
            if self.log_errors {
                tracing::error!(migration = name, error = %e, "migration failed, rolling back");
            }
            // the file's SQL error is the one worth reporting
            let _ = tx.rollback().await;
            return Err(MigrationError::MigrationFailed {
                name: name.to_owned(),
                message: e.to_string(),
            });
        }

        match self.ledger.record(&tx, name).await? {
            RecordOutcome::Recorded => {}
            RecordOutcome::Duplicate => {
                tx.rollback().await?;
                if self.log_progress {
                    tracing::warn!(
                        migration = name,
                        "recorded by a concurrent runner, keeping its copy"
                    );
                }
                return Ok(ApplyOutcome::RaceLost);
            }
        }

        tx.commit().await?;

        if self.log_progress {
            tracing::info!(migration = name, "success");
        }
        Ok(ApplyOutcome::Applied)
    }
}

/// Logical migration name for a file, or `None` when the file is not a
/// migration. The recognized suffix is `.sql`; everything before it is
/// what goes in the ledger.
fn migration_name(file_name: &str) -> Option<&str> {
    match file_name.strip_suffix(".sql") {
        Some("") | None => None,
        name => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_files_keep_their_stem() {
        assert_eq!(migration_name("001_init.sql"), Some("001_init"));
        assert_eq!(migration_name("0002_create_chats.sql"), Some("0002_create_chats"));
    }

    #[test]
    fn other_files_are_not_migrations() {
        assert_eq!(migration_name("README.md"), None);
        assert_eq!(migration_name("001_init.sql.bak"), None);
        assert_eq!(migration_name("001_init"), None);
    }

    #[test]
    fn a_bare_suffix_is_not_a_migration() {
        assert_eq!(migration_name(".sql"), None);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert_eq!(migration_name("001_init.SQL"), None);
    }
}
