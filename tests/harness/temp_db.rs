use std::path::{Path, PathBuf};
use std::sync::Arc;

use squadledger::adapter::outbound::sqlite::database::connection::{open, DbPool};
use squadledger::adapter::outbound::sqlite::SqliteLedgerStore;
use tempfile::TempDir;

/// Temporary file-backed SQLite database for integration tests.
///
/// The directory, database, and WAL files are removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("squadledger-{name}.db"));
        let pool = open(&path.display().to_string()).expect("open sqlite database");
        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn store(&self) -> Arc<SqliteLedgerStore> {
        Arc::new(SqliteLedgerStore::new(self.pool.clone()))
    }
}
