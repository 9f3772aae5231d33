use sqlx::{
    migrate::Migrator,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};

use std::path::{Path, PathBuf};

use crate::error::MenuError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub(super) struct DbState {
    db_file: PathBuf,
    pool: SqlitePool,
}

impl std::fmt::Debug for DbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbState")
            .field("db_file", &self.db_file)
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl DbState {
    pub(super) async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, MenuError> {
        let db_file = db_file.as_ref().to_path_buf();

        let parent_missing = db_file
            .parent()
            .map(|p| !p.as_os_str().is_empty() && !p.is_dir())
            .unwrap_or(false);
        if parent_missing {
            return Err(MenuError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database file parent does not exist: {:?}", db_file),
            )));
        }

        // Commits must be on disk before a write returns.
        let connect_opts = SqliteConnectOptions::new()
            .filename(&db_file)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await?;

        Ok(Self { db_file, pool })
    }

    pub(super) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the embedded migrations. Already-applied migrations are skipped.
    pub(super) async fn migrate(&self) -> Result<(), MenuError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Release file handles. Any later use of the pool fails with `PoolClosed`.
    pub(super) async fn close(&self) {
        self.pool.close().await;
    }
}
