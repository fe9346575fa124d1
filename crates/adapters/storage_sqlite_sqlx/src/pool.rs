//! Opening the appointments database.
//!
//! Several processes may share one database file, each relying on the
//! guarded insert in [`crate::appointment_repo`] for conflict detection.
//! File databases therefore run in WAL mode with a busy timeout, so a
//! writer waits for a competing writer instead of failing with
//! `SQLITE_BUSY`.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::appointment_repo::SqliteAppointmentRepository;
use crate::error::StorageError;

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the `SQLite` Booking Store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection url, e.g. `sqlite:slotbook.db` or `sqlite::memory:`.
    pub database_url: String,
    /// Pool size for file databases; in-memory ones always use one connection.
    pub max_connections: u32,
    /// How long a statement waits on a locked database before giving up.
    pub busy_timeout: Duration,
}

impl Config {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Open the pool, creating the database file when missing, and apply
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] for a bad url or unreachable file and
    /// [`StorageError::Migration`] when the schema cannot be applied.
    pub async fn connect(&self) -> Result<SqlitePool, StorageError> {
        let open_err = |source: sqlx::Error| StorageError::Open {
            url: self.database_url.clone(),
            source,
        };

        let mut options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(open_err)?
            .create_if_missing(true)
            .busy_timeout(self.busy_timeout);
        let mut pool = SqlitePoolOptions::new().max_connections(self.max_connections);

        if self.is_in_memory() {
            // one connection that never expires: the database dies with it
            pool = pool
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        } else {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let pool = pool.connect_with(options).await.map_err(open_err)?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(
            url = %self.database_url,
            max_connections = self.max_connections,
            "sqlite booking store ready"
        );
        Ok(pool)
    }

    /// Open the database and wrap it in a repository.
    ///
    /// # Errors
    ///
    /// See [`Config::connect`].
    pub async fn open(&self) -> Result<SqliteAppointmentRepository, StorageError> {
        self.connect().await.map(SqliteAppointmentRepository::new)
    }
}
