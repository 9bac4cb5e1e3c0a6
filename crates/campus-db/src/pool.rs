//! # POS Store Handle
//!
//! Opens the SQLite file that holds the POS collection and hands out
//! repository handles onto it.
//!
//! ## One Store, One Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database                                                               │
//! │  ├── pool: SqlitePool   (WAL file, or one in-memory connection)        │
//! │  └── gate: Arc<RwLock<()>>                                              │
//! │                                                                         │
//! │  db.pos() ──► SqlitePosRepository { pool, gate } ──► PosService         │
//! │  db.pos() ──► SqlitePosRepository { pool, gate } ──► PosService         │
//! │                                  └── same gate ──┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every service built from the same `Database` (or a clone of it) waits on
//! the same lock, so a `clear` from one service is a barrier for writes and
//! reads issued through any other. The gate covers one process; a second
//! process opening the same file is not coordinated.
//!
//! On a file store WAL lets `retrieve_pos` read a committed snapshot while
//! the pool keeps connections for other callers. The in-memory store used in
//! tests lives inside a single connection, so that connection must never be
//! recycled.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::pos::SqlitePosRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the POS store lives and how the pool is sized.
///
/// Usually loaded with [`DbConfig::from_env`].
///
/// ```rust
/// use campus_db::DbConfig;
///
/// let config = DbConfig::new("/srv/campus/pos.db").max_connections(8);
/// assert_eq!(config.max_connections, 8);
/// assert_eq!(config.min_connections, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite file, created on first open. `:memory:` for a throwaway store.
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a caller waits for a free connection.
    pub connect_timeout: Duration,
    /// Apply pending schema migrations when opening.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Store file used when `CAMPUS_DB_PATH` is unset.
    pub const DEFAULT_PATH: &'static str = "./campus_coffee.db";

    /// File-backed store with a five-connection pool.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Private store that disappears with the [`Database`].
    ///
    /// Each SQLite connection to `:memory:` sees its own empty database, so
    /// the pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// True for the `:memory:` store.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::new(Self::DEFAULT_PATH)
    }
}

// =============================================================================
// Database
// =============================================================================

/// An open POS store.
///
/// Clones share the pool and the gate.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    gate: Arc<RwLock<()>>,
}

impl Database {
    /// Opens the store, applying migrations unless the config turns them off.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening POS store");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);
        if config.is_in_memory() {
            pool_options = pool_options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        Ok(Database {
            pool,
            gate: Arc::new(RwLock::new(())),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A repository handle for `PosService::new`. All handles share one gate.
    pub fn pos(&self) -> SqlitePosRepository {
        SqlitePosRepository::new(self.pool.clone(), Arc::clone(&self.gate))
    }

    /// Closes the pool. Later repository calls fail with a storage error.
    pub async fn close(&self) {
        info!("Closing POS store");
        self.pool.close().await;
    }
}
