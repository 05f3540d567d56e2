//! Database connection module for the HealthLog application
//!
//! The whole process shares a single SQLite connection pool. It is built once,
//! on the first call to [`initialize_database_pool`], and every later caller
//! gets a cheap clone of the same handle through [`get_db_pool`].

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{debug, error, info};

use super::migrations::run_sqlite_migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Default location of the SQLite file, relative to the working directory
pub const DEFAULT_SQLITE_PATH: &str = "data/health_log.sqlite";

/// Milliseconds a connection waits on a locked database before failing
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Pool settings r2d2 would refuse
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection checkout timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_connections);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.timeout_seconds);

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        DatabaseConfig {
            sqlite_path,
            max_connections,
            timeout_seconds,
        }
    }
}

/// Shared handle to the SQLite connection pool.
///
/// Cloning is cheap; all clones refer to the same underlying pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
}

impl DatabasePool {
    /// Open a pool on the SQLite file named in `config` and bring its schema up to date.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        // r2d2 panics on a zero pool size or timeout
        if config.max_connections == 0 || config.timeout_seconds == 0 {
            return Err(DatabaseError::InvalidConfig(format!(
                "max_connections={} and timeout_seconds={} must both be positive",
                config.max_connections, config.timeout_seconds
            )));
        }

        let sqlite_path = &config.sqlite_path;
        info!("Opening SQLite database at: {}", sqlite_path);

        if let Some(parent) = Path::new(sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(configure_connection);

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)
            .map_err(|e| {
                error!("Failed to create SQLite connection pool: {}", e);
                DatabaseError::SqlitePoolError(e)
            })?;

        Self::migrated(pool)
    }

    /// Single-connection in-memory pool.
    ///
    /// SQLite gives every in-memory connection its own database, so the pool is
    /// capped at one connection to keep all callers on the same data.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let manager = SqliteConnectionManager::memory().with_init(configure_connection);
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Self::migrated(pool)
    }

    fn migrated(pool: r2d2::Pool<SqliteConnectionManager>) -> Result<Self, DatabaseError> {
        let conn = pool.get()?;
        run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;
        drop(conn);

        debug!("SQLite connection pool ready");
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Check a connection out of the pool
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, r2d2::Error> {
        self.pool.get()
    }

    /// Describe the database file and pool usage, for startup logging
    pub fn connection_info(&self) -> String {
        let location = self
            .get()
            .ok()
            .and_then(|conn| {
                conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2))
                    .ok()
            })
            .map(|path| {
                if path.is_empty() {
                    "SQLite in-memory database".to_string()
                } else {
                    format!("SQLite database at {}", path)
                }
            })
            .unwrap_or_else(|| "SQLite database (path unknown)".to_string());

        let state = self.pool.state();
        format!(
            "{} (connections: total={}, idle={})",
            location, state.connections, state.idle_connections
        )
    }

    /// True when both handles share the same underlying pool
    #[cfg(test)]
    pub(crate) fn same_pool(&self, other: &DatabasePool) -> bool {
        Arc::ptr_eq(&self.pool, &other.pool)
    }
}

fn configure_connection(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT_MS
    ))
}

/// Initialize the process-wide database pool.
///
/// The pool is constructed on the first call only; later calls hand back the
/// already-built pool and ignore `config`.
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    DB_POOL
        .get_or_try_init(|| {
            info!("Initializing database pool");
            DatabasePool::open(config)
        })
        .cloned()
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn temp_db_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "health_log_{}_{}",
            name,
            std::process::id()
        ));
        dir.join("nested").join("test.sqlite").to_string_lossy().into_owned()
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path, DEFAULT_SQLITE_PATH);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_from_env_ignores_zero_timeout() {
        env::set_var("DB_TIMEOUT_SECONDS", "0");
        let config = DatabaseConfig::from_env();
        env::remove_var("DB_TIMEOUT_SECONDS");

        assert_eq!(config.timeout_seconds, DatabaseConfig::default().timeout_seconds);
    }

    #[test]
    fn test_open_rejects_zero_timeout() {
        let config = DatabaseConfig {
            sqlite_path: temp_db_path("zero_timeout"),
            max_connections: 2,
            timeout_seconds: 0,
        };

        assert!(matches!(
            DatabasePool::open(&config),
            Err(DatabaseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let path = temp_db_path("open");
        let config = DatabaseConfig {
            sqlite_path: path.clone(),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let pool = DatabasePool::open(&config).unwrap();
        assert!(Path::new(&path).exists());
        assert!(pool.connection_info().contains("test.sqlite"));

        let _ = fs::remove_dir_all(Path::new(&path).parent().unwrap().parent().unwrap());
    }

    #[test]
    fn test_global_pool_is_initialized_once() {
        let path = temp_db_path("global");
        let config = DatabaseConfig {
            sqlite_path: path.clone(),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let first = initialize_database_pool(&config).unwrap();
        let other_config = DatabaseConfig {
            sqlite_path: temp_db_path("ignored"),
            ..config
        };
        let second = initialize_database_pool(&other_config).unwrap();
        let fetched = get_db_pool().unwrap();

        assert!(first.same_pool(&second));
        assert!(first.same_pool(&fetched));

        let _ = fs::remove_dir_all(Path::new(&path).parent().unwrap().parent().unwrap());
    }

    #[test]
    fn test_in_memory_pool_has_schema() {
        let pool = DatabasePool::in_memory().unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(pool.connection_info().contains("in-memory"));
    }
}
