use thiserror::Error;
use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No entry with the given id
    #[error("Entry not found: {0}")]
    NotFound(i64),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The blocking database task panicked or was cancelled
    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
