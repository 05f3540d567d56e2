use async_trait::async_trait;
use rusqlite::Connection;
use tracing::debug;

use crate::database::{get_db_pool, DatabasePool};
use crate::models::entry::{Entry, EntryChanges, EntryData};
use super::errors::RepositoryError;
use super::storage::DatabaseStorage;

/// Repository trait for health log entries
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    /// Insert a new entry
    async fn create(&self, data: EntryData) -> Result<Entry, RepositoryError>;

    /// Get an entry by id, `None` when it does not exist
    async fn get_by_id(&self, id: i64) -> Result<Option<Entry>, RepositoryError>;

    /// List entries newest first, skipping `skip` and returning at most `take`
    async fn list(&self, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, RepositoryError>;

    /// Overwrite all fields of an existing entry
    async fn replace(&self, id: i64, data: EntryData) -> Result<Entry, RepositoryError>;

    /// Update a subset of fields of an existing entry
    async fn apply_changes(&self, id: i64, changes: EntryChanges) -> Result<Entry, RepositoryError>;

    /// Delete an existing entry
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

/// SQLite-backed repository for entries.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: DatabasePool,
}

impl EntryRepository {
    /// Create a repository on the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a repository on the process-wide pool
    pub fn from_global() -> Result<Self, RepositoryError> {
        Ok(Self::new(get_db_pool()?))
    }

    /// Run `op` on a pooled connection without blocking the async runtime
    async fn with_connection<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            op(&conn)
        })
        .await?
    }
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    async fn create(&self, data: EntryData) -> Result<Entry, RepositoryError> {
        debug!("Storing entry in database");
        self.with_connection(move |conn| DatabaseStorage::insert(conn, &data)).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Entry>, RepositoryError> {
        debug!("Getting entry by id from database: {}", id);
        self.with_connection(move |conn| DatabaseStorage::get_by_id(conn, id)).await
    }

    async fn list(&self, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, RepositoryError> {
        debug!("Listing entries from database: skip={}, take={:?}", skip, take);
        self.with_connection(move |conn| DatabaseStorage::list(conn, skip, take)).await
    }

    async fn replace(&self, id: i64, data: EntryData) -> Result<Entry, RepositoryError> {
        debug!("Replacing entry in database: {}", id);
        self.with_connection(move |conn| DatabaseStorage::replace(conn, id, &data)).await
    }

    async fn apply_changes(&self, id: i64, changes: EntryChanges) -> Result<Entry, RepositoryError> {
        debug!("Updating entry in database: {}", id);
        self.with_connection(move |conn| DatabaseStorage::apply_changes(conn, id, &changes)).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        debug!("Deleting entry from database: {}", id);
        self.with_connection(move |conn| DatabaseStorage::delete(conn, id)).await
    }
}
