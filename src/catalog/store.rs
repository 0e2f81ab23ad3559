use std::path::PathBuf;

use thiserror::Error;

use crate::library::Track;
use crate::sync::SyncTime;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("cannot prepare catalog directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keyed track storage with run-scoped staging.
///
/// Writes (`upsert`, `delete_stale`) are staged: later reads in the same run
/// see them, but they only become durable on `commit`. `rollback` discards
/// everything staged since the last commit.
pub trait CatalogStore {
    fn find_by_path(&self, key: &str) -> Result<Option<Track>, StoreError>;

    /// The stored record for `key`, or a new unsaved one with only `path` set.
    ///
    /// Callers tell the two apart with [`Track::is_new`].
    fn find_or_create(&self, key: &str) -> Result<Track, StoreError> {
        Ok(self
            .find_by_path(key)?
            .unwrap_or_else(|| Track::new(key)))
    }

    fn upsert(&mut self, track: &Track) -> Result<(), StoreError>;

    /// Delete every record whose `last_sync_time` is not `run`.
    ///
    /// Only meaningful once every record seen by the run has been upserted.
    fn delete_stale(&mut self, run: SyncTime) -> Result<usize, StoreError>;

    fn commit(&mut self) -> Result<(), StoreError>;

    fn rollback(&mut self) -> Result<(), StoreError>;

    /// Highest `last_sync_time` in the catalog, if any record was ever synced.
    fn latest_sync_time(&self) -> Result<Option<SyncTime>, StoreError>;

    /// Every record, ordered by path.
    fn tracks(&self) -> Result<Vec<Track>, StoreError>;
}
