use std::collections::BTreeMap;

use crate::library::Track;
use crate::sync::SyncTime;

use super::store::{CatalogStore, StoreError};

/// In-process catalog with the same staging semantics as the SQLite one.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    committed: BTreeMap<String, Track>,
    staged: Option<BTreeMap<String, Track>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_staged_changes(&self) -> bool {
        self.staged.is_some()
    }

    fn view(&self) -> &BTreeMap<String, Track> {
        self.staged.as_ref().unwrap_or(&self.committed)
    }

    fn stage(&mut self) -> &mut BTreeMap<String, Track> {
        self.staged.get_or_insert_with(|| self.committed.clone())
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_by_path(&self, key: &str) -> Result<Option<Track>, StoreError> {
        Ok(self.view().get(key).cloned())
    }

    fn upsert(&mut self, track: &Track) -> Result<(), StoreError> {
        self.stage().insert(track.path.clone(), track.clone());
        Ok(())
    }

    fn delete_stale(&mut self, run: SyncTime) -> Result<usize, StoreError> {
        let staged = self.stage();
        let before = staged.len();
        staged.retain(|_, track| track.last_sync_time == Some(run));
        Ok(before - staged.len())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(staged) = self.staged.take() {
            self.committed = staged;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.staged = None;
        Ok(())
    }

    fn latest_sync_time(&self) -> Result<Option<SyncTime>, StoreError> {
        Ok(self.view().values().filter_map(|t| t.last_sync_time).max())
    }

    fn tracks(&self) -> Result<Vec<Track>, StoreError> {
        Ok(self.view().values().cloned().collect())
    }
}
