//! Decides whether a file's tags must be read again.

use std::fs;
use std::path::Path;

use crate::library::Track;

use super::clock::SyncTime;

/// Modification time of `path`, if the filesystem reports one.
pub fn modified_time(path: &Path) -> Option<SyncTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(SyncTime::from_system_time)
}

/// `true` iff `track` has been synced before and the file has not been
/// modified since. An unreadable mtime never skips.
pub fn should_skip(path: &Path, track: Option<&Track>) -> bool {
    let Some(last_sync) = track.and_then(|t| t.last_sync_time) else {
        return false;
    };
    modified_time(path).is_some_and(|mtime| is_unchanged(mtime, last_sync))
}

pub fn is_unchanged(mtime: SyncTime, last_sync: SyncTime) -> bool {
    mtime <= last_sync
}
