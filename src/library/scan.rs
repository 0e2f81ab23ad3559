use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// A directory entry could not be read while walking the library.
#[derive(Debug, Error)]
#[error("cannot walk {}: {message}", path.display())]
pub struct WalkError {
    pub path: PathBuf,
    pub message: String,
}

impl From<walkdir::Error> for WalkError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = match err.io_error() {
            Some(io) => io.to_string(),
            None => err.to_string(),
        };
        Self { path, message }
    }
}

/// Source of candidate files for a sync run.
///
/// Paths are absolute (or at least prefixed by `root`). Order is not
/// significant. An `Err` item aborts the run.
pub trait FileWalker {
    fn walk<'a>(
        &'a self,
        root: &'a Path,
    ) -> Box<dyn Iterator<Item = Result<PathBuf, WalkError>> + 'a>;
}

/// Recursive walker over the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LibraryWalker {
    settings: LibrarySettings,
}

impl LibraryWalker {
    pub fn new(settings: LibrarySettings) -> Self {
        Self { settings }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// A symlink loop, or a link below the root whose target cannot be read.
/// Only unreadable directories end a walk.
fn is_broken_link(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        return true;
    }
    err.depth() > 0
        && err
            .path()
            .and_then(|p| p.symlink_metadata().ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

impl FileWalker for LibraryWalker {
    fn walk<'a>(
        &'a self,
        root: &'a Path,
    ) -> Box<dyn Iterator<Item = Result<PathBuf, WalkError>> + 'a> {
        let mut walker = WalkDir::new(root).follow_links(self.settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if self.settings.recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(move |entry| match entry {
                Ok(e) if e.file_type().is_file() => Some(Ok(e.into_path())),
                Ok(_) => None,
                Err(err) if is_broken_link(&err) => {
                    warn!("skipping {}: {err}", err.path().unwrap_or(root).display());
                    None
                }
                Err(err) => Some(Err(WalkError::from(err))),
            });

        Box::new(entries)
    }
}
