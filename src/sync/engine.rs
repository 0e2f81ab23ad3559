use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogStore, StoreError};
use crate::library::{FileWalker, LibraryWalker, WalkError, paths};
use crate::metadata::{Extraction, Registry};

use super::clock::{CancelToken, SyncTime};
use super::freshness;
use super::report::{FileOutcome, SyncReport};

/// Stage of a run, carried by store failures for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Start,
    Walking,
    Committing,
    GarbageCollecting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::Walking => "walking",
            Phase::Committing => "committing",
            Phase::GarbageCollecting => "garbage collecting",
        };
        f.write_str(name)
    }
}

/// A run that could not complete. Nothing it staged was committed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("library walk failed: {0}")]
    Walk(#[from] WalkError),
    #[error("catalog failure while {phase}: {source}")]
    Store {
        phase: Phase,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    fn store(phase: Phase) -> impl FnOnce(StoreError) -> SyncError {
        move |source| SyncError::Store { phase, source }
    }
}

/// Reconciles a catalog with the files under `root`.
///
/// The catalog is passed to [`SyncEngine::run`] explicitly; the engine holds
/// no store state between runs. Concurrent runs against one catalog are not
/// supported.
pub struct SyncEngine<W = LibraryWalker> {
    root: PathBuf,
    registry: Registry,
    walker: W,
    cancel: CancelToken,
}

impl<W: FileWalker> SyncEngine<W> {
    pub fn new(root: impl Into<PathBuf>, registry: Registry, walker: W) -> Self {
        Self {
            root: root.into(),
            registry,
            walker,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run without per-file progress.
    #[cfg(test)]
    pub fn sync<S>(&self, store: &mut S) -> Result<SyncReport, SyncError>
    where
        S: CatalogStore + ?Sized,
    {
        self.run(store, &mut |_: &Path, _: FileOutcome| {})
    }

    /// One full run. `observer` sees every walked file and its outcome.
    ///
    /// On a walk or store error the staged changes are rolled back and the
    /// error is returned; the catalog keeps its last committed state.
    pub fn run<S>(
        &self,
        store: &mut S,
        observer: &mut dyn FnMut(&Path, FileOutcome),
    ) -> Result<SyncReport, SyncError>
    where
        S: CatalogStore + ?Sized,
    {
        let run_at = SyncTime::for_run(
            store
                .latest_sync_time()
                .map_err(SyncError::store(Phase::Start))?,
        );
        info!(root = %self.root.display(), "syncing library");

        match self.run_phases(store, run_at, observer) {
            Ok(report) => {
                info!(
                    new = report.new,
                    updated = report.updated,
                    unchanged = report.unchanged,
                    unsupported = report.unsupported,
                    failed = report.failed,
                    invalid = report.invalid,
                    deleted = report.deleted,
                    cancelled = report.cancelled,
                    "sync finished"
                );
                Ok(report)
            }
            Err(err) => {
                error!("sync aborted: {err}");
                if let Err(rollback) = store.rollback() {
                    error!("rollback after aborted sync failed: {rollback}");
                }
                Err(err)
            }
        }
    }

    fn run_phases<S>(
        &self,
        store: &mut S,
        run_at: SyncTime,
        observer: &mut dyn FnMut(&Path, FileOutcome),
    ) -> Result<SyncReport, SyncError>
    where
        S: CatalogStore + ?Sized,
    {
        let mut report = SyncReport::default();

        debug!(phase = %Phase::Walking, "entering phase");
        for entry in self.walker.walk(&self.root) {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let path = entry?;
            let outcome = self
                .sync_file(store, &path, run_at)
                .map_err(SyncError::store(Phase::Walking))?;
            report.record(outcome);
            observer(&path, outcome);
        }

        debug!(phase = %Phase::Committing, "entering phase");
        store.commit().map_err(SyncError::store(Phase::Committing))?;

        if report.cancelled {
            warn!("sync cancelled; kept progress, skipped removal of missing tracks");
            return Ok(report);
        }

        debug!(phase = %Phase::GarbageCollecting, "entering phase");
        report.deleted = store
            .delete_stale(run_at)
            .map_err(SyncError::store(Phase::GarbageCollecting))?;
        store
            .commit()
            .map_err(SyncError::store(Phase::GarbageCollecting))?;

        Ok(report)
    }

    fn sync_file<S>(
        &self,
        store: &mut S,
        path: &Path,
        run_at: SyncTime,
    ) -> Result<FileOutcome, StoreError>
    where
        S: CatalogStore + ?Sized,
    {
        let key = match paths::normalize(path, &self.root) {
            Ok(key) => key,
            Err(err) => {
                warn!("skipping file: {err}");
                return Ok(FileOutcome::Invalid);
            }
        };

        let mut track = store.find_or_create(&key)?;
        let is_new = track.is_new();

        if !is_new && freshness::should_skip(path, Some(&track)) {
            track.touch(run_at);
            store.upsert(&track)?;
            debug!(%key, "unchanged");
            return Ok(FileOutcome::Unchanged);
        }

        let outcome = match self.registry.extract(path) {
            Extraction::Extracted(record) => {
                track.merge(&record);
                track.touch(run_at);
                store.upsert(&track)?;

                let outcome = if is_new {
                    FileOutcome::New
                } else {
                    FileOutcome::Updated
                };
                debug!(%key, ?outcome, has_cover = track.has_cover, "extracted");
                return Ok(outcome);
            }
            Extraction::Unsupported => FileOutcome::Unsupported,
            Extraction::Failed => FileOutcome::Failed,
        };

        // A known file that is still present must survive garbage collection;
        // an unknown one is simply not catalogued this run.
        if !is_new {
            track.touch(run_at);
            store.upsert(&track)?;
        }
        debug!(%key, ?outcome, "no metadata");
        Ok(outcome)
    }
}
