//! Incremental synchronisation of the catalog against the library tree.
//!
//! A run walks the library, re-reads tags only for files whose mtime moved
//! past their record's `last_sync_time`, stamps every file it sees with one
//! shared run timestamp, and finally deletes records the run never touched.

mod clock;
mod engine;
pub mod freshness;
mod report;

pub use clock::{CancelToken, SyncTime};
pub use engine::SyncEngine;
pub use report::FileOutcome;

#[cfg(test)]
pub use engine::{Phase, SyncError};
#[cfg(test)]
pub use report::SyncReport;
