//! Library layout: track records, catalog keys and the file walker.
//!
//! A `Track` is the catalog's view of one audio file. Its `path` is the
//! library-relative key produced by `paths::normalize`; `scan` walks the
//! library root and yields candidate files for the sync engine.

mod model;
pub mod paths;
mod scan;

pub use model::*;
pub use scan::{FileWalker, LibraryWalker, WalkError};
