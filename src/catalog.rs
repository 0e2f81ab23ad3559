//! Persistent set of track records.
//!
//! The sync engine only talks to the `CatalogStore` trait. `SqliteCatalog`
//! is the on-disk implementation used by the binary.

#[cfg(test)]
mod memory;
mod sqlite;
mod store;

#[cfg(test)]
pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;
pub use store::{CatalogStore, StoreError};
