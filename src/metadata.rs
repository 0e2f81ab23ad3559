//! Tag extraction.
//!
//! Extractors are bound to file extensions in a `Registry`. The registry
//! tells "no extractor for this type" apart from "extractor could not read
//! this file"; neither is an error for the caller.

mod record;
mod registry;
mod tags;

pub use record::{Field, MetadataRecord};
pub use registry::{Extraction, Registry, RegistryError};
pub use tags::TagExtractor;

#[cfg(test)]
pub use record::MimeData;
#[cfg(test)]
pub use registry::MetadataExtractor;

#[cfg(test)]
mod tests;
