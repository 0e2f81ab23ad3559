use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use super::record::MetadataRecord;

/// Reads embedded tags from one kind of audio file.
///
/// `read_metadata` is only called for existing files whose extension matches
/// the one the extractor was registered for. Unreadable or corrupt files
/// yield `None`; they must never abort a scan.
pub trait MetadataExtractor: Send + Sync {
    fn read_metadata(&self, path: &Path) -> Option<MetadataRecord>;
}

impl<F> MetadataExtractor for F
where
    F: Fn(&Path) -> Option<MetadataRecord> + Send + Sync,
{
    fn read_metadata(&self, path: &Path) -> Option<MetadataRecord> {
        self(path)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("an extractor is already registered for \"{0}\"")]
    DuplicateProvider(String),
    #[error("\"{0}\" is not a file extension (expected a leading dot, e.g. \".mp3\")")]
    InvalidExtension(String),
}

/// Result of asking the registry for a file's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// No extractor is bound to the file's extension.
    Unsupported,
    /// An extractor ran but could not read the file.
    Failed,
    Extracted(MetadataRecord),
}

/// The extension of `path` including its leading dot, case preserved.
///
/// Taken from the last `.` of the file name. Names without a dot, or whose
/// only dot is the first character (`.hidden`), have no extension.
pub fn extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(&name[idx..]),
        _ => None,
    }
}

/// Extension-to-extractor table, filled once at startup.
#[derive(Default)]
pub struct Registry {
    extractors: HashMap<String, Box<dyn MetadataExtractor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `extractor` to `extension` (case-sensitive, with leading dot).
    pub fn register<E>(&mut self, extension: &str, extractor: E) -> Result<(), RegistryError>
    where
        E: MetadataExtractor + 'static,
    {
        if !extension.starts_with('.') || extension.len() < 2 {
            return Err(RegistryError::InvalidExtension(extension.to_string()));
        }
        if self.extractors.contains_key(extension) {
            return Err(RegistryError::DuplicateProvider(extension.to_string()));
        }
        self.extractors
            .insert(extension.to_string(), Box::new(extractor));
        Ok(())
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    pub fn extract(&self, path: &Path) -> Extraction {
        let Some(extractor) = extension(path).and_then(|ext| self.extractors.get(ext)) else {
            return Extraction::Unsupported;
        };

        // Tag parsers occasionally panic on hostile input; treat that as unreadable.
        match panic::catch_unwind(AssertUnwindSafe(|| extractor.read_metadata(path))) {
            Ok(Some(record)) => Extraction::Extracted(record),
            Ok(None) => {
                debug!(path = %path.display(), "extractor could not read file");
                Extraction::Failed
            }
            Err(_) => {
                warn!(path = %path.display(), "extractor panicked; treating file as unreadable");
                Extraction::Failed
            }
        }
    }
}
