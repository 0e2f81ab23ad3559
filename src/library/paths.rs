//! Conversion between host paths and catalog keys.
//!
//! Keys are relative to the library root and always use `/` so a catalog
//! stays readable when the library is mounted on another platform.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("{} is not inside the library root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[error("{} is not valid UTF-8", .0.display())]
    NotUnicode(PathBuf),
}

/// Turn `path` into a catalog key relative to `root`.
pub fn normalize(path: &Path, root: &Path) -> Result<String, PathError> {
    let outside = || PathError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| outside())?;

    let mut parts: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| PathError::NotUnicode(path.to_path_buf()))?;
                parts.push(part);
            }
            Component::CurDir => {}
            // `..`, prefixes and roots would escape the library.
            _ => return Err(outside()),
        }
    }

    if parts.is_empty() {
        return Err(outside());
    }
    Ok(parts.join("/"))
}

/// Turn a catalog key back into a relative path using the host separator.
///
/// Any string is accepted.
pub fn denormalize(key: &str) -> PathBuf {
    key.split('/').filter(|part| !part.is_empty()).collect()
}

/// Absolute location of `key` under `root`.
pub fn resolve(root: &Path, key: &str) -> PathBuf {
    root.join(denormalize(key))
}
