use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musicdex/config.toml` or `~/.config/musicdex/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSICDEX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub metadata: MetadataSettings,
    pub catalog: CatalogSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root. The command-line argument wins over this.
    pub root: Option<PathBuf>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Extensions (case-sensitive, with the leading dot) read by the built-in
    /// tag extractor.
    pub extensions: Vec<String>,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            extensions: vec![".mp3".into(), ".flac".into(), ".ogg".into(), ".m4a".into()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// SQLite file holding the catalog. Defaults under the XDG data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Print one marker per file while syncing (`+` new, `!` updated,
    /// `.` unchanged, `?` unreadable).
    pub progress: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            progress: true,
        }
    }
}
