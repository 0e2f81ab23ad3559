use std::{env, path::PathBuf};

use super::schema::{CatalogSettings, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `MUSICDEX__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MUSICDEX")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: Vec<&str> = Vec::new();
        for ext in &self.metadata.extensions {
            if ext.len() < 2 || !ext.starts_with('.') {
                return Err(format!(
                    "metadata.extensions: \"{ext}\" must start with a dot, e.g. \".mp3\""
                ));
            }
            if seen.contains(&ext.as_str()) {
                return Err(format!("metadata.extensions: \"{ext}\" is listed twice"));
            }
            seen.push(ext);
        }
        if self.log.level.trim().is_empty() {
            return Err("log.level must not be empty".to_string());
        }
        Ok(())
    }
}

impl CatalogSettings {
    /// Configured catalog path, else the default data location.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_catalog_path)
    }
}

/// Resolve the config path from `MUSICDEX_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUSICDEX_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/musicdex/config.toml`
/// or `~/.config/musicdex/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("musicdex").join("config.toml"))
}

/// `$XDG_DATA_HOME/musicdex/catalog.sqlite3`, or the same under
/// `~/.local/share` when `XDG_DATA_HOME` is not set.
pub fn default_catalog_path() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("musicdex").join("catalog.sqlite3"))
}
