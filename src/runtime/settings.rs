use crate::config::Settings;

/// Settings to run with. Falls back to defaults when the config file cannot
/// be read or fails validation, returning the reason alongside.
pub fn load_settings() -> (Settings, Option<String>) {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });

    match loaded {
        Ok(settings) => (settings, None),
        Err(problem) => (Settings::default(), Some(problem)),
    }
}
