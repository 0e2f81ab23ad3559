use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::config;
use crate::metadata::{Registry, RegistryError, TagExtractor};
use crate::sync::CancelToken;

/// Install the stderr subscriber. `RUST_LOG` overrides `log.level`.
pub fn init_logging(settings: &config::LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One `TagExtractor` per configured extension.
pub fn build_registry(settings: &config::MetadataSettings) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    for ext in &settings.extensions {
        registry.register(ext, TagExtractor)?;
    }
    debug!(extensions = ?registry.extensions(), "metadata registry ready");
    Ok(registry)
}

/// First Ctrl-C asks the running sync to stop after the current file.
pub fn install_interrupt_handler(cancel: &CancelToken) {
    let cancel = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!("cannot install Ctrl-C handler: {err}");
    }
}
