use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Initialize the global configuration
///
/// Loads `path` (missing file means defaults) and layers `TINYLINK__*` and
/// `BASE_URL` on top. Only the first successful call wins.
pub fn init_config(path: &str) -> Result<Arc<StaticConfig>, config::ConfigError> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing.clone());
    }

    let loaded = Arc::new(StaticConfig::load(path)?);
    debug!("Configuration loaded from {}", path);
    Ok(CONFIG.get_or_init(|| loaded).clone())
}
