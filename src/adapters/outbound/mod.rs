mod file_config_store;
mod http_config_store;
mod http_registry;
mod noop_registry;

pub use file_config_store::FileConfigStore;
pub use http_config_store::HttpConfigStore;
pub use http_registry::HttpRegistry;
pub use noop_registry::NoopRegistry;

use crate::config::Config;
use crate::domain::ports::ConfigStore;
use std::sync::Arc;

/// Pick the config-store backend for a loaded configuration: the remote
/// store when a config URL is set, the local file otherwise.
pub fn config_store_from(cfg: &Config) -> Arc<dyn ConfigStore> {
    match &cfg.config_url {
        Some(url) => Arc::new(HttpConfigStore::new(
            url.clone(),
            cfg.config_key.clone(),
            cfg.namespace.clone(),
        )),
        None => Arc::new(FileConfigStore::new(cfg.config_path.clone())),
    }
}
