//! Runtime Configuration
//!
//! Environment-driven configuration for the hosting process: which
//! directory and config backends to use, log level, application identity.

use serde::Deserialize;
use tracing_subscriber::fmt::format::FmtSpan;

pub const ENV_REGISTRY_URL: &str = "CONDUCTOR_REGISTRY_URL";
pub const ENV_NAMESPACE: &str = "CONDUCTOR_NAMESPACE";
pub const ENV_CONFIG_URL: &str = "CONDUCTOR_CONFIG_URL";
pub const ENV_CONFIG_KEY: &str = "CONDUCTOR_CONFIG_KEY";
pub const ENV_CONFIG_PATH: &str = "CONDUCTOR_CONFIG_PATH";
pub const ENV_APPLICATION_ID: &str = "CONDUCTOR_APPLICATION_ID";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_SHUTDOWN_GRACE_SECS: &str = "CONDUCTOR_SHUTDOWN_GRACE_SECS";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory backend base URL; unset means the no-op registry
    pub registry_url: Option<String>,
    /// Directory/config namespace
    pub namespace: String,
    /// Remote config backend base URL; unset means the file store
    pub config_url: Option<String>,
    /// Key of this process' config document in the remote store
    pub config_key: String,
    /// Path of the local config document
    pub config_path: String,
    /// Stable application id; unset means a random one per process
    pub application_id: Option<String>,
    pub log_level: String,
    /// Per-service shutdown grace period
    pub shutdown_grace_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: None,
            namespace: "public".to_string(),
            config_url: None,
            config_key: "conductor_config".to_string(),
            config_path: "config.json".to_string(),
            application_id: None,
            log_level: "info".to_string(),
            shutdown_grace_secs: 5,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let registry_url = std::env::var(ENV_REGISTRY_URL).ok();

    let namespace = std::env::var(ENV_NAMESPACE).unwrap_or_else(|_| "public".to_string());

    let config_url = std::env::var(ENV_CONFIG_URL).ok();

    let config_key =
        std::env::var(ENV_CONFIG_KEY).unwrap_or_else(|_| "conductor_config".to_string());

    let config_path =
        std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| "config.json".to_string());

    let application_id = std::env::var(ENV_APPLICATION_ID).ok();

    let log_level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string());

    let shutdown_grace_secs = std::env::var(ENV_SHUTDOWN_GRACE_SECS)
        .unwrap_or_else(|_| "5".to_string())
        .parse()
        .unwrap_or(5);

    Ok(Config {
        registry_url,
        namespace,
        config_url,
        config_key,
        config_path,
        application_id,
        log_level,
        shutdown_grace_secs,
    })
}

/// Install the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(cfg: &Config) {
    let level = match cfg.log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert!(cfg.registry_url.is_none());
        assert_eq!(cfg.namespace, "public");
        assert_eq!(cfg.config_key, "conductor_config");
        assert_eq!(cfg.shutdown_grace_secs, 5);
    }

    #[test]
    fn test_load_config_defaults() {
        // Vars no other test touches, so parallel test runs cannot race
        std::env::remove_var(ENV_NAMESPACE);
        std::env::remove_var(ENV_CONFIG_KEY);
        std::env::remove_var(ENV_CONFIG_PATH);

        let cfg = load_config().unwrap();
        assert_eq!(cfg.namespace, "public");
        assert_eq!(cfg.config_key, "conductor_config");
        assert_eq!(cfg.config_path, "config.json");
    }

    #[test]
    fn test_load_config_with_registry_url() {
        std::env::set_var(ENV_REGISTRY_URL, "http://directory:8500");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.registry_url, Some("http://directory:8500".to_string()));
        std::env::remove_var(ENV_REGISTRY_URL);
    }

    #[test]
    fn test_load_config_with_application_id() {
        std::env::set_var(ENV_APPLICATION_ID, "billing-7");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.application_id, Some("billing-7".to_string()));
        std::env::remove_var(ENV_APPLICATION_ID);
    }

    #[test]
    fn test_load_config_grace_period_and_parse_fallback() {
        std::env::set_var(ENV_SHUTDOWN_GRACE_SECS, "9");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.shutdown_grace_secs, 9);

        std::env::set_var(ENV_SHUTDOWN_GRACE_SECS, "not_a_number");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.shutdown_grace_secs, 5); // default
        std::env::remove_var(ENV_SHUTDOWN_GRACE_SECS);
    }

    #[test]
    fn test_config_clone() {
        let cfg = Config::default();
        let cloned = cfg.clone();
        assert_eq!(cfg.namespace, cloned.namespace);
        assert_eq!(cfg.config_path, cloned.config_path);
    }
}
