//! Service Construction Parameters
//!
//! Shared knobs for the built-in service adapters: discovery IP override,
//! weight, metadata, health-check route.

use crate::domain::ports::DEFAULT_WEIGHT;
use std::collections::HashMap;

/// Default health-check route for HTTP services.
pub const DEFAULT_HEALTHZ_PATH: &str = "/healthz";

/// Optional settings applied when constructing a service adapter.
#[derive(Debug, Clone)]
pub struct ServiceParams {
    /// Advertise this IP to the directory instead of deriving one from
    /// the listen address
    pub discovery_ip: Option<String>,
    /// Load-balancing hint
    pub weight: u32,
    /// Free-form instance metadata
    pub metadata: HashMap<String, String>,
    /// Health-check route for HTTP services; `None` disables it
    pub health_check_path: Option<String>,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            discovery_ip: None,
            weight: DEFAULT_WEIGHT,
            metadata: HashMap::new(),
            health_check_path: Some(DEFAULT_HEALTHZ_PATH.to_string()),
        }
    }
}

impl ServiceParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the IP advertised to the directory.
    pub fn with_discovery_ip(mut self, ip: impl Into<String>) -> Self {
        self.discovery_ip = Some(ip.into());
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Serve the health check on a custom route.
    pub fn with_health_check(mut self, path: impl Into<String>) -> Self {
        self.health_check_path = Some(path.into());
        self
    }

    pub fn without_health_check(mut self) -> Self {
        self.health_check_path = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = ServiceParams::default();
        assert_eq!(params.weight, DEFAULT_WEIGHT);
        assert!(params.discovery_ip.is_none());
        assert_eq!(
            params.health_check_path.as_deref(),
            Some(DEFAULT_HEALTHZ_PATH)
        );
    }

    #[test]
    fn test_params_builder() {
        let mut metadata = HashMap::new();
        metadata.insert("zone".to_string(), "a".to_string());

        let params = ServiceParams::new()
            .with_discovery_ip("10.0.0.9")
            .with_weight(80)
            .with_metadata(metadata)
            .with_health_check("/status");

        assert_eq!(params.discovery_ip.as_deref(), Some("10.0.0.9"));
        assert_eq!(params.weight, 80);
        assert_eq!(params.metadata.get("zone").map(String::as_str), Some("a"));
        assert_eq!(params.health_check_path.as_deref(), Some("/status"));
    }

    #[test]
    fn test_params_without_health_check() {
        let params = ServiceParams::new().without_health_check();
        assert!(params.health_check_path.is_none());
    }
}
