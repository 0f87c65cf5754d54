//! Domain Entities - Core business objects
//!
//! The directory-side view of a hosted service: what gets registered,
//! listed and deregistered.

use crate::domain::ports::Service;
use crate::domain::value_objects::ServiceGroup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One live instance of a service as the directory sees it.
///
/// Built from a service's descriptor at registration time and rebuilt on
/// every directory query; never cached inside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Service name, unique within a directory namespace
    pub name: String,
    /// Directory group the instance is filed under
    pub group: ServiceGroup,
    /// Reachable host (never a wildcard)
    pub host: String,
    /// Port peers connect to; 0 for port-less services
    pub port: u16,
    /// Load-balancing hint
    pub weight: u32,
    /// Free-form instance metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// Snapshot a service's descriptor into an instance record.
    pub fn from_service(svc: &dyn Service) -> Self {
        let addr = svc.discovery();
        Self {
            name: svc.name().to_string(),
            group: svc.group(),
            host: addr.host,
            port: addr.port,
            weight: svc.weight(),
            metadata: svc.metadata(),
        }
    }

    /// The instance's dialable `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_address() {
        let instance = ServiceInstance {
            name: "orders".to_string(),
            group: ServiceGroup::Web,
            host: "10.0.0.7".to_string(),
            port: 8080,
            weight: 50,
            metadata: HashMap::new(),
        };
        assert_eq!(instance.address(), "10.0.0.7:8080");
    }

    #[test]
    fn test_instance_serde_roundtrip() {
        let mut metadata = HashMap::new();
        metadata.insert("zone".to_string(), "b".to_string());
        let instance = ServiceInstance {
            name: "orders".to_string(),
            group: ServiceGroup::Rpc,
            host: "10.0.0.7".to_string(),
            port: 9000,
            weight: 80,
            metadata,
        };

        let json = serde_json::to_string(&instance).unwrap();
        let back: ServiceInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "orders");
        assert_eq!(back.group, ServiceGroup::Rpc);
        assert_eq!(back.weight, 80);
        assert_eq!(back.metadata.get("zone").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_instance_metadata_defaults_empty() {
        let json = r#"{"name":"a","group":"DEFAULT_GROUP","host":"h","port":1,"weight":50}"#;
        let instance: ServiceInstance = serde_json::from_str(json).unwrap();
        assert!(instance.metadata.is_empty());
    }
}
