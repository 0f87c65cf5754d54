//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Directory group a service instance registers under.
///
/// Groups partition the directory namespace by transport kind so that
/// lookups can filter: web services, RPC services and raw TCP servers
/// are listed separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceGroup {
    /// HTTP services (the directory's default group)
    #[serde(rename = "DEFAULT_GROUP")]
    Web,
    /// RPC services
    #[serde(rename = "GRPC")]
    Rpc,
    /// Raw TCP servers
    #[serde(rename = "TCP_SERVER")]
    TcpServer,
}

impl ServiceGroup {
    /// Parse a group from its directory label.
    pub fn from_str(s: &str) -> Self {
        match s {
            "GRPC" => Self::Rpc,
            "TCP_SERVER" => Self::TcpServer,
            _ => Self::Web, // fallback
        }
    }

    /// The label used in the directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "DEFAULT_GROUP",
            Self::Rpc => "GRPC",
            Self::TcpServer => "TCP_SERVER",
        }
    }
}

impl Default for ServiceGroup {
    fn default() -> Self {
        Self::Web
    }
}

impl std::fmt::Display for ServiceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address at which peers can reach a service instance.
///
/// The host is always concrete: wildcard listen hosts are resolved to an
/// outbound-routable IP before a `DiscoveryAddress` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryAddress {
    /// Reachable host (IP or name)
    pub host: String,
    /// Port number; 0 for services that expose no port
    pub port: u16,
}

impl DiscoveryAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for DiscoveryAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_from_str() {
        assert_eq!(ServiceGroup::from_str("DEFAULT_GROUP"), ServiceGroup::Web);
        assert_eq!(ServiceGroup::from_str("GRPC"), ServiceGroup::Rpc);
        assert_eq!(ServiceGroup::from_str("TCP_SERVER"), ServiceGroup::TcpServer);
    }

    #[test]
    fn test_group_from_str_fallback() {
        let invalid_inputs = vec!["invalid", "web", ""];

        for input in invalid_inputs {
            assert_eq!(
                ServiceGroup::from_str(input),
                ServiceGroup::Web,
                "Fallback failed for input: {}",
                input
            );
        }
    }

    #[test]
    fn test_group_as_str() {
        assert_eq!(ServiceGroup::Web.as_str(), "DEFAULT_GROUP");
        assert_eq!(ServiceGroup::Rpc.as_str(), "GRPC");
        assert_eq!(ServiceGroup::TcpServer.as_str(), "TCP_SERVER");
    }

    #[test]
    fn test_group_roundtrip() {
        let groups = vec![
            ServiceGroup::Web,
            ServiceGroup::Rpc,
            ServiceGroup::TcpServer,
        ];

        for group in groups {
            let parsed = ServiceGroup::from_str(group.as_str());
            assert_eq!(group, parsed);
        }
    }

    #[test]
    fn test_group_display() {
        assert_eq!(format!("{}", ServiceGroup::Rpc), "GRPC");
    }

    #[test]
    fn test_group_default() {
        assert_eq!(ServiceGroup::default(), ServiceGroup::Web);
    }

    #[test]
    fn test_discovery_address_display() {
        let addr = DiscoveryAddress::new("10.1.2.3", 8080);
        assert_eq!(format!("{}", addr), "10.1.2.3:8080");
    }

    #[test]
    fn test_discovery_address_no_port() {
        let addr = DiscoveryAddress::new("10.1.2.3", 0);
        assert_eq!(addr.port, 0);
        assert_eq!(format!("{}", addr), "10.1.2.3:0");
    }

    #[test]
    fn test_discovery_address_equality() {
        assert_eq!(
            DiscoveryAddress::new("h", 1),
            DiscoveryAddress::new("h", 1)
        );
        assert_ne!(
            DiscoveryAddress::new("h", 1),
            DiscoveryAddress::new("h", 2)
        );
    }
}
