//! No-op Service Adapter
//!
//! A presence-only instance: it exposes no port, starts instantly and has
//! nothing to stop. Useful for processes that only consume work (queue
//! workers) but should still appear in the directory.

use crate::adapters::inbound::params::ServiceParams;
use crate::domain::ports::Service;
use crate::domain::value_objects::{DiscoveryAddress, ServiceGroup};
use crate::infrastructure::net::{resolve_outbound_ip, ResolveError};
use async_trait::async_trait;
use std::collections::HashMap;

/// A service with no listener of its own.
pub struct NoopService {
    name: String,
    discovery: DiscoveryAddress,
    params: ServiceParams,
}

impl NoopService {
    /// Create a no-op service.
    ///
    /// The discovery host comes from the params override or from the
    /// outbound-facing IP; the port is always 0.
    pub fn new(name: impl Into<String>, params: ServiceParams) -> Result<Self, ResolveError> {
        let host = match &params.discovery_ip {
            Some(ip) => ip.clone(),
            None => resolve_outbound_ip()?.to_string(),
        };
        Ok(Self {
            name: name.into(),
            discovery: DiscoveryAddress::new(host, 0),
            params,
        })
    }
}

#[async_trait]
impl Service for NoopService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn discovery(&self) -> DiscoveryAddress {
        self.discovery.clone()
    }

    fn group(&self) -> ServiceGroup {
        ServiceGroup::Web
    }

    fn weight(&self) -> u32 {
        self.params.weight
    }

    fn metadata(&self) -> HashMap<String, String> {
        self.params.metadata.clone()
    }

    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_service_contract() {
        let svc = NoopService::new("worker", ServiceParams::new().with_discovery_ip("10.0.0.4"))
            .unwrap();

        assert_eq!(svc.name(), "worker");
        assert_eq!(svc.discovery(), DiscoveryAddress::new("10.0.0.4", 0));
        assert_eq!(svc.group(), ServiceGroup::Web);

        // start returns immediately and shutdown has nothing to do
        svc.start().await.unwrap();
        svc.shutdown().await;
    }

    #[test]
    fn test_noop_service_weight_from_params() {
        let svc = NoopService::new(
            "worker",
            ServiceParams::new().with_discovery_ip("10.0.0.4").with_weight(7),
        )
        .unwrap();
        assert_eq!(svc.weight(), 7);
    }
}
