//! No-op Service Registry
//!
//! Stands in for the directory when no backend is configured: logs the
//! calls and reports no instances.

use crate::domain::entities::ServiceInstance;
use crate::domain::ports::{Service, ServiceRegistry};
use crate::domain::value_objects::ServiceGroup;
use async_trait::async_trait;

pub struct NoopRegistry;

impl NoopRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceRegistry for NoopRegistry {
    async fn register(&self, svc: &dyn Service) -> anyhow::Result<()> {
        tracing::debug!(
            "register service name={} addr={} group={} weight={}",
            svc.name(),
            svc.discovery(),
            svc.group(),
            svc.weight()
        );
        Ok(())
    }

    async fn deregister(&self, svc: &dyn Service) -> anyhow::Result<()> {
        tracing::debug!(
            "deregister service name={} addr={} group={}",
            svc.name(),
            svc.discovery(),
            svc.group()
        );
        Ok(())
    }

    async fn service_instances(
        &self,
        _name: &str,
        _group: &ServiceGroup,
    ) -> anyhow::Result<Vec<ServiceInstance>> {
        Ok(Vec::new())
    }
}
