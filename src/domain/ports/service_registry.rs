//! Service Registry Port
//!
//! Defines the interface to the external service directory.
//! Implementations may talk to a real directory backend over HTTP or
//! stand in with a no-op stub. Retry and backoff policy belong to the
//! backend, not to callers of this port.

use crate::domain::entities::ServiceInstance;
use crate::domain::ports::Service;
use crate::domain::value_objects::ServiceGroup;
use async_trait::async_trait;

/// Directory of live service instances.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Record a service instance as live.
    async fn register(&self, svc: &dyn Service) -> anyhow::Result<()>;

    /// Remove a service instance from the directory.
    async fn deregister(&self, svc: &dyn Service) -> anyhow::Result<()>;

    /// List the live instances of a service, filtered by group.
    ///
    /// Results are rebuilt on every query; nothing is cached here.
    async fn service_instances(
        &self,
        name: &str,
        group: &ServiceGroup,
    ) -> anyhow::Result<Vec<ServiceInstance>>;
}
