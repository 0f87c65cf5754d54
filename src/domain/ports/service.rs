//! Service Port
//!
//! The single capability every hosted service kind implements, whatever
//! its transport. The orchestrator drives services exclusively through
//! this interface and is fully agnostic to kind.

use crate::domain::value_objects::{DiscoveryAddress, ServiceGroup};
use async_trait::async_trait;
use std::collections::HashMap;

/// Default load-balancing weight for a service instance.
pub const DEFAULT_WEIGHT: u32 = 50;

/// A hosted service: something that can be registered with the directory,
/// started, and asked to stop.
#[async_trait]
pub trait Service: Send + Sync {
    /// Service name, unique within a directory namespace.
    fn name(&self) -> &str;

    /// Run the service. Blocks until the service stops or fails.
    ///
    /// Expected to unblock once `shutdown` has been invoked.
    async fn start(&self) -> anyhow::Result<()>;

    /// Address peers use to reach this instance.
    fn discovery(&self) -> DiscoveryAddress;

    /// Directory group this instance registers under.
    fn group(&self) -> ServiceGroup;

    /// Load-balancing hint for the directory.
    fn weight(&self) -> u32 {
        DEFAULT_WEIGHT
    }

    /// Free-form instance metadata, fixed once the service is started.
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Ask the service to stop. Best-effort; the caller bounds the wait.
    async fn shutdown(&self);
}
