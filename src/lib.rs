//! conductor - Service Lifecycle Runtime Substrate
//!
//! Hosts several independently-addressable services in one process: they
//! start concurrently, register with an external directory, and shut down
//! together when one fails or the process is told to stop. Outbound
//! connections to downstream peers are reused through bounded pools.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{HttpService, NoopService, ServiceParams, TcpService};
pub use adapters::outbound::{
    config_store_from, FileConfigStore, HttpConfigStore, HttpRegistry, NoopRegistry,
};
pub use application::{AuxTask, Orchestrator, RunError};
pub use config::{init_tracing, load_config, Config};
pub use domain::entities::ServiceInstance;
pub use domain::ports::{ConfigStore, Service, ServiceRegistry};
pub use domain::value_objects::{DiscoveryAddress, ServiceGroup};
pub use infrastructure::{
    Pool, PoolError, PoolOptions, PoolSet, PooledConnection, ShutdownController,
};
