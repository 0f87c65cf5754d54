//! Domain Layer
//!
//! Core concepts of the service runtime: instance records, discovery
//! addresses, and the ports the orchestrator and its adapters plug into.

pub mod entities;
pub mod ports;
pub mod value_objects;

pub use entities::ServiceInstance;
pub use ports::{ConfigStore, Service, ServiceRegistry};
pub use value_objects::{DiscoveryAddress, ServiceGroup};
