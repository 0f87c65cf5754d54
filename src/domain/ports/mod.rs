mod config_store;
mod service;
mod service_registry;

pub use config_store::ConfigStore;
pub use service::{Service, DEFAULT_WEIGHT};
pub use service_registry::ServiceRegistry;
