//! Infrastructure Layer
//!
//! Cross-cutting concerns: outbound connection pooling, shutdown
//! coordination, and discovery-address resolution.

pub mod connection_pool;
pub mod net;
pub mod shutdown;

pub use connection_pool::{Pool, PoolError, PoolOptions, PoolSet, PooledConnection};
pub use net::{resolve_outbound_ip, split_listen_addr, ResolveError};
pub use shutdown::{shutdown_signal, ShutdownController};
