mod http_service;
mod noop_service;
mod params;
mod tcp_service;

pub use http_service::HttpService;
pub use noop_service::NoopService;
pub use params::{ServiceParams, DEFAULT_HEALTHZ_PATH};
pub use tcp_service::TcpService;
