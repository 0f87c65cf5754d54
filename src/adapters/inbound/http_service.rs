//! HTTP Service Adapter
//!
//! Hosts an axum router as a managed service: health-check route, request
//! tracing, graceful shutdown wired to the orchestrator.

use crate::adapters::inbound::params::ServiceParams;
use crate::domain::ports::Service;
use crate::domain::value_objects::{DiscoveryAddress, ServiceGroup};
use crate::infrastructure::net::{split_listen_addr, ResolveError};
use async_trait::async_trait;
use axum::{routing::get, Router};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;

/// An HTTP service built on axum.
pub struct HttpService {
    name: String,
    listen: String,
    discovery: DiscoveryAddress,
    params: ServiceParams,
    router: Router,
    stop: Arc<Notify>,
}

impl HttpService {
    /// Create an HTTP service from a listen address and a router.
    ///
    /// The discovery address is derived from the listen address at
    /// construction time; a wildcard host resolves to the outbound-facing
    /// IP, and failing to resolve is a construction error.
    pub fn new(
        name: impl Into<String>,
        listen: impl Into<String>,
        router: Router,
        params: ServiceParams,
    ) -> Result<Self, ResolveError> {
        let listen = listen.into();
        let (host, port) = split_listen_addr(&listen, params.discovery_ip.as_deref())?;
        Ok(Self {
            name: name.into(),
            listen,
            discovery: DiscoveryAddress::new(host, port),
            params,
            router,
            stop: Arc::new(Notify::new()),
        })
    }
}

#[async_trait]
impl Service for HttpService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> anyhow::Result<()> {
        let mut app = self.router.clone();
        if let Some(path) = &self.params.health_check_path {
            app = app.route(path.as_str(), get(healthz));
        }
        let app = app.layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&self.listen).await?;
        tracing::info!("http service {} listening on {}", self.name, self.listen);

        let stop = self.stop.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop.notified().await })
            .await?;

        tracing::info!("http service {} stopped", self.name);
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

    async fn shutdown(&self) {
        self.stop.notify_one();
    }
}

async fn healthz() -> &'static str {
    "ok"
}
