//! TCP Service Adapter
//!
//! Accept-loop service: each accepted connection is handed to the
//! caller-supplied handler on its own task. The loop unwinds when the
//! orchestrator asks for shutdown.

use crate::adapters::inbound::params::ServiceParams;
use crate::domain::ports::Service;
use crate::domain::value_objects::{DiscoveryAddress, ServiceGroup};
use crate::infrastructure::net::{split_listen_addr, ResolveError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

type BoxConnFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type ConnHandler = Arc<dyn Fn(TcpStream, SocketAddr) -> BoxConnFuture + Send + Sync>;

/// A raw TCP service driven by a per-connection handler.
pub struct TcpService {
    name: String,
    listen: String,
    discovery: DiscoveryAddress,
    params: ServiceParams,
    handler: ConnHandler,
    stop: Arc<Notify>,
}

impl TcpService {
    /// Create a TCP service from a listen address and a connection
    /// handler.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        listen: impl Into<String>,
        handler: F,
        params: ServiceParams,
    ) -> Result<Self, ResolveError>
    where
        F: Fn(TcpStream, SocketAddr) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listen = listen.into();
        let (host, port) = split_listen_addr(&listen, params.discovery_ip.as_deref())?;
        let handler: ConnHandler = Arc::new(move |stream, addr| Box::pin(handler(stream, addr)));
        Ok(Self {
            name: name.into(),
            listen,
            discovery: DiscoveryAddress::new(host, port),
            params,
            handler,
            stop: Arc::new(Notify::new()),
        })
    }
}

#[async_trait]
impl Service for TcpService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.listen).await?;
        tracing::info!("tcp service {} listening on {}", self.name, self.listen);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            let handler = self.handler.clone();
                            tokio::spawn(async move { handler(stream, addr).await });
                        }
                        Err(e) => tracing::error!("accept error on {}: {:?}", self.listen, e),
                    }
                }
                _ = self.stop.notified() => {
                    tracing::info!("tcp service {} stopped", self.name);
                    return Ok(());
                }
            }
        }
    }

    fn discovery(&self) -> DiscoveryAddress {
        self.discovery.clone()
    }

    fn group(&self) -> ServiceGroup {
        ServiceGroup::TcpServer
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
