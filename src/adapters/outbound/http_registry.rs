//! HTTP Service Registry
//!
//! Directory backend over a plain HTTP+JSON API. Registration and lookup
//! are single requests; retry and backoff policy belong to the backend,
//! not to this adapter.

use crate::domain::entities::ServiceInstance;
use crate::domain::ports::{Service, ServiceRegistry};
use crate::domain::value_objects::ServiceGroup;
use async_trait::async_trait;
use serde::Deserialize;

/// Instance list response from the directory.
#[derive(Debug, Deserialize)]
struct InstancesResponse {
    instances: Vec<ServiceInstance>,
    #[allow(dead_code)]
    total: usize,
}

/// HTTP-backed service registry.
pub struct HttpRegistry {
    base_url: String,
    namespace: String,
    client: reqwest::Client,
}

impl HttpRegistry {
    /// Create a registry client against a directory base URL
    /// (e.g., "http://directory:8500") and namespace.
    pub fn new(base_url: impl Into<String>, namespace: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: namespace.into(),
            client: reqwest::Client::new(),
        }
    }

    fn instances_url(&self) -> String {
        format!("{}/v1/instances", self.base_url)
    }
}

#[async_trait]
impl ServiceRegistry for HttpRegistry {
    async fn register(&self, svc: &dyn Service) -> anyhow::Result<()> {
        let instance = ServiceInstance::from_service(svc);
        let response = self
            .client
            .put(self.instances_url())
            .query(&[("namespace", self.namespace.as_str())])
            .json(&instance)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("register {} failed: {} - {}", instance.name, status, body);
        }

        tracing::debug!(
            "registered service name={} addr={}",
            instance.name,
            instance.address()
        );
        Ok(())
    }

    async fn deregister(&self, svc: &dyn Service) -> anyhow::Result<()> {
        let instance = ServiceInstance::from_service(svc);
        let response = self
            .client
            .delete(self.instances_url())
            .query(&[
                ("namespace", self.namespace.as_str()),
                ("service", instance.name.as_str()),
                ("group", instance.group.as_str()),
                ("host", instance.host.as_str()),
            ])
            .query(&[("port", instance.port)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("deregister {} failed: {} - {}", instance.name, status, body);
        }

        tracing::debug!("deregistered service name={}", instance.name);
        Ok(())
    }

    async fn service_instances(
        &self,
        name: &str,
        group: &ServiceGroup,
    ) -> anyhow::Result<Vec<ServiceInstance>> {
        let response = self
            .client
            .get(self.instances_url())
            .query(&[
                ("namespace", self.namespace.as_str()),
                ("service", name),
                ("group", group.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("instance query for {} failed: {} - {}", name, status, body);
        }

        let data: InstancesResponse = response.json().await?;
        Ok(data.instances)
    }
}
