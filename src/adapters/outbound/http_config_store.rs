//! HTTP Config Store
//!
//! Remote configuration document addressed by (key, namespace) over a
//! plain HTTP+JSON API.

use crate::domain::ports::ConfigStore;
use async_trait::async_trait;
use reqwest::StatusCode;

pub struct HttpConfigStore {
    base_url: String,
    key: String,
    namespace: String,
    client: reqwest::Client,
}

impl HttpConfigStore {
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.into(),
            namespace: namespace.into(),
            client: reqwest::Client::new(),
        }
    }

    fn configs_url(&self) -> String {
        format!("{}/v1/configs", self.base_url)
    }

    fn query(&self) -> [(&'static str, &str); 2] {
        [
            ("key", self.key.as_str()),
            ("namespace", self.namespace.as_str()),
        ]
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn get(&self) -> anyhow::Result<Option<serde_json::Value>> {
        let response = self
            .client
            .get(self.configs_url())
            .query(&self.query())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("config fetch for {} failed: {} - {}", self.key, status, body);
        }

        Ok(Some(response.json().await?))
    }

    async fn set(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        let response = self
            .client
            .put(self.configs_url())
            .query(&self.query())
            .json(value)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("config write for {} failed: {} - {}", self.key, status, body);
        }
        Ok(())
    }

    async fn remove(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.configs_url())
            .query(&self.query())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("config remove for {} failed: {} - {}", self.key, status, body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = HttpConfigStore::new("http://config:8600/", "app_config", "public");
        assert_eq!(store.configs_url(), "http://config:8600/v1/configs");
    }
}
