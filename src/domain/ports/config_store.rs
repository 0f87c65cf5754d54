//! Config Store Port
//!
//! Abstract access to the configuration document backing this process:
//! a local file, or a remote config service.

use async_trait::async_trait;

/// A single configuration document that can be read, replaced or removed.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the document. `None` when it does not exist.
    async fn get(&self) -> anyhow::Result<Option<serde_json::Value>>;

    /// Replace the document.
    async fn set(&self, value: &serde_json::Value) -> anyhow::Result<()>;

    /// Remove the document. Removing a missing document is not an error.
    async fn remove(&self) -> anyhow::Result<()>;
}
