//! File Config Store
//!
//! Keeps the configuration document as JSON on local disk.

use crate::domain::ports::ConfigStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self) -> anyhow::Result<Option<serde_json::Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn remove(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
