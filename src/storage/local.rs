//! Local filesystem state store.
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so an interrupted save leaves the previous snapshot in place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StateMap;
use crate::storage::StateStore;
use crate::utils::log::Logger;

/// JSON file state store.
#[derive(Clone)]
pub struct JsonStateStore {
    path: PathBuf,
    logger: Logger,
}

impl JsonStateStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            path: path.into(),
            logger,
        }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read and decode the state file.
    async fn read_state(&self) -> Result<Option<StateMap>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> StateMap {
        match self.read_state().await {
            Ok(Some(state)) => {
                self.logger.debug(&format!(
                    "Loaded {} section(s) from {}",
                    state.len(),
                    self.path.display()
                ));
                state
            }
            Ok(None) => {
                self.logger.debug(&format!(
                    "No state at {}, starting fresh",
                    self.path.display()
                ));
                StateMap::new()
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "Ignoring unreadable state at {}: {}",
                    self.path.display(),
                    e
                ));
                StateMap::new()
            }
        }
    }

    async fn save(&self, state: &StateMap) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        self.write_bytes(&bytes).await
    }
}
