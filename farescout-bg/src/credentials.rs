//! Credential pass-through for GET_AUTH / SET_AUTH / CLEAR_AUTH
//!
//! Credentials are process-wide, not per session, and live outside the
//! cache. Backend failures are logged and swallowed: readers get empty
//! credentials, writers get an acknowledgement regardless.

use async_trait::async_trait;
use farescout_common::config::{read_toml_file, write_toml_config};
use farescout_common::protocol::CredentialState;
use farescout_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Persisted key/value backend for credential state
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<CredentialState>;
    async fn save(&self, state: &CredentialState) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Credentials persisted as a small TOML file (0600 on Unix)
pub struct TomlCredentialStore {
    path: PathBuf,
}

impl TomlCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for TomlCredentialStore {
    async fn load(&self) -> Result<CredentialState> {
        let path = self.path.clone();
        let state = tokio::task::spawn_blocking(move || read_toml_file::<CredentialState>(&path))
            .await
            .map_err(|e| Error::Internal(format!("Credential read task failed: {}", e)))??;
        Ok(state.unwrap_or_default())
    }

    async fn save(&self, state: &CredentialState) -> Result<()> {
        let path = self.path.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || write_toml_config(&state, &path))
            .await
            .map_err(|e| Error::Internal(format!("Credential write task failed: {}", e)))?
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Credentials held in memory for the life of the process
#[derive(Default)]
pub struct MemoryCredentialStore {
    state: RwLock<CredentialState>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<CredentialState> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &CredentialState) -> Result<()> {
        *self.state.write().await = state.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.state.write().await = CredentialState::default();
        Ok(())
    }
}

/// Best-effort facade over a [`CredentialStore`]
pub struct CredentialService {
    backend: Arc<dyn CredentialStore>,
}

impl CredentialService {
    pub fn new(backend: Arc<dyn CredentialStore>) -> Self {
        Self { backend }
    }

    /// Stored credentials, or empty ones if the backend cannot be read
    pub async fn get(&self) -> CredentialState {
        self.backend.load().await.unwrap_or_else(|e| {
            warn!("Failed to read credentials: {}", e);
            CredentialState::default()
        })
    }

    /// Merge `update` into the stored credentials
    pub async fn set(&self, update: CredentialState) {
        let mut state = match self.backend.load().await {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to read credentials before update: {}", e);
                CredentialState::default()
            }
        };
        state.merge(update);

        match self.backend.save(&state).await {
            Ok(()) => debug!("Credentials updated"),
            Err(e) => warn!("Failed to persist credentials: {}", e),
        }
    }

    pub async fn clear(&self) {
        match self.backend.clear().await {
            Ok(()) => debug!("Credentials cleared"),
            Err(e) => warn!("Failed to clear credentials: {}", e),
        }
    }
}
