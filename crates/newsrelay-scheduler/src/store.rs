//! Persistence of [`PersistedState`] between runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::stats::PersistedState;

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if a saved record exists but cannot be read.
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError>;

    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the record cannot be written.
    async fn save(&self, state: &PersistedState) -> Result<(), PersistenceError>;
}

/// Pretty-printed JSON file, replaced atomically on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl StatsStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let state = serde_json::from_slice(&raw)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Keeps the last saved state in memory. Used for dry runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<PersistedState>>,
    saves: Mutex<u32>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved state.
    #[must_use]
    pub fn saved(&self) -> Option<PersistedState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of completed saves.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        *self
            .saves
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        Ok(self.saved())
    }

    async fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(state.clone());
        *self
            .saves
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
        Ok(())
    }
}
