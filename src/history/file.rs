// ABOUTME: File-backed history backend, one JSON document per service.
// ABOUTME: Appends take an exclusive lock file and replace the document atomically via rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use super::key::HistoryKey;
use super::state::DeploymentState;
use super::store::{HistoryStore, StoreError, decode_states, encode_states};
use crate::types::Revision;

/// Default history directory relative to $HOME (XDG state dir).
const STATE_DIR: &str = ".local/state/shipback";

/// Locks older than this are assumed abandoned.
const STALE_LOCK_SECS: i64 = 60 * 60;

/// History stored as `<dir>/<cluster>/<service>.json`.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: &Path, key: &HistoryKey) -> Self {
        Self {
            path: dir.join(key.relative_path()),
        }
    }

    /// `$HOME/.local/state/shipback`, if a home directory is known.
    pub fn default_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(STATE_DIR))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    async fn write_document(&self, states: &[DeploymentState]) -> Result<(), StoreError> {
        let raw = encode_states(states)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, raw)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to write {}: {}", temp.display(), e)))?;

        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            StoreError::Unavailable(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode_states(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Unavailable(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn push_state(&self, revision: Revision, message: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Unavailable(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let _lock = FileLock::acquire(self.lock_path()).await?;

        let mut states = self.pull().await?;
        states.push(DeploymentState::new(revision, message).recorded_now());
        self.write_document(&states).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = states.len(),
            "appended history entry"
        );
        Ok(())
    }
}

/// Information about who holds a history lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

impl LockInfo {
    fn current() -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
        }
    }

    pub fn is_stale(&self) -> bool {
        (Utc::now() - self.started_at).num_seconds() >= STALE_LOCK_SECS
    }
}

/// Exclusive lock file, removed on drop.
#[derive(Debug)]
struct FileLock {
    path: PathBuf,
}

impl FileLock {
    async fn acquire(path: PathBuf) -> Result<Self, StoreError> {
        match Self::try_create(&path).await {
            Ok(lock) => return Ok(lock),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "failed to create lock {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        if !Self::is_abandoned(&path).await {
            let holder = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => serde_json::from_str::<LockInfo>(&raw)
                    .map(|info| format!("held by {} (pid {}) since {}", info.holder, info.pid, info.started_at))
                    .unwrap_or_else(|_| "held by another writer".to_string()),
                Err(_) => "held by another writer".to_string(),
            };
            return Err(StoreError::WriteConflict(format!(
                "{} is {}",
                path.display(),
                holder
            )));
        }

        tracing::warn!("Breaking stale history lock at {}", path.display());
        let _ = tokio::fs::remove_file(&path).await;

        Self::try_create(&path).await.map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => StoreError::WriteConflict(format!(
                "{} was taken by another writer during break",
                path.display()
            )),
            _ => StoreError::Unavailable(format!("failed to create lock {}: {}", path.display(), e)),
        })
    }

    async fn try_create(path: &Path) -> std::io::Result<Self> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let lock = Self {
            path: path.to_path_buf(),
        };
        let info = serde_json::to_vec(&LockInfo::current()).map_err(std::io::Error::other)?;
        file.write_all(&info).await?;
        file.flush().await?;
        Ok(lock)
    }

    /// A lock is abandoned when its recorded start, or failing that its mtime, is stale.
    async fn is_abandoned(path: &Path) -> bool {
        if let Ok(raw) = tokio::fs::read_to_string(path).await
            && let Ok(info) = serde_json::from_str::<LockInfo>(&raw)
        {
            return info.is_stale();
        }

        match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => SystemTime::now()
                .duration_since(modified)
                .map(|age| age.as_secs() >= STALE_LOCK_SECS as u64)
                .unwrap_or(false),
            // Vanished between create and inspect; let the retry decide.
            Err(_) => true,
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to release history lock {}: {}", self.path.display(), e);
        }
    }
}
