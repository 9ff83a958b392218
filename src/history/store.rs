// ABOUTME: HistoryStore trait and its error type.
// ABOUTME: Any backend that can pull the full log and append one state qualifies.

use async_trait::async_trait;

use super::state::DeploymentState;
use crate::types::Revision;

/// Errors from history backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the request.
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    /// Persisted history exists but cannot be decoded.
    #[error("history store data is corrupt: {0}")]
    Corrupt(String),

    /// Another writer changed the log while this one was appending.
    #[error("concurrent history write detected: {0}")]
    WriteConflict(String),

    /// The encoded log is larger than the backend will accept.
    #[error("history store is full: {0}")]
    CapacityExceeded(String),
}

/// Append-only log of deployment states for one (cluster, service) key.
///
/// Implementations are bound to their key at construction.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Read every recorded state, oldest first. No history is an empty vec.
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError>;

    /// Append one state to the end of the log.
    async fn push_state(&self, revision: Revision, message: &str) -> Result<(), StoreError>;
}

/// Decode a persisted log. Blank input is an empty log.
pub(crate) fn decode_states(raw: &str) -> Result<Vec<DeploymentState>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

pub(crate) fn encode_states(states: &[DeploymentState]) -> Result<String, StoreError> {
    serde_json::to_string(states)
        .map_err(|e| StoreError::Unavailable(format!("failed to encode history: {}", e)))
}
