// ABOUTME: In-memory history backend.
// ABOUTME: Reference implementation used by tests and embedding callers.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::state::DeploymentState;
use super::store::{HistoryStore, StoreError};
use crate::types::Revision;

/// History held in process memory. Appends are serialized by a mutex.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    states: Mutex<Vec<DeploymentState>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing log.
    pub fn with_states(states: Vec<DeploymentState>) -> Self {
        Self {
            states: Mutex::new(states),
        }
    }

    /// Copy of the current log, oldest first.
    pub fn snapshot(&self) -> Vec<DeploymentState> {
        self.states.lock().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError> {
        Ok(self.snapshot())
    }

    async fn push_state(&self, revision: Revision, message: &str) -> Result<(), StoreError> {
        self.states
            .lock()
            .push(DeploymentState::new(revision, message).recorded_now());
        Ok(())
    }
}
