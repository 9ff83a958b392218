// ABOUTME: Rollback state types for the type state pattern.
// ABOUTME: Each state carries exactly the data gathered by the steps before it.

use std::time::Duration;

use crate::history::DeploymentState;
use crate::orchestrator::{ServiceSnapshot, ServiceStatus, TaskDefinition};
use crate::types::{Revision, TaskDefinitionRef};

/// The current and previous history entries a rollback moves between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    pub current: DeploymentState,
    pub previous: DeploymentState,
    /// Number of entries in the log when it was read.
    pub history_len: usize,
}

impl RevisionPair {
    /// History message for the entry this rollback appends.
    pub fn message(&self) -> String {
        format!(
            "rollback: {} -> {}",
            self.current.revision, self.previous.revision
        )
    }
}

/// Inputs checked; nothing has been read yet.
/// Available actions: `load_history()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// History read and has a previous state.
/// Available actions: `snapshot_service()`
#[derive(Debug, Clone)]
pub struct HistoryLoaded {
    pub(crate) pair: RevisionPair,
}

/// Live service read; no deployment in flight.
/// Available actions: `resolve_target()`
#[derive(Debug, Clone)]
pub struct ServiceSnapshotted {
    pub(crate) pair: RevisionPair,
    pub(crate) snapshot: ServiceSnapshot,
}

/// Previous revision turned into a concrete reference.
/// Available actions: `read_target()`
#[derive(Debug, Clone)]
pub struct TargetResolved {
    pub(crate) pair: RevisionPair,
    pub(crate) snapshot: ServiceSnapshot,
    pub(crate) target: TaskDefinitionRef,
}

/// Target task definition exists and has been read.
/// Available actions: `apply_update()`
#[derive(Debug, Clone)]
pub struct TargetLoaded {
    pub(crate) pair: RevisionPair,
    pub(crate) snapshot: ServiceSnapshot,
    pub(crate) task_definition: TaskDefinition,
}

/// Service pointed at the target. From here on the live service has changed.
/// Available actions: `await_stable()`
#[derive(Debug, Clone)]
pub struct Updated {
    pub(crate) pair: RevisionPair,
    pub(crate) task_definition: TaskDefinition,
}

/// Orchestrator reports the service settled.
/// Available actions: `record_history()`
#[derive(Debug, Clone)]
pub struct Stable {
    pub(crate) pair: RevisionPair,
    pub(crate) task_definition: TaskDefinition,
    pub(crate) status: ServiceStatus,
    pub(crate) waited: Duration,
}

/// History appended. Terminal.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Recorded {
    pub(crate) summary: RollbackSummary,
}

/// Outcome of a completed rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackSummary {
    pub cluster: String,
    pub service: String,
    pub from: Revision,
    pub to: Revision,
    pub task_definition: String,
    pub status: ServiceStatus,
    pub waited: Duration,
    /// Number of history entries after the rollback was recorded.
    pub history_len: usize,
}
