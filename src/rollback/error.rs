// ABOUTME: Error types for rollback operations.
// ABOUTME: Every failure is tagged with the step it happened in plus the cluster and service.

use std::fmt;
use std::time::Duration;

use crate::history::StoreError;
use crate::orchestrator::{OrchestratorError, ServiceStatus};
use crate::types::Revision;

/// Rollback steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ValidateInput,
    LoadHistory,
    SnapshotService,
    ResolveTargetRevision,
    ReadTargetTaskDefinition,
    ApplyUpdate,
    AwaitStable,
    RecordHistory,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::ValidateInput => "validate-input",
            Step::LoadHistory => "load-history",
            Step::SnapshotService => "snapshot-service",
            Step::ResolveTargetRevision => "resolve-target-revision",
            Step::ReadTargetTaskDefinition => "read-target-task-definition",
            Step::ApplyUpdate => "apply-update",
            Step::AwaitStable => "await-stable",
            Step::RecordHistory => "record-history",
        }
    }

    /// Whether the live service may already have been changed when this step fails.
    pub fn after_mutation(self) -> bool {
        matches!(self, Step::AwaitStable | Step::RecordHistory)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that stop a rollback.
#[derive(Debug, thiserror::Error)]
pub enum RollbackError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("history store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("history store data is corrupt: {0}")]
    StoreCorrupt(String),

    #[error("concurrent history write detected: {0}")]
    StoreWriteConflict(String),

    /// Fewer than two states recorded.
    #[error("no previous state to roll back to (history has {found} entries)")]
    NoHistory { found: usize },

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("{service} is currently deploying ({deployments} deployments in flight)")]
    DeploymentInProgress { service: String, deployments: usize },

    #[error("cannot resolve target revision: {0}")]
    RevisionResolution(String),

    #[error("task definition not found: {0}")]
    TaskDefinitionNotFound(String),

    #[error("service update rejected: {0}")]
    UpdateRejected(String),

    /// The service was updated but did not settle in time. It is left as is.
    #[error("service did not stabilize within {}s{}", .waited.as_secs(), describe_last(.last))]
    StabilizationTimeout {
        waited: Duration,
        last: Option<ServiceStatus>,
    },

    /// The service is on the target revision but the log does not say so.
    #[error(
        "service was rolled back to revision {revision} but history was not recorded: {source}"
    )]
    HistoryRecordFailed {
        revision: Revision,
        #[source]
        source: StoreError,
    },

    #[error("orchestrator unavailable: {0}")]
    OrchestratorUnavailable(String),
}

fn describe_last(last: &Option<ServiceStatus>) -> String {
    match last {
        Some(s) => format!(
            " (deployments: {}, running: {}/{})",
            s.deployments, s.running_count, s.desired_count
        ),
        None => String::new(),
    }
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackErrorKind {
    InvalidArgument,
    ConfigurationMissing,
    StoreUnavailable,
    StoreCorrupt,
    StoreWriteConflict,
    NoHistory,
    ServiceNotFound,
    DeploymentInProgress,
    RevisionResolution,
    TaskDefinitionNotFound,
    UpdateRejected,
    StabilizationTimeout,
    HistoryRecordFailed,
    OrchestratorUnavailable,
}

impl RollbackError {
    pub fn kind(&self) -> RollbackErrorKind {
        match self {
            RollbackError::InvalidArgument(_) => RollbackErrorKind::InvalidArgument,
            RollbackError::ConfigurationMissing(_) => RollbackErrorKind::ConfigurationMissing,
            RollbackError::StoreUnavailable(_) => RollbackErrorKind::StoreUnavailable,
            RollbackError::StoreCorrupt(_) => RollbackErrorKind::StoreCorrupt,
            RollbackError::StoreWriteConflict(_) => RollbackErrorKind::StoreWriteConflict,
            RollbackError::NoHistory { .. } => RollbackErrorKind::NoHistory,
            RollbackError::ServiceNotFound(_) => RollbackErrorKind::ServiceNotFound,
            RollbackError::DeploymentInProgress { .. } => RollbackErrorKind::DeploymentInProgress,
            RollbackError::RevisionResolution(_) => RollbackErrorKind::RevisionResolution,
            RollbackError::TaskDefinitionNotFound(_) => RollbackErrorKind::TaskDefinitionNotFound,
            RollbackError::UpdateRejected(_) => RollbackErrorKind::UpdateRejected,
            RollbackError::StabilizationTimeout { .. } => RollbackErrorKind::StabilizationTimeout,
            RollbackError::HistoryRecordFailed { .. } => RollbackErrorKind::HistoryRecordFailed,
            RollbackError::OrchestratorUnavailable(_) => {
                RollbackErrorKind::OrchestratorUnavailable
            }
        }
    }
}

impl From<StoreError> for RollbackError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RollbackError::StoreUnavailable(msg),
            StoreError::Corrupt(msg) => RollbackError::StoreCorrupt(msg),
            StoreError::WriteConflict(msg) => RollbackError::StoreWriteConflict(msg),
            StoreError::CapacityExceeded(msg) => {
                RollbackError::StoreUnavailable(format!("capacity exceeded: {msg}"))
            }
        }
    }
}

impl From<OrchestratorError> for RollbackError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::ServiceNotFound { .. } => {
                RollbackError::ServiceNotFound(err.to_string())
            }
            OrchestratorError::TaskDefinitionNotFound { reference } => {
                RollbackError::TaskDefinitionNotFound(reference)
            }
            OrchestratorError::UpdateRejected { message } => RollbackError::UpdateRejected(message),
            OrchestratorError::Api { message } => RollbackError::OrchestratorUnavailable(message),
        }
    }
}

/// A rollback that stopped, with where and on what it stopped.
#[derive(Debug, thiserror::Error)]
#[error("rollback of service '{service}' in cluster '{cluster}' failed at {step}: {error}")]
pub struct RollbackFailure {
    pub cluster: String,
    pub service: String,
    pub step: Step,
    #[source]
    pub error: RollbackError,
}

impl RollbackFailure {
    pub fn kind(&self) -> RollbackErrorKind {
        self.error.kind()
    }
}
