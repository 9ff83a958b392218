// ABOUTME: State transition methods for rollback orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::time::Duration;

use crate::history::{History, HistoryStore};
use crate::orchestrator::{ServiceOps, ServiceStatus};
use crate::types::TaskDefinitionRef;

use super::error::{RollbackError, RollbackFailure, Step};
use super::machine::Rollback;
use super::state::{
    HistoryLoaded, Recorded, RevisionPair, RollbackSummary, ServiceSnapshotted, Stable,
    TargetLoaded, TargetResolved, Updated, Validated,
};
use super::wait::{StabilityPolicy, WaitError, wait_until_stable};

// =============================================================================
// Validated -> HistoryLoaded
// =============================================================================

impl Rollback<Validated> {
    /// Read the full history and pick out the current and previous states.
    ///
    /// # Errors
    ///
    /// `NoHistory` with fewer than two entries; store errors as reported.
    #[must_use = "rollback state must be used"]
    pub async fn load_history<H: HistoryStore + ?Sized>(
        self,
        store: &H,
    ) -> Result<Rollback<HistoryLoaded>, RollbackFailure> {
        let history = History::new(
            store
                .pull()
                .await
                .map_err(|e| self.fail(Step::LoadHistory, e))?,
        );

        let (Some(current), Some(previous)) = (history.current(), history.previous()) else {
            return Err(self.fail(
                Step::LoadHistory,
                RollbackError::NoHistory {
                    found: history.len(),
                },
            ));
        };

        let pair = RevisionPair {
            current: current.clone(),
            previous: previous.clone(),
            history_len: history.len(),
        };
        tracing::debug!(
            current = %pair.current.revision,
            previous = %pair.previous.revision,
            entries = pair.history_len,
            "loaded history"
        );

        Ok(Rollback {
            target: self.target,
            state: HistoryLoaded { pair },
        })
    }
}

// =============================================================================
// HistoryLoaded -> ServiceSnapshotted
// =============================================================================

impl Rollback<HistoryLoaded> {
    /// Read the live service and refuse to race an in-flight deployment.
    ///
    /// The deployment check is point-in-time only; nothing holds the service
    /// between here and `apply_update()`.
    ///
    /// # Errors
    ///
    /// `ServiceNotFound`, or `DeploymentInProgress` with more than one deployment.
    #[must_use = "rollback state must be used"]
    pub async fn snapshot_service<O: ServiceOps + ?Sized>(
        self,
        ops: &O,
    ) -> Result<Rollback<ServiceSnapshotted>, RollbackFailure> {
        let snapshot = ops
            .describe_service(self.cluster().as_str(), self.service().as_str())
            .await
            .map_err(|e| self.fail(Step::SnapshotService, e))?;

        if snapshot.deployments > 1 {
            return Err(self.fail(
                Step::SnapshotService,
                RollbackError::DeploymentInProgress {
                    service: self.service().to_string(),
                    deployments: snapshot.deployments,
                },
            ));
        }

        let Rollback {
            target,
            state: HistoryLoaded { pair },
        } = self;
        Ok(Rollback {
            target,
            state: ServiceSnapshotted { pair, snapshot },
        })
    }
}

// =============================================================================
// ServiceSnapshotted -> TargetResolved
// =============================================================================

impl Rollback<ServiceSnapshotted> {
    /// Swap the revision of the service's current task definition for the previous one.
    ///
    /// # Errors
    ///
    /// `RevisionResolution` if the live reference cannot be parsed.
    pub fn resolve_target(self) -> Result<Rollback<TargetResolved>, RollbackFailure> {
        let live = &self.state.snapshot.task_definition;
        let current = TaskDefinitionRef::parse(live).map_err(|e| {
            self.fail(
                Step::ResolveTargetRevision,
                RollbackError::RevisionResolution(format!(
                    "service task definition '{}': {}",
                    live, e
                )),
            )
        })?;

        let Rollback {
            target: rollback_target,
            state: ServiceSnapshotted { pair, snapshot },
        } = self;

        if current.revision() != pair.current.revision {
            tracing::warn!(
                live = %current.revision(),
                recorded = %pair.current.revision,
                "live revision differs from recorded history"
            );
        }

        let target = current.with_revision(pair.previous.revision);
        tracing::debug!(from = %current, to = %target, "resolved rollback target");

        Ok(Rollback {
            target: rollback_target,
            state: TargetResolved {
                pair,
                snapshot,
                target,
            },
        })
    }
}

// =============================================================================
// TargetResolved -> TargetLoaded
// =============================================================================

impl Rollback<TargetResolved> {
    /// Fetch the target task definition.
    ///
    /// # Errors
    ///
    /// `TaskDefinitionNotFound` when the revision does not exist.
    #[must_use = "rollback state must be used"]
    pub async fn read_target<O: ServiceOps + ?Sized>(
        self,
        ops: &O,
    ) -> Result<Rollback<TargetLoaded>, RollbackFailure> {
        let reference = self.state.target.to_string();
        let task_definition = ops
            .describe_task_definition(&reference)
            .await
            .map_err(|e| self.fail(Step::ReadTargetTaskDefinition, e))?;

        let Rollback {
            target,
            state: TargetResolved { pair, snapshot, .. },
        } = self;
        Ok(Rollback {
            target,
            state: TargetLoaded {
                pair,
                snapshot,
                task_definition,
            },
        })
    }
}

// =============================================================================
// TargetLoaded -> Updated
// =============================================================================

impl Rollback<TargetLoaded> {
    /// Point the service at the target task definition. Nothing else changes.
    ///
    /// # Errors
    ///
    /// `UpdateRejected` if the orchestrator refuses; never retried.
    #[must_use = "rollback state must be used"]
    pub async fn apply_update<O: ServiceOps + ?Sized>(
        self,
        ops: &O,
    ) -> Result<Rollback<Updated>, RollbackFailure> {
        let updated = ops
            .update_service(&self.state.snapshot, &self.state.task_definition)
            .await
            .map_err(|e| self.fail(Step::ApplyUpdate, e))?;

        tracing::info!(
            cluster = %updated.cluster,
            service = %updated.service,
            task_definition = %self.state.task_definition.arn,
            "service update accepted"
        );

        let Rollback {
            target,
            state:
                TargetLoaded {
                    pair,
                    task_definition,
                    ..
                },
        } = self;
        Ok(Rollback {
            target,
            state: Updated {
                pair,
                task_definition,
            },
        })
    }
}

// =============================================================================
// Updated -> Stable
// =============================================================================

impl Rollback<Updated> {
    /// Wait for the service to converge on the new task definition.
    ///
    /// A timeout leaves the service as it is; the update is not reverted.
    ///
    /// # Errors
    ///
    /// `StabilizationTimeout` when the budget runs out; orchestrator errors end the wait.
    #[must_use = "rollback state must be used"]
    pub async fn await_stable<O, F>(
        self,
        ops: &O,
        policy: &StabilityPolicy,
        on_poll: F,
    ) -> Result<Rollback<Stable>, RollbackFailure>
    where
        O: ServiceOps + ?Sized,
        F: FnMut(&ServiceStatus, Duration),
    {
        let result = wait_until_stable(
            ops,
            self.cluster().as_str(),
            self.service().as_str(),
            policy,
            on_poll,
        )
        .await;

        let (status, waited) = match result {
            Ok(done) => done,
            Err(WaitError::TimedOut { waited, last }) => {
                return Err(self.fail(
                    Step::AwaitStable,
                    RollbackError::StabilizationTimeout { waited, last },
                ));
            }
            Err(WaitError::Orchestrator(e)) => return Err(self.fail(Step::AwaitStable, e)),
        };

        let Rollback {
            target,
            state:
                Updated {
                    pair,
                    task_definition,
                },
        } = self;
        Ok(Rollback {
            target,
            state: Stable {
                pair,
                task_definition,
                status,
                waited,
            },
        })
    }
}

// =============================================================================
// Stable -> Recorded
// =============================================================================

impl Rollback<Stable> {
    /// Append the rollback to history as a new entry for the previous revision.
    ///
    /// # Errors
    ///
    /// `HistoryRecordFailed`: the service is already rolled back, only the log is behind.
    #[must_use = "rollback state must be used"]
    pub async fn record_history<H: HistoryStore + ?Sized>(
        self,
        store: &H,
    ) -> Result<Rollback<Recorded>, RollbackFailure> {
        let revision = self.state.pair.previous.revision;
        let message = self.state.pair.message();

        store.push_state(revision, &message).await.map_err(|source| {
            self.fail(
                Step::RecordHistory,
                RollbackError::HistoryRecordFailed { revision, source },
            )
        })?;

        let Rollback {
            target,
            state:
                Stable {
                    pair,
                    task_definition,
                    status,
                    waited,
                },
        } = self;

        let summary = RollbackSummary {
            cluster: target.cluster.to_string(),
            service: target.service.to_string(),
            from: pair.current.revision,
            to: pair.previous.revision,
            task_definition: task_definition.arn,
            status,
            waited,
            history_len: pair.history_len + 1,
        };
        Ok(Rollback {
            target,
            state: Recorded { summary },
        })
    }
}
