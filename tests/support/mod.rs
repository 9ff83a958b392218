// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-process fake orchestrator and failing history stores.

use async_trait::async_trait;
use parking_lot::Mutex;
use shipback::history::{DeploymentState, HistoryStore, MemoryHistoryStore, StoreError};
use shipback::notify::Notifier;
use shipback::orchestrator::{OrchestratorError, ServiceOps, ServiceSnapshot, ServiceStatus, TaskDefinition};
use shipback::output::{Output, OutputMode};
use shipback::rollback::{Rollback, RollbackInput, StabilityPolicy, Validated};
use shipback::types::Revision;
use std::collections::{HashMap, VecDeque};
use std::sync::Once;
use std::time::Duration;

pub const FAMILY_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task-definition/app";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("shipback=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn rev(n: u32) -> Revision {
    Revision::new(n).unwrap()
}

#[allow(dead_code)]
pub fn state(n: u32, message: &str) -> DeploymentState {
    DeploymentState::new(rev(n), message)
}

/// `(revision, message)` pairs, ignoring timestamps.
#[allow(dead_code)]
pub fn entries(states: &[DeploymentState]) -> Vec<(u32, String)> {
    states
        .iter()
        .map(|s| (s.revision.get(), s.message.clone()))
        .collect()
}

#[allow(dead_code)]
pub fn task_definition_ref(n: u32) -> String {
    format!("{}:{}", FAMILY_ARN, n)
}

#[allow(dead_code)]
pub fn validated() -> Rollback<Validated> {
    Rollback::validate(&RollbackInput {
        cluster: "prod".to_string(),
        service: "web".to_string(),
        region: Some("us-east-1".to_string()),
    })
    .unwrap()
}

/// Millisecond polling so wait tests finish quickly.
#[allow(dead_code)]
pub fn quick_policy() -> StabilityPolicy {
    StabilityPolicy::new(Duration::from_millis(1), Duration::from_millis(50))
}

#[allow(dead_code)]
pub fn quiet_notifier() -> Notifier {
    Notifier::without_chat(Output::new(OutputMode::Quiet))
}

// =============================================================================
// Fake orchestrator
// =============================================================================

#[derive(Debug)]
struct FakeState {
    snapshot: Option<ServiceSnapshot>,
    task_definitions: HashMap<String, TaskDefinition>,
    statuses: VecDeque<ServiceStatus>,
    never_stable: bool,
    reject_update: Option<String>,
    update_calls: Vec<String>,
    status_calls: usize,
}

/// A single service with scripted behaviour.
#[derive(Debug)]
pub struct FakeOrchestrator {
    inner: Mutex<FakeState>,
}

#[allow(dead_code)]
impl FakeOrchestrator {
    /// Service `web` in cluster `prod`, running `task_definition` with one settled deployment.
    pub fn new(task_definition: &str) -> Self {
        Self {
            inner: Mutex::new(FakeState {
                snapshot: Some(ServiceSnapshot {
                    cluster: "prod".to_string(),
                    service: "web".to_string(),
                    task_definition: task_definition.to_string(),
                    deployments: 1,
                    desired_count: 2,
                    running_count: 2,
                }),
                task_definitions: HashMap::new(),
                statuses: VecDeque::new(),
                never_stable: false,
                reject_update: None,
                update_calls: Vec::new(),
                status_calls: 0,
            }),
        }
    }

    /// Register task definitions for the given revisions of the `app` family.
    pub fn with_revisions(self, revisions: &[u32]) -> Self {
        {
            let mut inner = self.inner.lock();
            for &n in revisions {
                let arn = task_definition_ref(n);
                inner.task_definitions.insert(
                    arn.clone(),
                    TaskDefinition {
                        arn,
                        family: "app".to_string(),
                        revision: rev(n),
                        images: vec![format!("registry.example/app:build-{}", n)],
                    },
                );
            }
        }
        self
    }

    pub fn with_deployments(self, deployments: usize) -> Self {
        if let Some(snapshot) = self.inner.lock().snapshot.as_mut() {
            snapshot.deployments = deployments;
        }
        self
    }

    pub fn without_service(self) -> Self {
        self.inner.lock().snapshot = None;
        self
    }

    /// Statuses returned, in order, before the service reports settled.
    pub fn with_statuses(self, statuses: Vec<ServiceStatus>) -> Self {
        self.inner.lock().statuses = statuses.into();
        self
    }

    pub fn never_stable(self) -> Self {
        self.inner.lock().never_stable = true;
        self
    }

    pub fn rejecting_updates(self, message: &str) -> Self {
        self.inner.lock().reject_update = Some(message.to_string());
        self
    }

    /// Task definition ARNs passed to `update_service`, in call order.
    pub fn update_calls(&self) -> Vec<String> {
        self.inner.lock().update_calls.clone()
    }

    pub fn status_calls(&self) -> usize {
        self.inner.lock().status_calls
    }

    pub fn current_task_definition(&self) -> Option<String> {
        self.inner
            .lock()
            .snapshot
            .as_ref()
            .map(|s| s.task_definition.clone())
    }

    /// Simulate a deploy finishing outside the rollback.
    pub fn set_task_definition(&self, task_definition: &str) {
        if let Some(snapshot) = self.inner.lock().snapshot.as_mut() {
            snapshot.task_definition = task_definition.to_string();
        }
    }
}

pub fn unsettled(deployments: usize, running: u32) -> ServiceStatus {
    ServiceStatus {
        deployments,
        desired_count: 2,
        running_count: running,
    }
}

#[async_trait]
impl ServiceOps for FakeOrchestrator {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceSnapshot, OrchestratorError> {
        self.inner
            .lock()
            .snapshot
            .clone()
            .ok_or_else(|| OrchestratorError::ServiceNotFound {
                cluster: cluster.to_string(),
                service: service.to_string(),
            })
    }

    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, OrchestratorError> {
        self.inner
            .lock()
            .task_definitions
            .get(reference)
            .cloned()
            .ok_or_else(|| OrchestratorError::TaskDefinitionNotFound {
                reference: reference.to_string(),
            })
    }

    async fn update_service(
        &self,
        snapshot: &ServiceSnapshot,
        task_definition: &TaskDefinition,
    ) -> Result<ServiceSnapshot, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.update_calls.push(task_definition.arn.clone());

        if let Some(message) = inner.reject_update.clone() {
            return Err(OrchestratorError::UpdateRejected { message });
        }

        let mut updated = snapshot.clone();
        updated.task_definition = task_definition.arn.clone();
        inner.snapshot = Some(updated.clone());
        Ok(updated)
    }

    async fn service_status(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceStatus, OrchestratorError> {
        let mut inner = self.inner.lock();
        inner.status_calls += 1;

        if inner.never_stable {
            return Ok(unsettled(2, 1));
        }
        if let Some(status) = inner.statuses.pop_front() {
            return Ok(status);
        }

        inner
            .snapshot
            .as_ref()
            .map(|s| ServiceStatus {
                deployments: 1,
                desired_count: s.desired_count,
                running_count: s.desired_count,
            })
            .ok_or_else(|| OrchestratorError::ServiceNotFound {
                cluster: cluster.to_string(),
                service: service.to_string(),
            })
    }
}

// =============================================================================
// Failing history stores
// =============================================================================

/// Reads work; every append fails.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryHistoryStore,
}

#[allow(dead_code)]
impl ReadOnlyStore {
    pub fn with_states(states: Vec<DeploymentState>) -> Self {
        Self {
            inner: MemoryHistoryStore::with_states(states),
        }
    }
}

#[async_trait]
impl HistoryStore for ReadOnlyStore {
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError> {
        self.inner.pull().await
    }

    async fn push_state(&self, _revision: Revision, _message: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("parameter store throttled".to_string()))
    }
}

/// Every call fails.
#[derive(Debug, Default)]
pub struct UnreachableStore;

#[async_trait]
impl HistoryStore for UnreachableStore {
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn push_state(&self, _revision: Revision, _message: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
