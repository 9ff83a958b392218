// ABOUTME: Orchestrator-side views of a service and its task definitions.
// ABOUTME: Read fresh per invocation; never persisted.

use crate::types::Revision;

/// Point-in-time view of a live service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSnapshot {
    pub cluster: String,
    pub service: String,
    /// Task definition the service currently points at, as reported.
    pub task_definition: String,
    /// Concurrent rollouts; more than one means a change is in flight.
    pub deployments: usize,
    pub desired_count: u32,
    pub running_count: u32,
}

/// A task definition document, reduced to what rollback reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub arn: String,
    pub family: String,
    pub revision: Revision,
    /// Container images in definition order.
    pub images: Vec<String>,
}

/// Convergence counters used while waiting for a service to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub deployments: usize,
    pub desired_count: u32,
    pub running_count: u32,
}

impl ServiceStatus {
    /// One active deployment with every desired task running.
    pub fn is_stable(&self) -> bool {
        self.deployments == 1 && self.running_count == self.desired_count
    }
}

impl From<&ServiceSnapshot> for ServiceStatus {
    fn from(snapshot: &ServiceSnapshot) -> Self {
        Self {
            deployments: snapshot.deployments,
            desired_count: snapshot.desired_count,
            running_count: snapshot.running_count,
        }
    }
}
