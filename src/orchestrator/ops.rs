// ABOUTME: Service operations trait consumed by the rollback state machine.
// ABOUTME: Describe, read task definition, update, and status polling.

use async_trait::async_trait;

use super::error::OrchestratorError;
use super::types::{ServiceSnapshot, ServiceStatus, TaskDefinition};

/// Read/write access to a live service and its task definitions.
#[async_trait]
pub trait ServiceOps: Send + Sync {
    /// Current state of the service.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceSnapshot, OrchestratorError>;

    /// Full task definition for a `family:revision` reference or ARN.
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, OrchestratorError>;

    /// Point the service at `task_definition`, leaving everything else as in `snapshot`.
    async fn update_service(
        &self,
        snapshot: &ServiceSnapshot,
        task_definition: &TaskDefinition,
    ) -> Result<ServiceSnapshot, OrchestratorError>;

    /// Deployment and task counters for convergence checks.
    async fn service_status(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceStatus, OrchestratorError> {
        self.describe_service(cluster, service)
            .await
            .map(|snapshot| ServiceStatus::from(&snapshot))
    }
}
