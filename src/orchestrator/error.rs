// ABOUTME: Orchestrator error types with SNAFU pattern.
// ABOUTME: Separates the conditions rollback reacts to from plain API failures.

use snafu::Snafu;

/// Errors from orchestrator reads and writes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum OrchestratorError {
    #[snafu(display("service {service} not found in cluster {cluster}"))]
    ServiceNotFound { cluster: String, service: String },

    #[snafu(display("task definition not found: {reference}"))]
    TaskDefinitionNotFound { reference: String },

    #[snafu(display("service update rejected: {message}"))]
    UpdateRejected { message: String },

    #[snafu(display("orchestrator request failed: {message}"))]
    Api { message: String },
}
