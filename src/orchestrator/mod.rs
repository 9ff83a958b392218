// ABOUTME: Container orchestrator access for service rollback.
// ABOUTME: Exports the ServiceOps trait, its data types, errors, and the ECS implementation.

mod ecs;
mod error;
mod ops;
mod types;

pub use ecs::EcsOrchestrator;
pub use error::{
    ApiSnafu, OrchestratorError, ServiceNotFoundSnafu, TaskDefinitionNotFoundSnafu,
    UpdateRejectedSnafu,
};
pub use ops::ServiceOps;
pub use types::{ServiceSnapshot, ServiceStatus, TaskDefinition};
