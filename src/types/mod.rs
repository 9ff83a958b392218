// ABOUTME: Validated domain types for clusters, services, and task definitions.
// ABOUTME: Parsing happens once at the edge so the rest of the crate works with checked values.

mod cluster_name;
mod revision;
mod service_name;
mod task_definition_ref;

pub use cluster_name::ClusterName;
pub use revision::{Revision, RevisionError};
pub use service_name::{NameError, ServiceName};
pub use task_definition_ref::{ParseTaskDefinitionRefError, TaskDefinitionRef};
