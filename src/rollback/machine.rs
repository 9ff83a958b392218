// ABOUTME: Generic rollback struct parameterized by state marker.
// ABOUTME: Construction validates inputs; state types carry step data for compile-time guarantees.

use crate::types::{ClusterName, Revision, ServiceName, TaskDefinitionRef};

use super::error::{RollbackError, RollbackFailure, Step};
use super::state::{
    HistoryLoaded, Recorded, RollbackSummary, ServiceSnapshotted, TargetLoaded, TargetResolved,
    Validated,
};
use crate::orchestrator::{ServiceSnapshot, TaskDefinition};

/// Raw invocation parameters, before validation.
#[derive(Debug, Clone, Default)]
pub struct RollbackInput {
    pub cluster: String,
    pub service: String,
    /// Region resolved from the environment, if any.
    pub region: Option<String>,
}

/// The service a rollback acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackTarget {
    pub cluster: ClusterName,
    pub service: ServiceName,
    pub region: String,
}

/// A rollback in progress, parameterized by its current state.
///
/// Each step consumes the rollback and returns it in the next state, so steps
/// cannot be skipped or reordered. Any failure ends the rollback.
#[derive(Debug)]
pub struct Rollback<S> {
    pub(crate) target: RollbackTarget,
    pub(crate) state: S,
}

impl Rollback<Validated> {
    /// Check the invocation before any network call is made.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank or malformed cluster or service,
    /// `ConfigurationMissing` when no region is available.
    pub fn validate(input: &RollbackInput) -> Result<Self, RollbackFailure> {
        let fail = |error| RollbackFailure {
            cluster: input.cluster.clone(),
            service: input.service.clone(),
            step: Step::ValidateInput,
            error,
        };

        let cluster = ClusterName::new(&input.cluster).map_err(|e| {
            fail(RollbackError::InvalidArgument(format!("--cluster: {}", e)))
        })?;
        let service = ServiceName::new(&input.service).map_err(|e| {
            fail(RollbackError::InvalidArgument(format!("--service-name: {}", e)))
        })?;

        let region = input
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                fail(RollbackError::ConfigurationMissing(
                    "AWS region is not set; export AWS_REGION or AWS_DEFAULT_REGION".to_string(),
                ))
            })?;

        Ok(Rollback {
            target: RollbackTarget {
                cluster,
                service,
                region: region.to_string(),
            },
            state: Validated,
        })
    }
}

impl<S> Rollback<S> {
    pub fn target(&self) -> &RollbackTarget {
        &self.target
    }

    pub fn cluster(&self) -> &ClusterName {
        &self.target.cluster
    }

    pub fn service(&self) -> &ServiceName {
        &self.target.service
    }

    pub fn region(&self) -> &str {
        &self.target.region
    }

    /// Build a failure for `step` carrying this rollback's context.
    pub(crate) fn fail(&self, step: Step, error: impl Into<RollbackError>) -> RollbackFailure {
        RollbackFailure {
            cluster: self.target.cluster.to_string(),
            service: self.target.service.to_string(),
            step,
            error: error.into(),
        }
    }
}

impl Rollback<HistoryLoaded> {
    /// Revision recorded as live.
    pub fn current_revision(&self) -> Revision {
        self.state.pair.current.revision
    }

    /// Revision the rollback will return to.
    pub fn previous_revision(&self) -> Revision {
        self.state.pair.previous.revision
    }
}

impl Rollback<ServiceSnapshotted> {
    pub fn snapshot(&self) -> &ServiceSnapshot {
        &self.state.snapshot
    }
}

impl Rollback<TargetResolved> {
    /// Task definition reference the service will be pointed at.
    pub fn target_reference(&self) -> &TaskDefinitionRef {
        &self.state.target
    }
}

impl Rollback<TargetLoaded> {
    pub fn task_definition(&self) -> &TaskDefinition {
        &self.state.task_definition
    }

    pub fn current_revision(&self) -> Revision {
        self.state.pair.current.revision
    }

    pub fn previous_revision(&self) -> Revision {
        self.state.pair.previous.revision
    }
}

impl Rollback<Recorded> {
    pub fn summary(&self) -> &RollbackSummary {
        &self.state.summary
    }

    /// Consume the rollback and return its outcome.
    pub fn finish(self) -> RollbackSummary {
        self.state.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollback::RollbackErrorKind;

    fn input(cluster: &str, service: &str, region: Option<&str>) -> RollbackInput {
        RollbackInput {
            cluster: cluster.to_string(),
            service: service.to_string(),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn valid_input_is_accepted() {
        let rollback = Rollback::validate(&input("prod", "web", Some("us-east-1"))).unwrap();
        assert_eq!(rollback.cluster().as_str(), "prod");
        assert_eq!(rollback.service().as_str(), "web");
        assert_eq!(rollback.region(), "us-east-1");
    }

    #[test]
    fn empty_cluster_is_invalid_argument() {
        let err = Rollback::validate(&input("", "web", Some("us-east-1"))).unwrap_err();
        assert_eq!(err.kind(), RollbackErrorKind::InvalidArgument);
        assert_eq!(err.step, Step::ValidateInput);
        assert!(err.to_string().contains("--cluster"));
    }

    #[test]
    fn empty_service_is_invalid_argument() {
        let err = Rollback::validate(&input("prod", " ", Some("us-east-1"))).unwrap_err();
        assert_eq!(err.kind(), RollbackErrorKind::InvalidArgument);
        assert!(err.to_string().contains("--service-name"));
    }

    #[test]
    fn arguments_are_checked_before_region() {
        let err = Rollback::validate(&input("", "web", None)).unwrap_err();
        assert_eq!(err.kind(), RollbackErrorKind::InvalidArgument);
    }

    #[test]
    fn missing_region_is_configuration_missing() {
        for region in [None, Some(""), Some("  ")] {
            let err = Rollback::validate(&input("prod", "web", region)).unwrap_err();
            assert_eq!(err.kind(), RollbackErrorKind::ConfigurationMissing);
        }
    }
}
