// ABOUTME: Deterministic history key derived from cluster and service.
// ABOUTME: Renders as a parameter name or a relative file path depending on the backend.

use std::fmt;
use std::path::PathBuf;

use crate::types::{ClusterName, ServiceName};

/// Namespace prefix for parameter-store keys.
pub const KEY_PREFIX: &str = "/shipback";

/// Identifies one service's history log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    cluster: String,
    service: String,
}

impl HistoryKey {
    /// ARNs key on their bare names so `prod` and its ARN share a log.
    pub fn new(cluster: &ClusterName, service: &ServiceName) -> Self {
        Self {
            cluster: cluster.short_name().to_string(),
            service: service.short_name().to_string(),
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Parameter name, e.g. `/shipback/prod/web`.
    pub fn parameter_name(&self) -> String {
        format!("{}/{}/{}", KEY_PREFIX, self.cluster, self.service)
    }

    /// Path relative to a history directory, e.g. `prod/web.json`.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.cluster).join(format!("{}.json", self.service))
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parameter_name())
    }
}
