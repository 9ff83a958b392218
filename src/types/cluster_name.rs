// ABOUTME: ECS cluster identifier validation.
// ABOUTME: Accepts a plain cluster name or a full cluster ARN.

use super::service_name::{ARN_PREFIX, NameError, short_name, validate_name_or_arn};
use std::fmt;

/// A cluster name or cluster ARN as accepted by ECS APIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterName(String);

impl ClusterName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        let value = value.trim();
        // arn:aws:ecs:<region>:<account>:cluster/<name>
        validate_name_or_arn("cluster", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare cluster name, with any ARN prefix stripped.
    pub fn short_name(&self) -> &str {
        short_name(&self.0)
    }

    pub fn is_arn(&self) -> bool {
        self.0.starts_with(ARN_PREFIX)
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
