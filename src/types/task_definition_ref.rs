// ABOUTME: Task definition reference parsing.
// ABOUTME: Handles family:revision and full task-definition ARNs.

use super::revision::Revision;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTaskDefinitionRefError {
    #[error("task definition reference cannot be empty")]
    Empty,

    #[error("task definition reference has no revision: {0}")]
    MissingRevision(String),

    #[error("task definition reference has no family: {0}")]
    MissingFamily(String),

    #[error("invalid revision in task definition reference: {0}")]
    InvalidRevision(String),
}

/// A reference to one revision of a task definition family.
///
/// The prefix is kept verbatim, so `arn:aws:ecs:us-east-1:1:task-definition/app:7`
/// and `app:7` both round-trip through `Display` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinitionRef {
    prefix: String,
    revision: Revision,
}

impl TaskDefinitionRef {
    pub fn parse(input: &str) -> Result<Self, ParseTaskDefinitionRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseTaskDefinitionRefError::Empty);
        }

        let (prefix, revision) = input
            .rsplit_once(':')
            .ok_or_else(|| ParseTaskDefinitionRefError::MissingRevision(input.to_string()))?;

        // A trailing segment containing '/' means the last colon belonged to the ARN
        if revision.is_empty() || revision.contains('/') {
            return Err(ParseTaskDefinitionRefError::MissingRevision(
                input.to_string(),
            ));
        }

        let revision = revision
            .parse::<Revision>()
            .map_err(|_| ParseTaskDefinitionRefError::InvalidRevision(input.to_string()))?;

        let family = Self::family_of(prefix);
        if family.is_empty() {
            return Err(ParseTaskDefinitionRefError::MissingFamily(
                input.to_string(),
            ));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            revision,
        })
    }

    fn family_of(prefix: &str) -> &str {
        match prefix.rsplit_once('/') {
            Some((_, family)) => family,
            None => prefix,
        }
    }

    pub fn family(&self) -> &str {
        Self::family_of(&self.prefix)
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Same family, different revision. Only the trailing component changes.
    pub fn with_revision(&self, revision: Revision) -> Self {
        Self {
            prefix: self.prefix.clone(),
            revision,
        }
    }
}

impl fmt::Display for TaskDefinitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:ecs:ap-northeast-1:123456789012:task-definition/app:7";

    #[test]
    fn parse_full_arn() {
        let r = TaskDefinitionRef::parse(ARN).unwrap();
        assert_eq!(r.family(), "app");
        assert_eq!(r.revision().get(), 7);
        assert_eq!(r.to_string(), ARN);
    }

    #[test]
    fn substitutes_only_trailing_revision() {
        let r = TaskDefinitionRef::parse(ARN).unwrap();
        let prev = r.with_revision(Revision::new(5).unwrap());
        assert_eq!(
            prev.to_string(),
            "arn:aws:ecs:ap-northeast-1:123456789012:task-definition/app:5"
        );
    }

    #[test]
    fn arn_without_revision_is_rejected() {
        let err = TaskDefinitionRef::parse(
            "arn:aws:ecs:ap-northeast-1:123456789012:task-definition/app",
        )
        .unwrap_err();
        assert!(matches!(err, ParseTaskDefinitionRefError::MissingRevision(_)));
    }

    #[test]
    fn non_numeric_revision_is_rejected() {
        assert!(matches!(
            TaskDefinitionRef::parse("app:latest").unwrap_err(),
            ParseTaskDefinitionRefError::InvalidRevision(_)
        ));
    }
}
