// ABOUTME: Task definition revision number.
// ABOUTME: Assigned by ECS per family; always positive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevisionError {
    #[error("revision must be a positive integer, got '{0}'")]
    Invalid(String),
}

/// A task definition revision number within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Revision(u32);

impl Revision {
    pub fn new(value: u32) -> Result<Self, RevisionError> {
        if value == 0 {
            return Err(RevisionError::Invalid(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Revision {
    type Error = RevisionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for Revision {
    type Error = RevisionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| RevisionError::Invalid(value.to_string()))
            .and_then(Self::new)
    }
}

impl From<Revision> for u32 {
    fn from(revision: Revision) -> Self {
        revision.0
    }
}

impl FromStr for Revision {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map_err(|_| RevisionError::Invalid(s.to_string()))
            .and_then(Self::new)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
