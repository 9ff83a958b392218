// ABOUTME: Application-wide error types for shipback.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::history::{BackendError, StoreError};
use crate::rollback::RollbackFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Rollback(#[from] RollbackFailure),

    #[error("history: {0}")]
    History(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
