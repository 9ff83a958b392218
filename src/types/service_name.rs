// ABOUTME: ECS service name validation.
// ABOUTME: Service names are 1-255 letters, digits, hyphens, or underscores, or a service ARN.

use std::fmt;
use thiserror::Error;

/// Maximum length ECS accepts for service and cluster names.
pub(crate) const MAX_NAME_LEN: usize = 255;

pub(crate) const ARN_PREFIX: &str = "arn:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} exceeds maximum length of 255 characters")]
    TooLong(&'static str),

    #[error("invalid character in {0}: '{1}'")]
    InvalidChar(&'static str, char),
}

/// A service name or service ARN as accepted by ECS APIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        let value = value.trim();
        // arn:aws:ecs:<region>:<account>:service[/<cluster>]/<name>
        validate_name_or_arn("service name", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare service name, with any ARN prefix stripped.
    pub fn short_name(&self) -> &str {
        short_name(&self.0)
    }

    pub fn is_arn(&self) -> bool {
        self.0.starts_with(ARN_PREFIX)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a bare name, or the last path segment of an ARN.
pub(crate) fn validate_name_or_arn(what: &'static str, value: &str) -> Result<(), NameError> {
    if !value.starts_with(ARN_PREFIX) {
        return validate_name(what, value);
    }
    if let Some(c) = value.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(NameError::InvalidChar(what, c));
    }
    let (_, name) = value.rsplit_once('/').ok_or(NameError::Empty(what))?;
    validate_name(what, name)
}

pub(crate) fn short_name(value: &str) -> &str {
    if value.starts_with(ARN_PREFIX) {
        value.rsplit_once('/').map(|(_, n)| n).unwrap_or(value)
    } else {
        value
    }
}

pub(crate) fn validate_name(what: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty(what));
    }

    if value.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(what));
    }

    for c in value.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(NameError::InvalidChar(what, c));
        }
    }

    Ok(())
}
