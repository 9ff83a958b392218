// ABOUTME: History backend selection from the --backend name.
// ABOUTME: Names map to backends through a fixed table, resolved once at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use aws_config::SdkConfig;

use super::file::FileHistoryStore;
use super::key::HistoryKey;
use super::ssm::SsmHistoryStore;
use super::store::HistoryStore;

/// Available history backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// AWS Systems Manager Parameter Store.
    #[default]
    Ssm,
    /// Local JSON files.
    File,
}

/// Backend names accepted on the command line and in settings.
const BACKENDS: &[(&str, BackendKind)] = &[("ssm", BackendKind::Ssm), ("file", BackendKind::File)];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("unknown history backend '{name}' (expected one of: {expected})")]
    Unknown { name: String, expected: String },

    #[error("file backend needs a history directory: set --history-dir or HOME")]
    NoHistoryDir,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        BACKENDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BACKENDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| BackendError::Unknown {
                name: wanted.to_string(),
                expected: BACKENDS
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a backend may need to open its store.
pub struct BackendContext<'a> {
    pub aws: &'a SdkConfig,
    pub history_dir: Option<PathBuf>,
}

/// Open the history store for `key` on the selected backend.
pub fn open_store(
    kind: BackendKind,
    key: &HistoryKey,
    ctx: BackendContext<'_>,
) -> Result<Box<dyn HistoryStore>, BackendError> {
    tracing::debug!(backend = %kind, key = %key, "opening history store");

    match kind {
        BackendKind::Ssm => Ok(Box::new(SsmHistoryStore::new(
            aws_sdk_ssm::Client::new(ctx.aws),
            key,
        ))),
        BackendKind::File => {
            let dir = ctx
                .history_dir
                .or_else(FileHistoryStore::default_dir)
                .ok_or(BackendError::NoHistoryDir)?;
            Ok(Box::new(FileHistoryStore::new(&dir, key)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!("SSM".parse::<BackendKind>().unwrap(), BackendKind::Ssm);
        assert_eq!(" file ".parse::<BackendKind>().unwrap(), BackendKind::File);
    }

    #[test]
    fn unknown_name_lists_choices() {
        let err = "consul".parse::<BackendKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown history backend 'consul' (expected one of: ssm, file)");
    }

    #[test]
    fn default_backend_is_parameter_store() {
        assert_eq!(BackendKind::default(), BackendKind::Ssm);
        assert_eq!(BackendKind::default().to_string(), "ssm");
    }
}
