// ABOUTME: Optional shipback.yml settings and their merge with command-line flags.
// ABOUTME: Flags win over the file; the file wins over built-in defaults.

mod env_value;
mod region;

pub use env_value::EnvValue;
pub use region::{REGION_VARS, resolve_region};

use crate::error::{Error, Result};
use crate::history::BackendKind;
use crate::rollback::StabilityPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILENAME: &str = "shipback.yml";
pub const SETTINGS_FILENAME_ALT: &str = "shipback.yaml";
pub const SETTINGS_FILENAME_DIR: &str = ".shipback/config.yml";

/// Contents of a settings file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: Option<String>,

    #[serde(default)]
    pub history_dir: Option<PathBuf>,

    #[serde(default)]
    pub slack_webhook_url: Option<EnvValue>,

    #[serde(default)]
    pub wait: StabilityPolicy,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, if any.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let candidates = [
            dir.join(SETTINGS_FILENAME),
            dir.join(SETTINGS_FILENAME_ALT),
            dir.join(SETTINGS_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings");
                return Self::load(path).map(Some);
            }
        }

        Ok(None)
    }

    fn validate(&self) -> Result<()> {
        if self.wait.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "wait.interval must be greater than zero".to_string(),
            ));
        }
        if self.wait.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "wait.timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub history_dir: Option<PathBuf>,
    pub slack_webhook_url: Option<String>,
}

/// Settings for one invocation after flags and file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub backend: BackendKind,
    pub history_dir: Option<PathBuf>,
    pub slack_webhook_url: Option<String>,
    pub wait: StabilityPolicy,
}

impl RunConfig {
    /// Merge flags over settings.
    ///
    /// An unresolvable webhook reference in the settings file disables chat
    /// and is reported through `warnings` instead of failing.
    pub fn resolve(
        overrides: Overrides,
        settings: Option<Settings>,
        warnings: &mut Vec<String>,
    ) -> Result<Self> {
        let settings = settings.unwrap_or_default();

        let backend = match overrides.backend.or(settings.backend) {
            Some(name) => name.parse::<BackendKind>()?,
            None => BackendKind::default(),
        };

        let slack_webhook_url = match overrides.slack_webhook_url {
            Some(url) => Some(url),
            None => match settings.slack_webhook_url.as_ref().map(EnvValue::resolve) {
                Some(Ok(url)) => Some(url),
                Some(Err(e)) => {
                    warnings.push(format!("slack_webhook_url ignored: {}", e));
                    None
                }
                None => None,
            },
        }
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

        Ok(Self {
            backend,
            history_dir: overrides.history_dir.or(settings.history_dir),
            slack_webhook_url,
            wait: settings.wait,
        })
    }
}
