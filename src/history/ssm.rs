// ABOUTME: AWS Systems Manager Parameter Store history backend.
// ABOUTME: The whole log lives in one String parameter as a JSON array.

use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::types::{ParameterTier, ParameterType};

use super::key::HistoryKey;
use super::state::DeploymentState;
use super::store::{HistoryStore, StoreError, decode_states, encode_states};
use crate::types::Revision;

/// Largest value Parameter Store accepts, on the Advanced tier.
const MAX_VALUE_BYTES: usize = 8192;

/// History stored in the parameter named by [`HistoryKey::parameter_name`].
#[derive(Debug, Clone)]
pub struct SsmHistoryStore {
    client: Client,
    name: String,
}

/// Parameter value together with the version it was read at.
struct Versioned {
    states: Vec<DeploymentState>,
    version: Option<i64>,
}

impl SsmHistoryStore {
    pub fn new(client: Client, key: &HistoryKey) -> Self {
        Self {
            client,
            name: key.parameter_name(),
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Versioned, StoreError> {
        let result = self.client.get_parameter().name(&self.name).send().await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found())
                {
                    return Ok(Versioned {
                        states: Vec::new(),
                        version: None,
                    });
                }
                return Err(StoreError::Unavailable(format!(
                    "failed to read parameter {}: {}",
                    self.name,
                    DisplayErrorContext(&err)
                )));
            }
        };

        let parameter = output.parameter().ok_or_else(|| {
            StoreError::Corrupt(format!("parameter {} returned no value", self.name))
        })?;

        Ok(Versioned {
            states: decode_states(parameter.value().unwrap_or_default())?,
            version: Some(parameter.version()),
        })
    }
}

#[async_trait]
impl HistoryStore for SsmHistoryStore {
    async fn pull(&self) -> Result<Vec<DeploymentState>, StoreError> {
        Ok(self.read().await?.states)
    }

    async fn push_state(&self, revision: Revision, message: &str) -> Result<(), StoreError> {
        let Versioned {
            mut states,
            version,
        } = self.read().await?;

        states.push(DeploymentState::new(revision, message).recorded_now());
        let value = encode_states(&states)?;
        ensure_fits(&self.name, states.len(), value.len())?;

        // Parameter Store has no compare-and-swap; a first write must not
        // overwrite, and any later write must land exactly one version ahead.
        let result = self
            .client
            .put_parameter()
            .name(&self.name)
            .value(value)
            .r#type(ParameterType::String)
            .tier(ParameterTier::IntelligentTiering)
            .overwrite(version.is_some())
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_already_exists())
                {
                    return Err(StoreError::WriteConflict(format!(
                        "parameter {} was created by another writer",
                        self.name
                    )));
                }
                if err
                    .as_service_error()
                    .is_some_and(|e| e.code() == Some("ValidationException"))
                {
                    return Err(StoreError::CapacityExceeded(format!(
                        "parameter {} rejected the history document: {}",
                        self.name,
                        DisplayErrorContext(&err)
                    )));
                }
                return Err(StoreError::Unavailable(format!(
                    "failed to write parameter {}: {}",
                    self.name,
                    DisplayErrorContext(&err)
                )));
            }
        };

        let expected = version.unwrap_or(0) + 1;
        if output.version() != expected {
            return Err(StoreError::WriteConflict(format!(
                "parameter {} moved to version {} (expected {}); another writer appended concurrently",
                self.name,
                output.version(),
                expected
            )));
        }

        tracing::debug!(
            parameter = %self.name,
            version = output.version(),
            entries = states.len(),
            "appended history entry"
        );
        Ok(())
    }
}

/// Refuse documents Parameter Store would reject, before any write is attempted.
fn ensure_fits(name: &str, entries: usize, size: usize) -> Result<(), StoreError> {
    if size > MAX_VALUE_BYTES {
        return Err(StoreError::CapacityExceeded(format!(
            "parameter {} would hold {} entries in {} bytes (limit {})",
            name, entries, size, MAX_VALUE_BYTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rev(n: u32) -> Revision {
        Revision::new(n).unwrap()
    }

    /// A long-lived service: deploys interleaved with rollbacks, all timestamped.
    fn busy_log(entries: u32) -> Vec<DeploymentState> {
        (0..entries)
            .map(|i| {
                let n = 1000 + i;
                let message = if i % 2 == 0 {
                    "deploy".to_string()
                } else {
                    format!("rollback: {} -> {}", n, n - 1)
                };
                DeploymentState::new(rev(n), message).recorded_now()
            })
            .collect()
    }

    #[test]
    fn eighty_entry_log_fits_advanced_tier() {
        let states = busy_log(80);
        let value = encode_states(&states).unwrap();
        assert!(
            value.len() <= MAX_VALUE_BYTES,
            "80 entries encode to {} bytes",
            value.len()
        );
        assert!(ensure_fits("/shipback/prod/web", states.len(), value.len()).is_ok());
    }

    #[test]
    fn each_rollback_entry_stays_compact() {
        let mut states = busy_log(40);
        let before = encode_states(&states).unwrap().len();
        states.push(DeploymentState::new(rev(1040), "rollback: 1040 -> 1039").recorded_now());
        let after = encode_states(&states).unwrap().len();
        assert!(after - before <= 95, "entry costs {} bytes", after - before);
    }

    #[test]
    fn oversized_log_is_capacity_exceeded() {
        let err = ensure_fits("/shipback/prod/web", 200, MAX_VALUE_BYTES + 1).unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded(_)));
        assert!(err.to_string().contains("/shipback/prod/web"));
        assert!(err.to_string().contains("limit 8192"));
    }
}
