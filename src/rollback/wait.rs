// ABOUTME: Bounded wait for a service to stabilize after an update.
// ABOUTME: Sleeps a fixed interval, re-checks status, and gives up once the budget is spent.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use crate::orchestrator::{OrchestratorError, ServiceOps, ServiceStatus};

/// How often and how long to poll for stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StabilityPolicy {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_timeout() -> Duration {
    Duration::from_secs(600)
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}

impl StabilityPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Why waiting stopped without the service settling.
#[derive(Debug)]
pub enum WaitError {
    TimedOut {
        waited: Duration,
        last: Option<ServiceStatus>,
    },
    Orchestrator(OrchestratorError),
}

/// Poll until the service is stable or `policy.timeout` has elapsed.
///
/// `on_poll` sees every unstable status along with the time waited so far.
/// Returns the stable status and the total time waited.
pub async fn wait_until_stable<O, F>(
    ops: &O,
    cluster: &str,
    service: &str,
    policy: &StabilityPolicy,
    mut on_poll: F,
) -> Result<(ServiceStatus, Duration), WaitError>
where
    O: ServiceOps + ?Sized,
    F: FnMut(&ServiceStatus, Duration),
{
    let start = Instant::now();

    loop {
        let remaining = policy.timeout.saturating_sub(start.elapsed());
        tokio::time::sleep(policy.interval.min(remaining)).await;

        let status = ops
            .service_status(cluster, service)
            .await
            .map_err(WaitError::Orchestrator)?;
        let waited = start.elapsed();

        if status.is_stable() {
            tracing::debug!(cluster, service, waited_secs = waited.as_secs(), "service stable");
            return Ok((status, waited));
        }

        on_poll(&status, waited);

        if waited >= policy.timeout {
            return Err(WaitError::TimedOut {
                waited,
                last: Some(status),
            });
        }
    }
}
