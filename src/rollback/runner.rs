// ABOUTME: Drives a validated rollback through every step in order.
// ABOUTME: Reports progress through the Notifier; notification never affects the outcome.

use crate::history::HistoryStore;
use crate::notify::{Notifier, Severity};
use crate::orchestrator::ServiceOps;

use super::error::RollbackFailure;
use super::machine::Rollback;
use super::state::{RollbackSummary, Validated};
use super::wait::StabilityPolicy;

/// Run a rollback to completion.
///
/// Stops at the first failing step. Failure notifications are the caller's
/// job since the caller also sees failures from before validation.
pub async fn run_rollback<H, O>(
    rollback: Rollback<Validated>,
    store: &H,
    ops: &O,
    notifier: &Notifier,
    policy: &StabilityPolicy,
) -> Result<RollbackSummary, RollbackFailure>
where
    H: HistoryStore + ?Sized,
    O: ServiceOps + ?Sized,
{
    let rollback = rollback.load_history(store).await?;
    let rollback = rollback.snapshot_service(ops).await?;
    let rollback = rollback.resolve_target()?;
    notifier.log(&format!("  → Target task definition {}", rollback.target_reference()));

    let rollback = rollback.read_target(ops).await?;
    notifier
        .notify(
            Severity::Normal,
            &format!(
                "rollback: revision {} -> {}",
                rollback.current_revision(),
                rollback.previous_revision()
            ),
        )
        .await;

    let rollback = rollback.apply_update(ops).await?;
    notifier.log("service updating");

    let rollback = rollback
        .await_stable(ops, policy, |status, waited| {
            notifier.log(&format!(
                "  → waiting ({}s): {} deployment(s), {}/{} running",
                waited.as_secs(),
                status.deployments,
                status.running_count,
                status.desired_count
            ));
        })
        .await?;

    let summary = rollback.record_history(store).await?.finish();
    notifier.notify(Severity::Good, "successfully updated").await;

    Ok(summary)
}
