// ABOUTME: Rollback orchestration using the type state pattern.
// ABOUTME: Moves a service back to the revision recorded before its current one.

mod error;
mod machine;
mod runner;
mod state;
mod transitions;
mod wait;

pub use error::{RollbackError, RollbackErrorKind, RollbackFailure, Step};
pub use machine::{Rollback, RollbackInput, RollbackTarget};
pub use runner::run_rollback;
pub use state::{
    HistoryLoaded, Recorded, RevisionPair, RollbackSummary, ServiceSnapshotted, Stable,
    TargetLoaded, TargetResolved, Updated, Validated,
};
pub use wait::{StabilityPolicy, WaitError, wait_until_stable};
