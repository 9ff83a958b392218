// ABOUTME: Deployment history log with swappable storage backends.
// ABOUTME: Exports the HistoryStore trait, records, key derivation, and backend selection.

mod backend;
mod file;
mod key;
mod memory;
mod ssm;
mod state;
mod store;

pub use backend::{BackendContext, BackendError, BackendKind, open_store};
pub use file::{FileHistoryStore, LockInfo};
pub use key::{HistoryKey, KEY_PREFIX};
pub use memory::MemoryHistoryStore;
pub use ssm::SsmHistoryStore;
pub use state::{DeploymentState, History};
pub use store::{HistoryStore, StoreError};
