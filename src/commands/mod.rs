// ABOUTME: Command module aggregator for the shipback CLI.
// ABOUTME: Re-exports the rollback and history command handlers.

mod aws_connection;
mod history;
mod rollback;

pub use history::history;
pub use rollback::rollback;
