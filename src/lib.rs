// ABOUTME: Library root for shipback - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod notify;
pub mod orchestrator;
pub mod output;
pub mod rollback;
pub mod types;
