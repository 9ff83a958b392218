// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the rollback and history subcommands and global output flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shipback")]
#[command(about = "Roll an ECS service back to its previously deployed task definition")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Roll the service back to the revision deployed before the current one
    Rollback(RollbackArgs),

    /// Show the recorded deployment history of a service
    History(HistoryArgs),
}

/// Which service, and where its history lives.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// ECS cluster name or ARN
    #[arg(long)]
    pub cluster: String,

    /// ECS service name
    #[arg(long = "service-name")]
    pub service_name: String,

    /// History backend (ssm or file) [default: ssm]
    #[arg(long)]
    pub backend: Option<String>,

    /// Directory for the file backend [default: ~/.local/state/shipback]
    #[arg(long = "history-dir")]
    pub history_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RollbackArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Slack incoming webhook for progress messages
    #[arg(long = "slack-webhook-url", env = "SHIPBACK_SLACK_WEBHOOK_URL")]
    pub slack_webhook_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Show only the most recent N entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
