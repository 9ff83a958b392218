// ABOUTME: History command implementation.
// ABOUTME: Prints a service's deployment log oldest first, marking current and previous entries.

use super::aws_connection::{load_aws_config, offline_config};
use crate::cli::HistoryArgs;
use serde::Serialize;
use shipback::config::{Overrides, RunConfig, Settings, resolve_region};
use shipback::error::{Error, Result};
use shipback::history::{
    BackendContext, BackendKind, DeploymentState, History, HistoryKey, open_store,
};
use shipback::output::{Output, OutputMode};
use shipback::types::{ClusterName, ServiceName};
use std::env;

/// Print the recorded history of a service. Never modifies it.
pub async fn history(args: HistoryArgs, output: Output) -> Result<()> {
    let cluster = ClusterName::new(&args.service.cluster)
        .map_err(|e| Error::InvalidArgument(format!("--cluster: {}", e)))?;
    let service = ServiceName::new(&args.service.service_name)
        .map_err(|e| Error::InvalidArgument(format!("--service-name: {}", e)))?;

    let mut warnings = Vec::new();
    let settings = Settings::discover(&env::current_dir()?)?;
    let config = RunConfig::resolve(
        Overrides {
            backend: args.service.backend.clone(),
            history_dir: args.service.history_dir.clone(),
            slack_webhook_url: None,
        },
        settings,
        &mut warnings,
    )?;
    for warning in &warnings {
        output.warning(warning);
    }

    let aws = match config.backend {
        BackendKind::Ssm => {
            let region = resolve_region().ok_or_else(|| {
                Error::ConfigurationMissing(
                    "AWS region is not set; export AWS_REGION or AWS_DEFAULT_REGION".to_string(),
                )
            })?;
            load_aws_config(&region, &output).await
        }
        BackendKind::File => offline_config(),
    };

    let key = HistoryKey::new(&cluster, &service);
    let store = open_store(
        config.backend,
        &key,
        BackendContext {
            aws: &aws,
            history_dir: config.history_dir.clone(),
        },
    )?;

    let history = History::new(store.pull().await?);
    print_history(&output, &key, &history, args.limit)
}

#[derive(Serialize)]
struct HistoryLine<'a> {
    position: usize,
    #[serde(flatten)]
    state: &'a DeploymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<&'static str>,
}

fn print_history(
    output: &Output,
    key: &HistoryKey,
    history: &History,
    limit: Option<usize>,
) -> Result<()> {
    output.progress(&format!("History for {} ({} entries)", key, history.len()));

    if history.is_empty() {
        output.success("No deployments recorded");
        return Ok(());
    }

    let len = history.len();
    let skip = limit.map_or(0, |n| len.saturating_sub(n));

    for (index, state) in history.states().iter().enumerate().skip(skip) {
        let line = HistoryLine {
            position: index + 1,
            state,
            marker: marker(index, len),
        };

        match output.mode() {
            OutputMode::Json => println!("{}", serde_json::to_string(&line)?),
            OutputMode::Normal | OutputMode::Quiet => println!("{}", format_line(&line)),
        }
    }

    Ok(())
}

fn marker(index: usize, len: usize) -> Option<&'static str> {
    if index + 1 == len {
        Some("current")
    } else if index + 2 == len {
        Some("previous")
    } else {
        None
    }
}

fn format_line(line: &HistoryLine<'_>) -> String {
    let mut text = format!(
        "{:>4}  rev {:<6} {}",
        line.position, line.state.revision, line.state.message
    );
    if let Some(at) = line.state.recorded_at {
        text.push_str(&format!("  [{}]", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(marker) = line.marker {
        text.push_str(&format!("  ({})", marker));
    }
    text
}
