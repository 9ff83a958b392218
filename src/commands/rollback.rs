// ABOUTME: Rollback command implementation.
// ABOUTME: Resolves settings, opens the history store, runs the rollback, and reports failures.

use super::aws_connection::load_aws_config;
use crate::cli::RollbackArgs;
use shipback::config::{Overrides, RunConfig, Settings, resolve_region};
use shipback::diagnostics::Warning;
use shipback::error::Result;
use shipback::history::{BackendContext, HistoryKey, open_store};
use shipback::notify::{ChatSink, Notifier, Severity, SlackWebhook};
use shipback::orchestrator::EcsOrchestrator;
use shipback::output::Output;
use shipback::rollback::{Rollback, RollbackInput, RollbackSummary, run_rollback};
use std::env;

/// Roll the service back and report the outcome.
///
/// Any failure, including bad input, produces one failure notification
/// before the error is returned.
pub async fn rollback(args: RollbackArgs, mut output: Output) -> Result<()> {
    output.start_timer();

    let mut setting_warnings = Vec::new();
    let prepared = prepare(&args, &mut setting_warnings);

    // Chat still goes out for settings errors when the flag provides a webhook.
    let webhook = match &prepared {
        Ok(config) => config.slack_webhook_url.clone(),
        Err(_) => args.slack_webhook_url.clone(),
    };
    let notifier = build_notifier(output, webhook, &args);
    for message in setting_warnings {
        notifier.warn(Warning::settings(message));
    }

    let result = match prepared {
        Ok(config) => execute(&args, &config, &notifier).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            emit_warnings(&notifier);
            notifier.output().success(&format!(
                "Rolled back {} from revision {} to {}",
                summary.service, summary.from, summary.to
            ));
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "rollback failed");
            notifier
                .notify(
                    Severity::Danger,
                    &format!(
                        "failed to rollback. cluster: {}, service: {}",
                        args.service.cluster, args.service.service_name
                    ),
                )
                .await;
            emit_warnings(&notifier);
            Err(e)
        }
    }
}

fn prepare(args: &RollbackArgs, warnings: &mut Vec<String>) -> Result<RunConfig> {
    let settings = Settings::discover(&env::current_dir()?)?;
    let overrides = Overrides {
        backend: args.service.backend.clone(),
        history_dir: args.service.history_dir.clone(),
        slack_webhook_url: args.slack_webhook_url.clone(),
    };
    RunConfig::resolve(overrides, settings, warnings)
}

fn build_notifier(output: Output, webhook: Option<String>, args: &RollbackArgs) -> Notifier {
    let Some(url) = webhook.filter(|url| !url.trim().is_empty()) else {
        return Notifier::without_chat(output);
    };

    match SlackWebhook::new(url, &args.service.cluster, &args.service.service_name) {
        Ok(sink) => Notifier::new(output, Some(Box::new(sink) as Box<dyn ChatSink>)),
        Err(e) => {
            let notifier = Notifier::without_chat(output);
            notifier.warn(Warning::chat_delivery(format!("chat disabled: {}", e)));
            notifier
        }
    }
}

async fn execute(
    args: &RollbackArgs,
    config: &RunConfig,
    notifier: &Notifier,
) -> Result<RollbackSummary> {
    let rollback = Rollback::validate(&RollbackInput {
        cluster: args.service.cluster.clone(),
        service: args.service.service_name.clone(),
        region: resolve_region(),
    })?;

    notifier.log(&format!(
        "Rolling back {} in {} (history: {})",
        rollback.service(),
        rollback.cluster(),
        config.backend
    ));

    let aws = load_aws_config(rollback.region(), notifier.output()).await;
    let key = HistoryKey::new(rollback.cluster(), rollback.service());
    let store = open_store(
        config.backend,
        &key,
        BackendContext {
            aws: &aws,
            history_dir: config.history_dir.clone(),
        },
    )?;
    let ops = EcsOrchestrator::new(&aws);

    let summary = run_rollback(rollback, store.as_ref(), &ops, notifier, &config.wait).await?;
    Ok(summary)
}

fn emit_warnings(notifier: &Notifier) {
    for warning in notifier.warnings() {
        notifier.output().warning(&warning.message);
    }
}
