// ABOUTME: Shared helper for loading AWS client configuration.
// ABOUTME: Used by the rollback and history commands once inputs are validated.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use shipback::output::Output;

/// Load SDK configuration for `region` from the default credential chain.
///
/// No request is made here; credentials are resolved lazily by the clients.
pub async fn load_aws_config(region: &str, output: &Output) -> SdkConfig {
    output.progress(&format!("  → Using AWS region {}", region));

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Configuration for commands that never talk to AWS.
pub fn offline_config() -> SdkConfig {
    SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .build()
}
