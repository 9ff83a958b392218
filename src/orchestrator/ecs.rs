// ABOUTME: Amazon ECS implementation of ServiceOps using the AWS SDK.
// ABOUTME: Maps SDK responses and service errors onto orchestrator types.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ecs::types::Service;
use snafu::OptionExt;

use super::error::{
    ApiSnafu, OrchestratorError, ServiceNotFoundSnafu, TaskDefinitionNotFoundSnafu,
    UpdateRejectedSnafu,
};
use super::ops::ServiceOps;
use super::types::{ServiceSnapshot, TaskDefinition};
use crate::types::Revision;

/// ECS reports deleted services with this status until they age out.
const INACTIVE: &str = "INACTIVE";

/// ECS-backed service operations.
#[derive(Debug, Clone)]
pub struct EcsOrchestrator {
    client: Client,
}

impl EcsOrchestrator {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

/// ECS answers an unknown family or revision with a ClientException carrying
/// this message; other ClientExceptions (bad ARN, access) are API failures.
fn is_missing_task_definition(message: Option<&str>) -> bool {
    message.is_some_and(|m| {
        m.to_ascii_lowercase()
            .contains("unable to describe task definition")
    })
}

fn count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn snapshot_from(cluster: &str, service: &str, svc: &Service) -> ServiceSnapshot {
    ServiceSnapshot {
        cluster: cluster.to_string(),
        service: svc.service_name().unwrap_or(service).to_string(),
        task_definition: svc.task_definition().unwrap_or_default().to_string(),
        deployments: svc.deployments().len(),
        desired_count: count(svc.desired_count()),
        running_count: count(svc.running_count()),
    }
}

#[async_trait]
impl ServiceOps for EcsOrchestrator {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceSnapshot, OrchestratorError> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_cluster_not_found_exception())
                {
                    ServiceNotFoundSnafu { cluster, service }.build()
                } else {
                    ApiSnafu {
                        message: format!("describe-services: {}", DisplayErrorContext(&err)),
                    }
                    .build()
                }
            })?;

        let svc = output
            .services()
            .iter()
            .find(|s| s.status() != Some(INACTIVE))
            .context(ServiceNotFoundSnafu { cluster, service })?;

        let snapshot = snapshot_from(cluster, service, svc);
        tracing::debug!(
            cluster,
            service,
            task_definition = %snapshot.task_definition,
            deployments = snapshot.deployments,
            "described service"
        );
        Ok(snapshot)
    }

    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, OrchestratorError> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(reference)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| {
                    e.is_client_exception() && is_missing_task_definition(e.message())
                }) {
                    TaskDefinitionNotFoundSnafu { reference }.build()
                } else {
                    ApiSnafu {
                        message: format!(
                            "describe-task-definition: {}",
                            DisplayErrorContext(&err)
                        ),
                    }
                    .build()
                }
            })?;

        let td = output
            .task_definition()
            .context(TaskDefinitionNotFoundSnafu { reference })?;

        let revision = Revision::try_from(td.revision()).map_err(|e| {
            ApiSnafu {
                message: format!("task definition {}: {}", reference, e),
            }
            .build()
        })?;

        Ok(TaskDefinition {
            arn: td.task_definition_arn().unwrap_or(reference).to_string(),
            family: td.family().unwrap_or_default().to_string(),
            revision,
            images: td
                .container_definitions()
                .iter()
                .filter_map(|c| c.image().map(str::to_string))
                .collect(),
        })
    }

    async fn update_service(
        &self,
        snapshot: &ServiceSnapshot,
        task_definition: &TaskDefinition,
    ) -> Result<ServiceSnapshot, OrchestratorError> {
        let cluster = snapshot.cluster.as_str();
        let service = snapshot.service.as_str();

        // Only the task definition pointer is sent; ECS keeps every other setting.
        let output = self
            .client
            .update_service()
            .cluster(cluster)
            .service(service)
            .task_definition(&task_definition.arn)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_service_not_found_exception() || e.is_cluster_not_found_exception() => {
                    ServiceNotFoundSnafu { cluster, service }.build()
                }
                Some(e)
                    if e.is_service_not_active_exception()
                        || e.is_invalid_parameter_exception()
                        || e.is_client_exception() =>
                {
                    UpdateRejectedSnafu {
                        message: DisplayErrorContext(&err).to_string(),
                    }
                    .build()
                }
                _ => ApiSnafu {
                    message: format!("update-service: {}", DisplayErrorContext(&err)),
                }
                .build(),
            })?;

        let svc = output.service().context(ApiSnafu {
            message: "update-service returned no service",
        })?;

        Ok(snapshot_from(cluster, service, svc))
    }
}
