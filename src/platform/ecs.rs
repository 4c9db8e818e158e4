// ABOUTME: Amazon ECS orchestration platform adapter over the aws CLI.
// ABOUTME: Forces new deployments and maps describe-services JSON to ServiceSnapshot.

use super::command::run_command;
use super::traits::{DeploymentStatus, OrchestrationPlatform, PlatformError, ServiceSnapshot};
use crate::types::{ClusterId, ServiceId};
use async_trait::async_trait;
use serde::Deserialize;

/// Drives an ECS service through the aws CLI.
pub struct EcsCli {
    region: String,
    program: String,
}

impl EcsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            program: "aws".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl OrchestrationPlatform for EcsCli {
    async fn trigger_rollout(
        &self,
        cluster: &ClusterId,
        service: &ServiceId,
    ) -> Result<(), PlatformError> {
        let args = vec![
            "ecs".to_string(),
            "update-service".to_string(),
            "--cluster".to_string(),
            cluster.to_string(),
            "--service".to_string(),
            service.to_string(),
            "--force-new-deployment".to_string(),
            "--region".to_string(),
            self.region.clone(),
            "--output".to_string(),
            "json".to_string(),
        ];

        let output = run_command(&self.program, &args, None)
            .await
            .map_err(|e| PlatformError::RolloutTrigger(format!("{}: {e}", self.program)))?;

        if !output.success {
            return Err(PlatformError::RolloutTrigger(output.diagnostic()));
        }

        Ok(())
    }

    async fn describe_service(
        &self,
        cluster: &ClusterId,
        service: &ServiceId,
    ) -> Result<ServiceSnapshot, PlatformError> {
        let args = vec![
            "ecs".to_string(),
            "describe-services".to_string(),
            "--cluster".to_string(),
            cluster.to_string(),
            "--services".to_string(),
            service.to_string(),
            "--region".to_string(),
            self.region.clone(),
            "--output".to_string(),
            "json".to_string(),
        ];

        let output = run_command(&self.program, &args, None)
            .await
            .map_err(|e| PlatformError::Observability(format!("{}: {e}", self.program)))?;

        if !output.success {
            return Err(PlatformError::Observability(output.diagnostic()));
        }

        parse_describe_services(&output.stdout, service)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeServicesOutput {
    #[serde(default)]
    services: Vec<EcsService>,
    #[serde(default)]
    failures: Vec<EcsFailure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EcsService {
    #[serde(default)]
    service_name: Option<String>,
    #[serde(default)]
    running_count: u32,
    #[serde(default)]
    desired_count: u32,
    #[serde(default)]
    deployments: Vec<EcsDeployment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EcsDeployment {
    status: String,
    #[serde(default)]
    rollout_state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EcsFailure {
    #[serde(default)]
    arn: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Decode `aws ecs describe-services` output into a snapshot of `service`.
fn parse_describe_services(
    json: &str,
    service: &ServiceId,
) -> Result<ServiceSnapshot, PlatformError> {
    let output: DescribeServicesOutput = serde_json::from_str(json)
        .map_err(|e| PlatformError::Observability(format!("unreadable describe-services output: {e}")))?;

    if let Some(failure) = output.failures.first() {
        return Err(PlatformError::Observability(format!(
            "{}: {}",
            failure.arn.as_deref().unwrap_or(service.as_str()),
            failure.reason.as_deref().unwrap_or("unknown failure")
        )));
    }

    let Some(found) = output
        .services
        .iter()
        .find(|s| s.service_name.as_deref() == Some(service.as_str()))
        .or_else(|| output.services.first())
    else {
        return Ok(ServiceSnapshot::new(0, 0, DeploymentStatus::Unknown));
    };

    Ok(ServiceSnapshot::new(
        found.running_count,
        found.desired_count,
        deployment_status(&found.deployments),
    ))
}

/// Classify the PRIMARY deployment's rollout state.
fn deployment_status(deployments: &[EcsDeployment]) -> DeploymentStatus {
    let Some(primary) = deployments.iter().find(|d| d.status == "PRIMARY") else {
        return DeploymentStatus::Unknown;
    };

    match primary.rollout_state.as_deref() {
        Some("FAILED") => DeploymentStatus::Failed,
        Some("IN_PROGRESS") => DeploymentStatus::Pending,
        Some("COMPLETED") => DeploymentStatus::Primary,
        // Services without the deployment circuit breaker report no rollout
        // state; the old deployment lingering means the rollout is still draining.
        _ if deployments.len() == 1 => DeploymentStatus::Primary,
        _ => DeploymentStatus::Pending,
    }
}
