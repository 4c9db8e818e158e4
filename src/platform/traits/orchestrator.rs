// ABOUTME: Orchestration platform trait for rolling out and observing services.
// ABOUTME: Trigger a rollout and describe the service's replica state.

use super::shared_types::ServiceSnapshot;
use crate::types::{ClusterId, ServiceId};
use async_trait::async_trait;

/// Operations against the cluster platform running the service.
#[async_trait]
pub trait OrchestrationPlatform: Send + Sync {
    /// Ask the platform to replace running replicas with ones using the current image.
    ///
    /// Idempotent: calling it again simply requests another rollout.
    async fn trigger_rollout(
        &self,
        cluster: &ClusterId,
        service: &ServiceId,
    ) -> Result<(), PlatformError>;

    /// Observe the service's running/desired counts and deployment status.
    async fn describe_service(
        &self,
        cluster: &ClusterId,
        service: &ServiceId,
    ) -> Result<ServiceSnapshot, PlatformError>;
}

/// Errors from platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("rollout trigger failed: {0}")]
    RolloutTrigger(String),

    #[error("service state unavailable: {0}")]
    Observability(String),
}
