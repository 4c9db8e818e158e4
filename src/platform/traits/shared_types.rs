// ABOUTME: Shared types used across collaborator trait definitions.
// ABOUTME: ServiceSnapshot and DeploymentStatus.

use serde::Serialize;
use std::fmt;

/// Rollout state the platform reports for the service's newest deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// A rollout is still in progress.
    Pending,
    /// The newest deployment is the only serving one.
    Primary,
    /// The platform gave up on the rollout.
    Failed,
    /// The platform reported nothing usable.
    Unknown,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Primary => "primary",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Point-in-time observation of the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceSnapshot {
    pub running_count: u32,
    pub desired_count: u32,
    pub deployment_status: DeploymentStatus,
}

impl ServiceSnapshot {
    pub fn new(running_count: u32, desired_count: u32, deployment_status: DeploymentStatus) -> Self {
        Self {
            running_count,
            desired_count,
            deployment_status,
        }
    }

    /// Replica counts match and the platform reports the rollout done.
    pub fn is_converged(&self) -> bool {
        self.running_count == self.desired_count
            && self.deployment_status == DeploymentStatus::Primary
    }
}
