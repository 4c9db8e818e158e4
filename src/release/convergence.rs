// ABOUTME: Convergence wait: polls the platform until the rollout settles or time runs out.
// ABOUTME: Failed overrides matching counts; describe errors are transient ticks.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::context::ConvergencePolicy;
use super::stop::StopSignal;
use crate::platform::{DeploymentStatus, OrchestrationPlatform, ServiceSnapshot};
use crate::types::{ClusterId, ServiceId};

/// States of the convergence wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConvergenceState {
    /// Still waiting for the rollout to settle.
    Polling,
    /// Running matches desired and the new deployment is primary.
    Converged,
    /// The platform reported the rollout as failed.
    Failed,
    /// The wait budget ran out while still polling.
    TimedOut,
    /// A stop was requested between ticks.
    Stopped,
}

impl ConvergenceState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConvergenceState::Polling)
    }
}

/// Decide the next state from one observation.
pub fn evaluate(snapshot: &ServiceSnapshot) -> ConvergenceState {
    if snapshot.deployment_status == DeploymentStatus::Failed {
        ConvergenceState::Failed
    } else if snapshot.is_converged() {
        ConvergenceState::Converged
    } else {
        ConvergenceState::Polling
    }
}

/// How a convergence wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvergenceReport {
    /// Terminal state reached.
    pub state: ConvergenceState,
    /// Observation ticks performed (successful or not).
    pub ticks: u32,
    /// Most recent successful observation.
    pub last_snapshot: Option<ServiceSnapshot>,
    /// Ticks whose describe call failed.
    pub unobserved_ticks: u32,
    pub elapsed: Duration,
}

/// Poll `platform` at the policy's cadence until a terminal state is reached.
///
/// The deadline is fixed when the wait starts. A tick whose describe call fails
/// is logged and counted but does not end the wait; if every tick fails, the
/// wait ends as `TimedOut`.
pub async fn await_convergence<P>(
    platform: &P,
    cluster: &ClusterId,
    service: &ServiceId,
    policy: &ConvergencePolicy,
    stop: &StopSignal,
) -> ConvergenceReport
where
    P: OrchestrationPlatform + ?Sized,
{
    let started = Instant::now();
    let deadline = started + policy.max_wait();

    let mut state = ConvergenceState::Polling;
    let mut ticks = 0u32;
    let mut unobserved_ticks = 0u32;
    let mut last_snapshot = None;

    tracing::info!(
        %cluster,
        %service,
        max_wait = ?policy.max_wait(),
        poll_interval = ?policy.poll_interval(),
        "waiting for service to converge"
    );

    loop {
        if Instant::now() >= deadline {
            state = ConvergenceState::TimedOut;
            tracing::warn!(
                ticks,
                elapsed = ?started.elapsed(),
                "service did not converge within the wait budget"
            );
            break;
        }

        ticks += 1;
        match platform.describe_service(cluster, service).await {
            Ok(snapshot) => {
                state = evaluate(&snapshot);
                tracing::info!(
                    tick = ticks,
                    running = snapshot.running_count,
                    desired = snapshot.desired_count,
                    status = %snapshot.deployment_status,
                    decision = ?state,
                    "observed service"
                );
                last_snapshot = Some(snapshot);
            }
            Err(e) => {
                unobserved_ticks += 1;
                tracing::warn!(tick = ticks, error = %e, "could not observe service; retrying");
            }
        }

        if state.is_terminal() {
            break;
        }

        if stop.is_requested() || stop.sleep(policy.poll_interval()).await {
            state = ConvergenceState::Stopped;
            tracing::warn!(tick = ticks, "stopping convergence wait");
            break;
        }
    }

    ConvergenceReport {
        state,
        ticks,
        last_snapshot,
        unobserved_ticks,
        elapsed: started.elapsed(),
    }
}
