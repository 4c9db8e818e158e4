// ABOUTME: State transition methods for the release pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::path::Path;

use snafu::ResultExt;

use crate::platform::{HealthProbe, ImageBuilder, OrchestrationPlatform, Registry};

use super::Release;
use super::context::{ConvergencePolicy, HealthPolicy};
use super::convergence::{ConvergenceReport, ConvergenceState, await_convergence};
use super::error::{
    AuthSnafu, BuildSnafu, PreflightSnafu, PushSnafu, ReleaseError, RolloutTriggerSnafu,
};
use super::health::{HealthReport, verify_health};
use super::outcome::Phase;
use super::state::{Built, Converged, Published, Resolved, RolloutTriggered};
use super::stop::StopSignal;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Release<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Release<T> {
        Release {
            repository: self.repository,
            cluster: self.cluster,
            service: self.service,
            images: self.images,
            state,
        }
    }
}

// =============================================================================
// Resolved -> Built | Published
// =============================================================================

impl Release<Resolved> {
    /// Check that the build toolchain is usable.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::Preflight` if the builder is unavailable.
    pub async fn preflight<B: ImageBuilder + ?Sized>(&self, builder: &B) -> Result<(), ReleaseError> {
        builder.preflight().await.context(PreflightSnafu)
    }

    /// Build the image from `source` under every release tag.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::Build` if the build tool fails.
    #[must_use = "release state must be used"]
    pub async fn build<B: ImageBuilder + ?Sized>(
        self,
        builder: &B,
        source: &Path,
    ) -> Result<Release<Built>, ReleaseError> {
        builder.build(source, &self.images).await.context(BuildSnafu)?;
        Ok(self.transition(Built))
    }

    /// Skip build and push: the service rolls out whatever its task definition
    /// already references.
    pub fn assume_published(self) -> Release<Published> {
        self.transition(Published)
    }
}

// =============================================================================
// Built -> Published
// =============================================================================

impl Release<Built> {
    /// Log in to the registry and push every release tag.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::Auth` if login fails, or `ReleaseError::Push` on
    /// the first tag that fails to upload. Later tags are not attempted.
    #[must_use = "release state must be used"]
    pub async fn push<R: Registry + ?Sized>(
        self,
        registry: &R,
    ) -> Result<Release<Published>, ReleaseError> {
        let host = self
            .repository
            .registry()
            .unwrap_or("docker.io")
            .to_string();

        registry.login(&host).await.context(AuthSnafu {
            registry: host.clone(),
        })?;
        tracing::debug!(registry = %host, "registry login succeeded");

        for image in &self.images {
            registry.push(image).await.context(PushSnafu {
                image: image.to_string(),
            })?;
            tracing::info!(%image, "pushed image");
        }

        Ok(self.transition(Published))
    }
}

// =============================================================================
// Published -> RolloutTriggered
// =============================================================================

impl Release<Published> {
    /// Ask the platform to replace the service's replicas.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::RolloutTrigger` if the platform rejects the request.
    #[must_use = "release state must be used"]
    pub async fn trigger_rollout<P: OrchestrationPlatform + ?Sized>(
        self,
        platform: &P,
    ) -> Result<Release<RolloutTriggered>, ReleaseError> {
        platform
            .trigger_rollout(&self.cluster, &self.service)
            .await
            .context(RolloutTriggerSnafu {
                service: self.service.to_string(),
            })?;
        Ok(self.transition(RolloutTriggered))
    }
}

// =============================================================================
// RolloutTriggered -> Converged
// =============================================================================

/// Non-failing end of the convergence wait.
#[derive(Debug)]
pub enum Convergence {
    Converged(Release<Converged>),
    /// The rollout may still finish; nothing more is done in this run.
    TimedOut(ConvergenceReport),
}

impl Release<RolloutTriggered> {
    /// Poll the platform until the rollout converges, fails, or the policy's
    /// wait budget runs out.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::ConvergenceFailed` if the platform reports the
    /// rollout failed, or `ReleaseError::Interrupted` if a stop was requested.
    pub async fn await_convergence<P: OrchestrationPlatform + ?Sized>(
        self,
        platform: &P,
        policy: &ConvergencePolicy,
        stop: &StopSignal,
    ) -> Result<Convergence, ReleaseError> {
        let report = await_convergence(platform, &self.cluster, &self.service, policy, stop).await;

        match report.state {
            ConvergenceState::Converged => Ok(Convergence::Converged(
                self.transition(Converged { report }),
            )),
            ConvergenceState::TimedOut => Ok(Convergence::TimedOut(report)),
            ConvergenceState::Failed => Err(ReleaseError::ConvergenceFailed {
                tick: report.ticks,
                snapshot: report
                    .last_snapshot
                    .expect("failed state is only reached from an observation"),
            }),
            ConvergenceState::Stopped | ConvergenceState::Polling => {
                Err(ReleaseError::Interrupted {
                    phase: Phase::AwaitConvergence,
                })
            }
        }
    }
}

// =============================================================================
// Converged - Terminal State
// =============================================================================

impl Release<Converged> {
    /// Probe the service's liveness endpoint. Never fails the release.
    pub async fn verify_health<H: HealthProbe + ?Sized>(
        &self,
        probe: &H,
        policy: &HealthPolicy,
        stop: &StopSignal,
    ) -> HealthReport {
        verify_health(probe, policy, stop).await
    }

    pub fn convergence(&self) -> &ConvergenceReport {
        &self.state.report
    }
}
