// ABOUTME: Release controller: sequences phases with fail-fast semantics.
// ABOUTME: Owns the convergence and health sub-loops and builds the final report.

use tokio::time::Instant;

use crate::diagnostics::{Diagnostics, Warning};
use crate::platform::{HealthProbe, ImageBuilder, OrchestrationPlatform, Registry};

use super::Release;
use super::context::ReleaseContext;
use super::error::ReleaseError;
use super::health::HealthVerdict;
use super::outcome::{ExitOutcome, Phase, PhaseResult, RunReport};
use super::stop::StopSignal;
use super::transitions::Convergence;

/// The external collaborators a release drives.
pub struct Collaborators<B, R, P, H> {
    pub builder: B,
    pub registry: R,
    pub platform: P,
    pub probe: H,
}

/// Runs a release pipeline against a set of collaborators.
pub struct Controller<B, R, P, H> {
    collaborators: Collaborators<B, R, P, H>,
    stop: StopSignal,
}

impl<B, R, P, H> Controller<B, R, P, H>
where
    B: ImageBuilder,
    R: Registry,
    P: OrchestrationPlatform,
    H: HealthProbe,
{
    pub fn new(collaborators: Collaborators<B, R, P, H>) -> Self {
        Self {
            collaborators,
            stop: StopSignal::new(),
        }
    }

    /// Use an externally controlled stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn collaborators(&self) -> &Collaborators<B, R, P, H> {
        &self.collaborators
    }

    /// Run every phase the context's flags select.
    ///
    /// Returns a report for successful and degraded runs (health unverified,
    /// convergence still in progress). Terminal failures return the error of
    /// the phase that failed; no later phase runs. A stop requested before a
    /// mandatory phase starts ends the run as interrupted at that phase; a stop
    /// during health verification only degrades the result.
    pub async fn run(&self, ctx: &ReleaseContext) -> Result<RunReport, ReleaseError> {
        let started = Instant::now();
        let mut phases = Vec::new();
        let mut diag = Diagnostics::default();
        let flags = ctx.flags;

        // Preflight
        enter(Phase::Preflight);
        let release = Release::resolve(ctx).inspect_err(|e| fail(e))?;
        if !flags.skip_build {
            release
                .preflight(&self.collaborators.builder)
                .await
                .inspect_err(|e| fail(e))?;
        }
        phases.push(PhaseResult::success(
            Phase::Preflight,
            format!("releasing {} to {}/{}", release.image(), release.cluster(), release.service()),
        ));

        // Build + Push
        let image = (!flags.skip_build).then(|| release.image().to_string());
        let release = if flags.skip_build {
            phases.push(PhaseResult::skipped(Phase::Build, "--skip-build"));
            phases.push(PhaseResult::skipped(Phase::Push, "--skip-build"));
            release.assume_published()
        } else {
            self.checkpoint(Phase::Build)?;
            enter(Phase::Build);
            let built = release
                .build(&self.collaborators.builder, &ctx.source)
                .await
                .inspect_err(|e| fail(e))?;
            phases.push(PhaseResult::success(
                Phase::Build,
                format!("built {}", join_images(built.images())),
            ));

            self.checkpoint(Phase::Push)?;
            enter(Phase::Push);
            let published = built
                .push(&self.collaborators.registry)
                .await
                .inspect_err(|e| fail(e))?;
            phases.push(PhaseResult::success(
                Phase::Push,
                format!("pushed {}", join_images(published.images())),
            ));
            published
        };

        if flags.build_only {
            for phase in [Phase::TriggerRollout, Phase::AwaitConvergence, Phase::VerifyHealth] {
                phases.push(PhaseResult::skipped(phase, "--build-only"));
            }
            return Ok(finish(ExitOutcome::Success, image, phases, diag, started));
        }

        // Trigger Rollout
        self.checkpoint(Phase::TriggerRollout)?;
        enter(Phase::TriggerRollout);
        let triggered = release
            .trigger_rollout(&self.collaborators.platform)
            .await
            .inspect_err(|e| fail(e))?;
        phases.push(PhaseResult::success(
            Phase::TriggerRollout,
            format!("new deployment requested for {}", triggered.service()),
        ));

        // Await Convergence
        self.checkpoint(Phase::AwaitConvergence)?;
        enter(Phase::AwaitConvergence);
        let convergence = triggered
            .await_convergence(&self.collaborators.platform, &ctx.convergence, &self.stop)
            .await
            .inspect_err(|e| fail(e))?;

        let converged = match convergence {
            Convergence::Converged(converged) => converged,
            Convergence::TimedOut(report) => {
                let detail = match report.last_snapshot {
                    Some(s) => format!(
                        "still converging after {} ticks (running {}/{}, {})",
                        report.ticks, s.running_count, s.desired_count, s.deployment_status
                    ),
                    None => format!(
                        "service state unavailable for all {} ticks",
                        report.ticks
                    ),
                };
                diag.warn(Warning::convergence_timed_out(format!(
                    "rollout of {} did not converge within {:?}: {detail}",
                    ctx.service,
                    ctx.convergence.max_wait()
                )));
                phases.push(PhaseResult::failed(
                    Phase::AwaitConvergence,
                    "timed out",
                    detail,
                ));
                phases.push(PhaseResult::skipped(
                    Phase::VerifyHealth,
                    "service did not converge",
                ));
                return Ok(finish(
                    ExitOutcome::ConvergenceTimeout,
                    image,
                    phases,
                    diag,
                    started,
                ));
            }
        };

        let report = converged.convergence();
        if report.unobserved_ticks > 0 {
            diag.warn(Warning::snapshot_unavailable(format!(
                "service state was unavailable for {} of {} ticks",
                report.unobserved_ticks, report.ticks
            )));
        }
        phases.push(PhaseResult::success(
            Phase::AwaitConvergence,
            format!("converged after {} ticks", report.ticks),
        ));

        // Verify Health
        if flags.skip_health_check {
            phases.push(PhaseResult::skipped(Phase::VerifyHealth, "--skip-health-check"));
            return Ok(finish(ExitOutcome::Success, image, phases, diag, started));
        }

        enter(Phase::VerifyHealth);
        let health = converged
            .verify_health(&self.collaborators.probe, &ctx.health, &self.stop)
            .await;

        let outcome = match health.verdict {
            HealthVerdict::Healthy => {
                phases.push(PhaseResult::success(
                    Phase::VerifyHealth,
                    format!("healthy after {} attempt(s)", health.attempts),
                ));
                ExitOutcome::Success
            }
            HealthVerdict::Unverified => {
                diag.warn(Warning::health_unverified(format!(
                    "{} did not answer successfully after {} attempt(s)",
                    ctx.health.health_url(),
                    health.attempts
                )));
                phases.push(PhaseResult::failed(
                    Phase::VerifyHealth,
                    "unverified",
                    format!("no successful probe in {} attempt(s)", health.attempts),
                ));
                ExitOutcome::HealthCheckDegraded
            }
            HealthVerdict::Interrupted => {
                diag.warn(Warning::health_unverified(format!(
                    "stop requested after {} attempt(s); rollout completed but {} was not verified",
                    health.attempts,
                    ctx.health.health_url()
                )));
                phases.push(PhaseResult::failed(
                    Phase::VerifyHealth,
                    "interrupted",
                    format!("stopped after {} attempt(s)", health.attempts),
                ));
                ExitOutcome::HealthCheckDegraded
            }
        };

        Ok(finish(outcome, image, phases, diag, started))
    }

    /// Refuse to start `next` once a stop has been requested.
    fn checkpoint(&self, next: Phase) -> Result<(), ReleaseError> {
        if !self.stop.is_requested() {
            return Ok(());
        }
        let err = ReleaseError::Interrupted { phase: next };
        fail(&err);
        Err(err)
    }
}

fn enter(phase: Phase) {
    tracing::info!(%phase, "phase started");
}

fn fail(error: &ReleaseError) {
    tracing::error!(phase = %error.phase(), error = %error, "phase failed");
}

fn finish(
    outcome: ExitOutcome,
    image: Option<String>,
    mut phases: Vec<PhaseResult>,
    diag: Diagnostics,
    started: Instant,
) -> RunReport {
    phases.push(PhaseResult::success(Phase::Report, outcome.to_string()));
    tracing::info!(phase = %Phase::Report, %outcome, warnings = diag.warnings().len(), "release finished");

    RunReport {
        outcome,
        image,
        phases,
        warnings: diag.into_warnings(),
        elapsed: started.elapsed(),
    }
}

fn join_images(images: &[crate::types::ImageRef]) -> String {
    images
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
