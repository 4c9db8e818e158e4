// ABOUTME: Phase results, exit outcomes, and the final run report.
// ABOUTME: Maps terminal errors and warnings to process exit codes.

use super::error::{ReleaseError, ReleaseErrorKind};
use crate::diagnostics::Warning;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Preflight,
    Build,
    Push,
    TriggerRollout,
    AwaitConvergence,
    VerifyHealth,
    Report,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Preflight => "preflight",
            Phase::Build => "build",
            Phase::Push => "push",
            Phase::TriggerRollout => "trigger-rollout",
            Phase::AwaitConvergence => "await-convergence",
            Phase::VerifyHealth => "verify-health",
            Phase::Report => "report",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Success,
    Failed,
    Skipped,
}

/// Outcome of one pipeline phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    pub phase: Phase,
    pub status: PhaseStatus,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl PhaseResult {
    pub fn success(phase: Phase, detail: impl Into<String>) -> Self {
        Self {
            phase,
            status: PhaseStatus::Success,
            detail: detail.into(),
            cause: None,
        }
    }

    pub fn skipped(phase: Phase, detail: impl Into<String>) -> Self {
        Self {
            phase,
            status: PhaseStatus::Skipped,
            detail: detail.into(),
            cause: None,
        }
    }

    pub fn failed(phase: Phase, detail: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            phase,
            status: PhaseStatus::Failed,
            detail: detail.into(),
            cause: Some(cause.into()),
        }
    }
}

/// How a release run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitOutcome {
    Success,
    /// Mandatory phases succeeded; the liveness probe never confirmed readiness.
    HealthCheckDegraded,
    /// Rollout triggered but not observed converging within the wait budget.
    ConvergenceTimeout,
    ConfigurationError,
    BuildFailed,
    PushFailed,
    RolloutTriggerFailed,
    ConvergenceFailed,
    Interrupted,
}

impl ExitOutcome {
    /// Process exit code. Warnings exit 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitOutcome::Success
            | ExitOutcome::HealthCheckDegraded
            | ExitOutcome::ConvergenceTimeout => 0,
            ExitOutcome::ConfigurationError => 2,
            ExitOutcome::Interrupted => 130,
            ExitOutcome::BuildFailed
            | ExitOutcome::PushFailed
            | ExitOutcome::RolloutTriggerFailed
            | ExitOutcome::ConvergenceFailed => 1,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.exit_code() != 0
    }

    /// Outcome of a finished run, successful or not.
    pub fn of(result: &Result<RunReport, ReleaseError>) -> Self {
        match result {
            Ok(report) => report.outcome,
            Err(e) => e.outcome(),
        }
    }
}

impl From<ReleaseErrorKind> for ExitOutcome {
    fn from(kind: ReleaseErrorKind) -> Self {
        match kind {
            ReleaseErrorKind::Configuration => ExitOutcome::ConfigurationError,
            ReleaseErrorKind::Build => ExitOutcome::BuildFailed,
            // Login happens inside the push phase.
            ReleaseErrorKind::Auth | ReleaseErrorKind::Push => ExitOutcome::PushFailed,
            ReleaseErrorKind::RolloutTrigger => ExitOutcome::RolloutTriggerFailed,
            ReleaseErrorKind::ConvergenceFailed => ExitOutcome::ConvergenceFailed,
            ReleaseErrorKind::Interrupted => ExitOutcome::Interrupted,
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitOutcome::Success => "success",
            ExitOutcome::HealthCheckDegraded => "success (health unverified)",
            ExitOutcome::ConvergenceTimeout => "rollout still converging",
            ExitOutcome::ConfigurationError => "configuration error",
            ExitOutcome::BuildFailed => "build failed",
            ExitOutcome::PushFailed => "push failed",
            ExitOutcome::RolloutTriggerFailed => "rollout trigger failed",
            ExitOutcome::ConvergenceFailed => "rollout failed",
            ExitOutcome::Interrupted => "interrupted",
        };
        f.write_str(s)
    }
}

/// Summary of a completed (non-failing) release run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: ExitOutcome,
    /// Release image reference, when the run built one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub phases: Vec<PhaseResult>,
    pub warnings: Vec<Warning>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseResult> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}
