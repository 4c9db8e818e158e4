// ABOUTME: Terminal release errors with SNAFU context selectors.
// ABOUTME: Each error names its phase and preserves the collaborator's cause.

use snafu::Snafu;

use super::outcome::{ExitOutcome, Phase};
use crate::platform::{BuildError, PlatformError, RegistryError, ServiceSnapshot};

/// Errors that abort a release run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReleaseError {
    #[snafu(display("invalid configuration: {message}"))]
    Configuration { message: String },

    #[snafu(display("build toolchain unavailable: {source}"))]
    Preflight { source: BuildError },

    #[snafu(display("image build failed: {source}"))]
    Build { source: BuildError },

    #[snafu(display("registry login to {registry} failed: {source}"))]
    Auth {
        registry: String,
        source: RegistryError,
    },

    #[snafu(display("pushing {image} failed: {source}"))]
    Push {
        image: String,
        source: RegistryError,
    },

    #[snafu(display("could not trigger rollout of {service}: {source}"))]
    RolloutTrigger {
        service: String,
        source: PlatformError,
    },

    #[snafu(display(
        "platform reported the rollout failed at tick {tick} (running {}/{})",
        snapshot.running_count,
        snapshot.desired_count
    ))]
    ConvergenceFailed { tick: u32, snapshot: ServiceSnapshot },

    #[snafu(display("stop requested during {phase}"))]
    Interrupted { phase: Phase },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseErrorKind {
    Configuration,
    Build,
    Auth,
    Push,
    RolloutTrigger,
    ConvergenceFailed,
    Interrupted,
}

impl ReleaseError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ReleaseErrorKind {
        match self {
            ReleaseError::Configuration { .. } => ReleaseErrorKind::Configuration,
            ReleaseError::Preflight { .. } | ReleaseError::Build { .. } => ReleaseErrorKind::Build,
            ReleaseError::Auth { .. } => ReleaseErrorKind::Auth,
            ReleaseError::Push { .. } => ReleaseErrorKind::Push,
            ReleaseError::RolloutTrigger { .. } => ReleaseErrorKind::RolloutTrigger,
            ReleaseError::ConvergenceFailed { .. } => ReleaseErrorKind::ConvergenceFailed,
            ReleaseError::Interrupted { .. } => ReleaseErrorKind::Interrupted,
        }
    }

    /// The phase that failed.
    pub fn phase(&self) -> Phase {
        match self {
            ReleaseError::Configuration { .. } | ReleaseError::Preflight { .. } => Phase::Preflight,
            ReleaseError::Build { .. } => Phase::Build,
            ReleaseError::Auth { .. } | ReleaseError::Push { .. } => Phase::Push,
            ReleaseError::RolloutTrigger { .. } => Phase::TriggerRollout,
            ReleaseError::ConvergenceFailed { .. } => Phase::AwaitConvergence,
            ReleaseError::Interrupted { phase } => *phase,
        }
    }

    pub fn outcome(&self) -> ExitOutcome {
        self.kind().into()
    }
}
