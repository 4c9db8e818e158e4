// ABOUTME: Release orchestration using the type state pattern.
// ABOUTME: Exports the controller, state markers, policies, and outcome types.

mod context;
mod controller;
mod convergence;
mod error;
mod health;
mod outcome;
mod pipeline;
mod state;
mod stop;
mod transitions;

pub use context::{ConvergencePolicy, HealthPolicy, PolicyError, ReleaseContext, ReleaseFlags};
pub use controller::{Collaborators, Controller};
pub use convergence::{ConvergenceReport, ConvergenceState, await_convergence, evaluate};
pub use error::{ReleaseError, ReleaseErrorKind};
pub use health::{HealthReport, HealthVerdict, verify_health};
pub use outcome::{ExitOutcome, Phase, PhaseResult, PhaseStatus, RunReport};
pub use pipeline::Release;
pub use state::{Built, Converged, Published, Resolved, RolloutTriggered};
pub use stop::StopSignal;
pub use transitions::Convergence;
