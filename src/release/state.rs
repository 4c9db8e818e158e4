// ABOUTME: Release state types for the type state pattern.
// ABOUTME: Each state carries the data earned by the phases before it.

use super::convergence::ConvergenceReport;

/// Initial state: targets validated, nothing built yet.
/// Available actions: `preflight()`, `build()`, `assume_published()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Built: image exists locally under every release tag.
/// Available actions: `push()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Built;

/// Published: the image the service references is in the registry.
/// Available actions: `trigger_rollout()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Published;

/// Rollout triggered: the platform is replacing replicas.
/// Available actions: `await_convergence()`
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloutTriggered;

/// Converged: running matches desired on the new deployment.
/// Available actions: `verify_health()`
#[derive(Debug, Clone)]
pub struct Converged {
    pub(crate) report: ConvergenceReport,
}

impl Converged {
    pub fn report(&self) -> &ConvergenceReport {
        &self.report
    }
}
