// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release.
// ABOUTME: Collects warnings that shouldn't fail a release but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during release operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during a release.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a convergence timeout warning.
    pub fn convergence_timed_out(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ConvergenceTimedOut,
            message: message.into(),
        }
    }

    /// Create a health-unverified warning.
    pub fn health_unverified(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HealthUnverified,
            message: message.into(),
        }
    }

    /// Create a warning for ticks where the service could not be observed.
    pub fn snapshot_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SnapshotUnavailable,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Rollout did not converge within the wait budget; it may still finish.
    ConvergenceTimedOut,
    /// No liveness probe succeeded; the service may still be warming up.
    HealthUnverified,
    /// Some poll ticks could not observe the service.
    SnapshotUnavailable,
}
