// ABOUTME: Immutable inputs to a release run: targets, flags, and loop policies.
// ABOUTME: Policies validate their invariants on construction.

use crate::types::ImageTag;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Invalid polling or retry policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("max wait ({max_wait:?}) must be at least the poll interval ({poll_interval:?})")]
    WaitShorterThanInterval {
        max_wait: Duration,
        poll_interval: Duration,
    },

    #[error("health check needs at least one attempt")]
    NoAttempts,
}

/// How long and how often to poll the platform for convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePolicy {
    max_wait: Duration,
    poll_interval: Duration,
}

impl ConvergencePolicy {
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Result<Self, PolicyError> {
        if poll_interval.is_zero() {
            return Err(PolicyError::ZeroPollInterval);
        }
        if max_wait < poll_interval {
            return Err(PolicyError::WaitShorterThanInterval {
                max_wait,
                poll_interval,
            });
        }
        Ok(Self {
            max_wait,
            poll_interval,
        })
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// How many liveness probes to attempt, how far apart, and against which URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthPolicy {
    max_attempts: u32,
    per_attempt_delay: Duration,
    health_url: String,
}

impl HealthPolicy {
    pub fn new(
        max_attempts: u32,
        per_attempt_delay: Duration,
        health_url: impl Into<String>,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::NoAttempts);
        }
        Ok(Self {
            max_attempts,
            per_attempt_delay,
            health_url: health_url.into(),
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn per_attempt_delay(&self) -> Duration {
        self.per_attempt_delay
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }
}

/// Which phases of the pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseFlags {
    /// Stop after the image is pushed.
    pub build_only: bool,
    /// Skip build and push; roll out whatever the service already references.
    pub skip_build: bool,
    /// Do not probe the liveness endpoint after convergence.
    pub skip_health_check: bool,
}

/// Everything a release run needs, resolved once before any phase starts.
///
/// Identifiers are kept as the opaque strings handed over by provisioning;
/// the controller validates them before its first side effect.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    /// Registry repository URL, without a tag.
    pub registry_url: String,
    pub cluster: String,
    pub service: String,
    pub region: String,
    /// Build context directory.
    pub source: PathBuf,
    /// Release tag for this run.
    pub tag: ImageTag,
    /// Also tag and push `:latest`.
    pub tag_latest: bool,
    pub flags: ReleaseFlags,
    pub convergence: ConvergencePolicy,
    pub health: HealthPolicy,
}
