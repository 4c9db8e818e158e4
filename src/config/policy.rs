// ABOUTME: Convergence polling and health verification settings.
// ABOUTME: Durations are human-readable strings with conservative defaults.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvergenceConfig {
    #[serde(default = "default_max_wait", with = "humantime_serde")]
    pub max_wait: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

fn default_max_wait() -> Duration {
    Duration::from_secs(600)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(30)
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        ConvergenceConfig {
            max_wait: default_max_wait(),
            poll_interval: default_poll_interval(),
        }
    }
}

/// Liveness probing after the rollout converges.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Path appended to the health URL.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between failed attempts.
    #[serde(default = "default_delay", with = "humantime_serde")]
    pub delay: Duration,

    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_max_attempts() -> u32 {
    10
}

fn default_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            path: default_path(),
            max_attempts: default_max_attempts(),
            delay: default_delay(),
            timeout: default_timeout(),
        }
    }
}

impl HealthConfig {
    /// Join `base` and the configured path without doubling slashes.
    pub fn url(&self, base: &str) -> String {
        let base = base.trim().trim_end_matches('/');
        if base.is_empty() {
            return String::new();
        }
        let path = self.path.trim();
        if path.is_empty() || path == "/" {
            format!("{base}/")
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
