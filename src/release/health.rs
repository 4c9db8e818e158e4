// ABOUTME: Post-rollout liveness verification with a fixed number of attempts.
// ABOUTME: Never fails the release; an unconfirmed service is reported as degraded.

use serde::Serialize;

use super::context::HealthPolicy;
use super::stop::StopSignal;
use crate::platform::HealthProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthVerdict {
    /// A probe succeeded.
    Healthy,
    /// Every attempt failed; the service may still be warming up.
    Unverified,
    /// A stop was requested before the attempts ran out.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub verdict: HealthVerdict,
    /// Probe calls made.
    pub attempts: u32,
}

/// Probe the policy's URL up to `max_attempts` times, `per_attempt_delay` apart.
///
/// Stops at the first successful probe. There is no delay before the first
/// attempt and none after the last.
pub async fn verify_health<H>(probe: &H, policy: &HealthPolicy, stop: &StopSignal) -> HealthReport
where
    H: HealthProbe + ?Sized,
{
    let max_attempts = policy.max_attempts();
    let url = policy.health_url();

    for attempt in 1..=max_attempts {
        if probe.check(url).await {
            tracing::info!(attempt, max_attempts, url, "service is healthy");
            return HealthReport {
                verdict: HealthVerdict::Healthy,
                attempts: attempt,
            };
        }

        tracing::info!(attempt, max_attempts, url, "service not healthy yet");

        if attempt == max_attempts {
            break;
        }

        if stop.is_requested() || stop.sleep(policy.per_attempt_delay()).await {
            tracing::warn!(attempt, "stopping health verification");
            return HealthReport {
                verdict: HealthVerdict::Interrupted,
                attempts: attempt,
            };
        }
    }

    tracing::warn!(
        attempts = max_attempts,
        url,
        "liveness not confirmed; service may still be warming up"
    );
    HealthReport {
        verdict: HealthVerdict::Unverified,
        attempts: max_attempts,
    }
}
