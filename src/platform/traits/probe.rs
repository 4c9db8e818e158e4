// ABOUTME: Liveness probe trait.
// ABOUTME: A single yes/no answer per call; errors and non-2xx are both "not healthy".

use async_trait::async_trait;

/// Checks whether a service answers its liveness endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, url: &str) -> bool;
}
