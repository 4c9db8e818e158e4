// ABOUTME: Registry trait for publishing built images.
// ABOUTME: Login and push, with auth and transfer failures kept apart.

use crate::types::ImageRef;
use async_trait::async_trait;

/// Image registry operations.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Authenticate against the registry host.
    async fn login(&self, registry: &str) -> Result<(), RegistryError>;

    /// Push a locally built image.
    async fn push(&self, image: &ImageRef) -> Result<(), RegistryError>;
}

/// Errors from registry operations. Both variants end the release.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry authentication failed: {0}")]
    Auth(String),

    #[error("push failed: {0}")]
    Push(String),
}
