// ABOUTME: Image build trait for release pipelines.
// ABOUTME: Builds a deployable image from a source directory under one or more tags.

use crate::types::ImageRef;
use async_trait::async_trait;
use std::path::Path;

/// Builds container images.
#[async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Check that the build toolchain is usable before any image is built.
    async fn preflight(&self) -> Result<(), BuildError> {
        Ok(())
    }

    /// Build the image at `source`, tagging it with every reference in `images`.
    ///
    /// `images` is never empty; the first entry is the release tag.
    async fn build(&self, source: &Path, images: &[ImageRef]) -> Result<(), BuildError>;
}

/// Errors from image builds.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("build tool unavailable: {0}")]
    Unavailable(String),

    #[error("build exited with {}: {stderr}", exit_display(.exit_code))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("build context not found: {0}")]
    ContextNotFound(String),
}

fn exit_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
