// ABOUTME: Docker-backed image builder.
// ABOUTME: Pings the daemon via bollard for preflight and runs `docker build` for builds.

use super::command::run_command;
use super::traits::{BuildError, ImageBuilder};
use crate::types::ImageRef;
use async_trait::async_trait;
use bollard::Docker;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Options passed to every `docker build` invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Dockerfile path, relative to the build context unless absolute.
    pub dockerfile: Option<PathBuf>,
    /// Target platform, e.g. `linux/amd64` for GPU hosts built from ARM laptops.
    pub platform: Option<String>,
    /// `--build-arg` values.
    pub build_args: BTreeMap<String, String>,
}

/// Builds images with the local Docker installation.
pub struct DockerCli {
    program: String,
    options: BuildOptions,
}

impl DockerCli {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            program: "docker".to_string(),
            options,
        }
    }

    /// Use a different docker-compatible binary (e.g. `podman`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn build_args(&self, source: &Path, images: &[ImageRef]) -> Vec<String> {
        let mut args = vec!["build".to_string()];

        if let Some(ref platform) = self.options.platform {
            args.push("--platform".to_string());
            args.push(platform.clone());
        }

        if let Some(ref dockerfile) = self.options.dockerfile {
            let path = if dockerfile.is_absolute() {
                dockerfile.clone()
            } else {
                source.join(dockerfile)
            };
            args.push("--file".to_string());
            args.push(path.display().to_string());
        }

        for (key, value) in &self.options.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{key}={value}"));
        }

        for image in images {
            args.push("--tag".to_string());
            args.push(image.to_string());
        }

        args.push(source.display().to_string());
        args
    }
}

#[async_trait]
impl ImageBuilder for DockerCli {
    async fn preflight(&self) -> Result<(), BuildError> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| BuildError::Unavailable(format!("cannot connect to docker: {e}")))?;

        let version = client
            .ping()
            .await
            .map_err(|e| BuildError::Unavailable(format!("docker daemon not responding: {e}")))?;

        tracing::debug!(ping = ?version, "docker daemon reachable");
        Ok(())
    }

    async fn build(&self, source: &Path, images: &[ImageRef]) -> Result<(), BuildError> {
        if !source.is_dir() {
            return Err(BuildError::ContextNotFound(source.display().to_string()));
        }

        let args = self.build_args(source, images);
        let output = run_command(&self.program, &args, None)
            .await
            .map_err(|e| BuildError::Unavailable(format!("{}: {e}", self.program)))?;

        if !output.success {
            return Err(BuildError::Failed {
                exit_code: output.exit_code,
                stderr: tail(&output.diagnostic(), 20),
            });
        }

        Ok(())
    }
}

/// Keep only the last `lines` lines of build output for error messages.
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
