// ABOUTME: Configuration types and parsing for release.yml.
// ABOUTME: Resolves env references and policies into a ReleaseContext.

mod build;
mod env_value;
mod init;
mod policy;

pub use build::BuildConfig;
pub use env_value::{EnvValue, resolve_env_map};
pub use init::init_config;
pub use policy::{ConvergenceConfig, HealthConfig};

use crate::error::{Error, Result};
use crate::platform::BuildOptions;
use crate::release::{ConvergencePolicy, HealthPolicy, ReleaseContext, ReleaseFlags};
use crate::types::ImageTag;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "release.yml";
pub const CONFIG_FILENAME_ALT: &str = "release.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".release/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Registry repository URL, without a tag.
    pub registry: EnvValue,
    pub cluster: EnvValue,
    pub service: EnvValue,
    pub region: EnvValue,

    /// Base URL of the running service. Only needed when health is verified.
    #[serde(default)]
    pub health_url: Option<EnvValue>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub convergence: ConvergenceConfig,

    #[serde(default)]
    pub health: HealthConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip, default = "default_base_dir")]
    base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Command-line choices layered over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub flags: ReleaseFlags,
    /// Use this tag instead of a generated timestamp tag.
    pub tag: Option<String>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.base_dir = config_root(parent);
        }
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "using config file");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Build context directory, resolved against the config's location.
    pub fn source(&self) -> PathBuf {
        self.base_dir.join(&self.build.source)
    }

    /// Resolve every value and policy into the inputs of one release run.
    ///
    /// Identifier validation is left to the controller; this only fails on
    /// unresolvable env references, invalid tags, and invalid policies.
    pub fn into_context(&self, overrides: &Overrides, now: DateTime<Utc>) -> Result<ReleaseContext> {
        let flags = overrides.flags;

        let tag = match &overrides.tag {
            Some(tag) => ImageTag::new(tag).map_err(|e| Error::InvalidConfig(format!("tag: {e}")))?,
            None => ImageTag::from_timestamp(now, self.build.tag_prefix.as_deref())
                .map_err(|e| Error::InvalidConfig(format!("tag_prefix: {e}")))?,
        };

        let health_needed = !flags.build_only && !flags.skip_health_check;
        let health_base = match &self.health_url {
            Some(value) if health_needed => value.resolve()?,
            Some(value) => value.resolve().unwrap_or_default(),
            None => String::new(),
        };

        let convergence =
            ConvergencePolicy::new(self.convergence.max_wait, self.convergence.poll_interval)?;
        let health = HealthPolicy::new(
            self.health.max_attempts,
            self.health.delay,
            self.health.url(&health_base),
        )?;

        Ok(ReleaseContext {
            registry_url: self.registry.resolve()?,
            cluster: self.cluster.resolve()?,
            service: self.service.resolve()?,
            region: self.region.resolve()?,
            source: self.source(),
            tag,
            tag_latest: self.build.tag_latest,
            flags,
            convergence,
            health,
        })
    }

    /// Options for the image builder, with build args resolved.
    pub fn build_options(&self) -> Result<BuildOptions> {
        Ok(BuildOptions {
            dockerfile: self.build.dockerfile.clone(),
            platform: Some(self.build.platform.clone()).filter(|p| !p.trim().is_empty()),
            build_args: resolve_env_map(&self.build.args)?,
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        self.health.timeout
    }
}

/// `.release/config.yml` lives one level below the project root.
fn config_root(parent: &Path) -> PathBuf {
    if parent.file_name().is_some_and(|name| name == ".release") {
        parent.parent().unwrap_or(parent).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}
