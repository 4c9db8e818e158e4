// ABOUTME: Image build settings: context directory, Dockerfile, platform, and tagging.
// ABOUTME: Build args may reference environment variables like any other value.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build context, relative to the config file's directory.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Relative to the build context unless absolute.
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default)]
    pub args: BTreeMap<String, EnvValue>,

    /// Also tag and push `:latest`.
    #[serde(default = "default_tag_latest")]
    pub tag_latest: bool,

    /// Prefix for the generated timestamp tag.
    #[serde(default)]
    pub tag_prefix: Option<String>,
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

fn default_platform() -> String {
    "linux/amd64".to_string()
}

fn default_tag_latest() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            source: default_source(),
            dockerfile: None,
            platform: default_platform(),
            args: BTreeMap::new(),
            tag_latest: default_tag_latest(),
            tag_prefix: None,
        }
    }
}
