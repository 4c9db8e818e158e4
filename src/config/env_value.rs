// ABOUTME: Config values that are either literals or environment references.
// ABOUTME: Provisioning outputs reach the release config through these.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A literal string, or `{ env: NAME, default: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve against the process environment.
    ///
    /// An environment reference that is unset and has no default is an error.
    /// A set-but-empty variable resolves to the empty string.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::Literal(s.to_string())
    }
}

pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.resolve().map(|resolved| (k.clone(), resolved)))
        .collect()
}
