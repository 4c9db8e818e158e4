// ABOUTME: Container image references and release tags.
// ABOUTME: Parses registry repository URLs and generates timestamp-based tags.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),

    #[error("invalid image tag: {0}")]
    InvalidTag(String),
}

/// A registry repository, e.g. `123456789012.dkr.ecr.us-east-1.amazonaws.com/inference`.
///
/// The registry endpoint handed over by provisioning is a repository URL
/// without a tag; tags are attached per release with [`Repository::tagged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    registry: Option<String>,
    name: String,
}

impl Repository {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        let input = input
            .strip_prefix("https://")
            .or_else(|| input.strip_prefix("http://"))
            .unwrap_or(input)
            .trim_end_matches('/');

        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_') {
                return Err(ParseImageRefError::InvalidChar(c));
            }
        }

        // A colon in the last path segment is a tag, which a repository must not carry.
        let last_segment = input.rsplit('/').next().unwrap_or(input);
        if last_segment.contains(':') {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        // A registry is present if the first component contains a dot or colon,
        // or is "localhost"
        let (registry, name) = match input.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), rest.to_string())
            }
            _ => (None, input.to_string()),
        };

        if name.is_empty() || name.split('/').any(str::is_empty) {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        Ok(Self { registry, name })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference this repository at a specific tag.
    pub fn tagged(&self, tag: &ImageTag) -> ImageRef {
        ImageRef {
            repository: self.clone(),
            tag: tag.clone(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A Docker image tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    /// Maximum tag length accepted by Docker registries.
    const MAX_LEN: usize = 128;

    pub fn new(value: &str) -> Result<Self, ParseImageRefError> {
        let value = value.trim();
        let mut chars = value.chars();
        let valid_first = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

        if !valid_first || !valid_rest || value.len() > Self::MAX_LEN {
            return Err(ParseImageRefError::InvalidTag(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    /// The moving tag the running service's task definition points at.
    pub fn latest() -> Self {
        Self("latest".to_string())
    }

    /// Generate a release tag from a point in time, e.g. `20261016-142501`.
    ///
    /// An optional prefix is joined with a hyphen (`api-20261016-142501`).
    pub fn from_timestamp(at: DateTime<Utc>, prefix: Option<&str>) -> Result<Self, ParseImageRefError> {
        let stamp = at.format("%Y%m%d-%H%M%S").to_string();
        match prefix.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prefix) => Self::new(&format!("{prefix}-{stamp}")),
            None => Self::new(&stamp),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully qualified, tagged image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: Repository,
    tag: ImageTag,
}

impl ImageRef {
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn tag(&self) -> &ImageTag {
        &self.tag
    }

    /// Registry host used for `docker login`, if the reference names one.
    pub fn registry(&self) -> Option<&str> {
        self.repository.registry()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
