// ABOUTME: Phantom-typed platform identifiers for compile-time type safety.
// ABOUTME: Prevents accidental swapping of cluster and service identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use thiserror::Error;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum ClusterMarker {}
pub enum ServiceMarker {}

/// Maximum identifier length accepted by the orchestration platform.
const MAX_ID_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier exceeds maximum length of {MAX_ID_LEN} characters")]
    TooLong,

    #[error("invalid character in identifier: '{0}'")]
    InvalidChar(char),
}

/// A validated platform identifier that cannot be mixed with other kinds.
///
/// `trigger_rollout(cluster, service)` takes a `ClusterId` and a `ServiceId`;
/// passing them the wrong way round is a compile error.
///
/// Plain names (`gpu-cluster`) and full ARNs
/// (`arn:aws:ecs:us-east-1:123456789012:cluster/gpu-cluster`) are both accepted.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: &str) -> Result<Self, IdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(IdError::Empty);
        }

        if value.len() > MAX_ID_LEN {
            return Err(IdError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | ':' | '/' | '.'))
        {
            return Err(IdError::InvalidChar(c));
        }

        Ok(Self {
            value: value.to_string(),
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual trait implementations that don't require T to implement the trait.
// This is necessary because T is only used as a phantom type marker.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}

pub type ClusterId = Id<ClusterMarker>;
pub type ServiceId = Id<ServiceMarker>;
