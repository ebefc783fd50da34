//! Key and identity types.
//!
//! `CacheKey` names a stored value; `OpName` names a tracked operation and
//! derives the backend keys its counter and history lists live under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier for a stored value.
///
/// Generated fresh on every `store` from 128 random bits, never derived from
/// value content, never reused. The textual form is the hyphenated UUID and
/// is used literally as the backend key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(Uuid);

impl CacheKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        CacheKey(Uuid::new_v4())
    }

    /// Raw 128-bit form.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CacheKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CacheKey(Uuid::parse_str(s)?))
    }
}

/// Stable identity of a tracked operation.
///
/// The name is used literally in backend keys, so it must be stable across
/// process restarts. Unrelated operations sharing a name silently merge
/// their counters and histories.
///
/// Key scheme: the counter lives under the name itself, the history lists
/// under `<name>:inputs` and `<name>:outputs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpName(String);

impl OpName {
    /// Wrap a stable operation name.
    pub fn new(name: impl Into<String>) -> Self {
        OpName(name.into())
    }

    /// The name itself, which is also the counter key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backend key of the invocation counter.
    pub fn counter_key(&self) -> &str {
        &self.0
    }

    /// Backend key of the recorded-arguments list.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.0)
    }

    /// Backend key of the recorded-results list.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.0)
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpName {
    fn from(s: &str) -> Self {
        OpName::new(s)
    }
}

impl From<String> for OpName {
    fn from(s: String) -> Self {
        OpName::new(s)
    }
}
