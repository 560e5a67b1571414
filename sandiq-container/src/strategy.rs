//! Resolution strategies.
//!
//! A strategy selects which containers of the hierarchy a resolve call
//! may consult:
//!
//! | strategy   | `resolve_one`                              | `resolve_many`                         |
//! |------------|--------------------------------------------|----------------------------------------|
//! | `Local`    | this container only                        | this container only                    |
//! | `NonLocal` | the parent, resolving with `Any`           | the parent, resolving with `Any`       |
//! | `Any`      | nearest container that has any match       | own matches + ancestors' unshadowed    |
//!
//! The strategy of a top-level call is propagated into every constructor
//! parameter it resolves, so a `Local` resolve never satisfies a transitive
//! dependency from an ancestor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SandiqError;

/// Which containers a resolution may look into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStrategy {
    /// Only the container the call was issued on.
    Local,
    /// Only the ancestors of the container the call was issued on.
    #[serde(alias = "non_local", alias = "non-local")]
    NonLocal,
    /// The container and all of its ancestors.
    #[default]
    Any,
}

impl fmt::Display for ResolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveStrategy::Local => write!(f, "Local"),
            ResolveStrategy::NonLocal => write!(f, "NonLocal"),
            ResolveStrategy::Any => write!(f, "Any"),
        }
    }
}

impl FromStr for ResolveStrategy {
    type Err = SandiqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ResolveStrategy::Local),
            "nonlocal" | "non_local" | "non-local" => Ok(ResolveStrategy::NonLocal),
            "any" => Ok(ResolveStrategy::Any),
            other => Err(SandiqError::InvalidArgument(format!(
                "unknown resolve strategy {other:?}, expected \"local\", \"nonlocal\" or \"any\""
            ))),
        }
    }
}
