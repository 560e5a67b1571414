//! Service lifetimes.
//!
//! A lifetime decides whether a resolved instance is kept:
//! - [`Lifetime::Singleton`] — one instance per container that owns the registration
//! - [`Lifetime::Transient`] — new instance every time
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SandiqError;

/// Defines how long a resolved instance lives.
///
/// # Examples
/// ```
/// use sandiq_container::lifetime::Lifetime;
///
/// let lifetime: Lifetime = "singleton".parse().unwrap();
/// assert!(lifetime.is_cached());
/// assert!("scoped".parse::<Lifetime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance per container.
    ///
    /// Created on first resolve and cached on the registration. If the
    /// instance is disposable, the owning container disposes it on teardown.
    Singleton,

    /// New instance on every resolve call.
    ///
    /// Never cached and never tracked, so disposable types cannot be
    /// registered as transient.
    Transient,
}

impl Lifetime {
    /// Returns `true` if resolved instances are cached.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::Transient => write!(f, "Transient"),
        }
    }
}

impl FromStr for Lifetime {
    type Err = SandiqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "singleton" => Ok(Lifetime::Singleton),
            "transient" => Ok(Lifetime::Transient),
            other => Err(SandiqError::InvalidArgument(format!(
                "unknown lifetime {other:?}, expected \"singleton\" or \"transient\""
            ))),
        }
    }
}
