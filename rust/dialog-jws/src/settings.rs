//! Validation settings.

use serde::{Deserialize, Serialize};

/// How temporal claims are checked.
///
/// Deserializes with defaults for any missing field, so it can sit inside a
/// larger application config:
///
/// ```
/// use dialog_jws::Validation;
///
/// let settings: Validation = serde_json::from_str(r#"{ "clock_skew": 30 }"#).unwrap();
/// assert_eq!(settings, Validation::default().with_clock_skew(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// Require and check `exp`. When `false` the token never expires.
    pub has_lifetime: bool,
    /// Seconds of tolerated disagreement between issuer and verifier clocks.
    pub clock_skew: u64,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            has_lifetime: true,
            clock_skew: 0,
        }
    }
}

impl Validation {
    /// Set the clock skew tolerance in seconds.
    #[must_use]
    pub fn with_clock_skew(mut self, clock_skew: u64) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    /// Enable or disable expiration checking.
    #[must_use]
    pub fn with_lifetime(mut self, has_lifetime: bool) -> Self {
        self.has_lifetime = has_lifetime;
        self
    }

    /// Skip expiration checking entirely.
    #[must_use]
    pub fn without_lifetime(self) -> Self {
        self.with_lifetime(false)
    }

    /// The skew as a signed offset, saturating at `i64::MAX`.
    pub(crate) fn skew(&self) -> i64 {
        i64::try_from(self.clock_skew).unwrap_or(i64::MAX)
    }
}
