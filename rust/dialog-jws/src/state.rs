//! Trust states of a loaded token.

use std::fmt;

/// Reason recorded when the caller vouches for the signature.
pub const CREATED_AS_VERIFIED: &str = "Created as verified";

/// Reason recorded when `iat` lies beyond the tolerated skew.
pub const ISSUED_IN_FUTURE: &str = "Field 'iat' claim is in the future";

/// Reason recorded when a lifetime is required but `exp` is unusable.
pub const EXPIRATION_NOT_SET: &str = "Expiration timestamp is not set";

/// Reason recorded once `now >= exp + clock_skew`.
pub const SIGNATURE_EXPIRED: &str = "Signature is expired";

/// The trust state of a token.
///
/// Only [`JwsState::Verified`] means the token may be trusted. `Unset` is
/// what a token holds when the signature was not verified and no claim
/// check flagged it; callers must reject it all the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JwsState {
    /// No determination has been made.
    #[default]
    Unset,
    /// The signature was verified and no claim check failed.
    Verified,
    /// The expiration time, widened by the clock skew, has passed.
    Expired,
    /// A required claim is missing or malformed.
    Invalid,
}

impl fmt::Display for JwsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JwsState::Unset => "unset",
            JwsState::Verified => "verified",
            JwsState::Expired => "expired",
            JwsState::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// A state paired with the reason it was reached.
///
/// The two always change together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// The derived state
    pub state: JwsState,
    /// Why `state` was reached, empty while `Unset`
    pub description: String,
}

impl Evaluation {
    /// Pair a state with its reason.
    pub fn new(state: JwsState, description: impl Into<String>) -> Self {
        Self {
            state,
            description: description.into(),
        }
    }

    /// The signature was verified by the caller.
    pub fn verified() -> Self {
        Self::new(JwsState::Verified, CREATED_AS_VERIFIED)
    }

    /// A claim is missing or malformed.
    pub fn invalid(description: impl Into<String>) -> Self {
        Self::new(JwsState::Invalid, description)
    }

    /// The token outlived its expiration.
    pub fn expired() -> Self {
        Self::new(JwsState::Expired, SIGNATURE_EXPIRED)
    }
}
