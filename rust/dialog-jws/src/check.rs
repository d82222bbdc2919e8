//! The ordered claim checks that derive a token's state.
//!
//! Each [`Check`] looks at the payload at a given instant and either leaves
//! the running [`Evaluation`] alone or replaces it. [`fold`] applies a
//! sequence of checks left to right, so a later check always has the final
//! say. Construction runs [`Check::pipeline`]:
//!
//! 1. [`Check::Verified`] seeds `Verified` when the caller vouches for the
//!    signature.
//! 2. [`Check::IssuedAt`] flags a future `iat` as `Invalid`.
//! 3. [`Check::Expiration`] flags a missing `exp` as `Invalid`, or a passed
//!    one as `Expired`. Running last, it wins over an `iat` failure.

use crate::{
    Claims, ClaimsExt, EXPIRATION_NOT_SET, Evaluation, ISSUED_IN_FUTURE, Validation,
};

/// A single step of state derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Outcome of the external signature verification.
    Verified(bool),
    /// `iat` must not lie in the future beyond the clock skew.
    IssuedAt,
    /// `exp` must be set and not yet passed, when a lifetime is required.
    Expiration,
}

impl Check {
    /// The construction-time pipeline, in order.
    pub const fn pipeline(is_verified: bool) -> [Check; 3] {
        [Check::Verified(is_verified), Check::IssuedAt, Check::Expiration]
    }

    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Check::Verified(_) => "verified",
            Check::IssuedAt => "iat",
            Check::Expiration => "exp",
        }
    }

    /// Run the check at `now` (Unix seconds).
    ///
    /// Returns `None` when the check has nothing to say, otherwise the
    /// evaluation that replaces the current one.
    pub fn run(&self, payload: &Claims, validation: &Validation, now: u64) -> Option<Evaluation> {
        let now = i64::try_from(now).unwrap_or(i64::MAX);
        let skew = validation.skew();

        match self {
            Check::Verified(true) => Some(Evaluation::verified()),
            Check::Verified(false) => None,
            Check::IssuedAt => payload
                .issued_at()
                .filter(|iat| iat.to_unix().saturating_sub(skew) > now)
                .map(|_| Evaluation::invalid(ISSUED_IN_FUTURE)),
            Check::Expiration => {
                if !validation.has_lifetime {
                    return None;
                }
                match payload.expiration() {
                    None => Some(Evaluation::invalid(EXPIRATION_NOT_SET)),
                    Some(exp) if skew <= now.saturating_sub(exp.to_unix()) => {
                        Some(Evaluation::expired())
                    }
                    Some(_) => None,
                }
            }
        }
    }
}

/// Apply `checks` in order to `start`, each able to overwrite the last.
pub fn fold(
    checks: impl IntoIterator<Item = Check>,
    start: Evaluation,
    payload: &Claims,
    validation: &Validation,
    now: u64,
) -> Evaluation {
    checks.into_iter().fold(start, |current, check| {
        match check.run(payload, validation, now) {
            Some(next) => {
                tracing::debug!(
                    check = check.name(),
                    from = %current.state,
                    to = %next.state,
                    reason = %next.description,
                    "token state changed"
                );
                next
            }
            None => current,
        }
    })
}
