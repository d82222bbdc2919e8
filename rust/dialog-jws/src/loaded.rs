//! A decoded token together with its derived trust state.

use serde_json::Value;

use crate::{
    Check, Claims, ClaimsError, Clock, Evaluation, JwsState, SystemClock, Validation,
    claims_from_value, fold,
};

/// A JSON Web Signature loaded from an existing token.
///
/// All checks run once, at construction. Afterwards the token is read-only:
/// [`is_verified`](Self::is_verified), [`is_invalid`](Self::is_invalid) and
/// [`state_description`](Self::state_description) report what was derived
/// then. [`is_expired`](Self::is_expired) alone consults the clock again,
/// since expiry moves with time while `iat` and the signature do not.
///
/// ```
/// use dialog_jws::{FixedClock, LoadedJws};
/// use serde_json::json;
///
/// let payload = json!({ "sub": "alice", "exp": 2_000 });
/// let jws = LoadedJws::builder(payload.as_object().unwrap().clone())
///     .verified(true)
///     .clock(FixedClock(1_000))
///     .build();
///
/// assert!(jws.is_verified());
/// assert!(!jws.is_expired());
/// assert!(!jws.is_invalid());
/// ```
#[derive(Debug, Clone)]
pub struct LoadedJws<C = SystemClock> {
    header: Claims,
    payload: Claims,
    validation: Validation,
    clock: C,
    /// State after the checks that do not depend on the passage of time.
    baseline: Evaluation,
    evaluation: Evaluation,
}

impl LoadedJws {
    /// Load a token with default settings against the system clock.
    ///
    /// A lifetime is required, the header is empty and no clock skew is
    /// tolerated.
    pub fn new(payload: Claims, is_verified: bool) -> Self {
        Self::with(
            payload,
            is_verified,
            Claims::new(),
            Validation::default(),
            SystemClock,
        )
    }

    /// Load a token from decoded JSON values.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::NotAnObject`] if either value is not a JSON
    /// object.
    pub fn from_json(
        header: Value,
        payload: Value,
        is_verified: bool,
        validation: Validation,
    ) -> Result<Self, ClaimsError> {
        Ok(Self::with(
            claims_from_value(payload)?,
            is_verified,
            claims_from_value(header)?,
            validation,
            SystemClock,
        ))
    }

    /// Start building a token from its payload.
    pub fn builder(payload: Claims) -> LoadedJwsBuilder {
        LoadedJwsBuilder {
            payload,
            header: Claims::new(),
            is_verified: false,
            validation: Validation::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> LoadedJws<C> {
    /// Load a token and derive its state at `clock`'s current time.
    pub fn with(
        payload: Claims,
        is_verified: bool,
        header: Claims,
        validation: Validation,
        clock: C,
    ) -> Self {
        let now = clock.now();
        let [verified, issued_at, expiration] = Check::pipeline(is_verified);
        let baseline = fold(
            [verified, issued_at],
            Evaluation::default(),
            &payload,
            &validation,
            now,
        );
        let evaluation = fold([expiration], baseline.clone(), &payload, &validation, now);

        if evaluation.state == JwsState::Unset {
            tracing::trace!("token loaded without verification");
        }

        Self {
            header,
            payload,
            validation,
            clock,
            baseline,
            evaluation,
        }
    }

    /// The decoded header claims.
    pub fn header(&self) -> &Claims {
        &self.header
    }

    /// The decoded payload claims.
    pub fn payload(&self) -> &Claims {
        &self.payload
    }

    /// Whether the token was verified and no check failed at load time.
    pub fn is_verified(&self) -> bool {
        self.evaluation.state == JwsState::Verified
    }

    /// Whether the token is expired right now.
    ///
    /// Re-runs the expiration check against the clock without touching the
    /// state recorded at load time.
    pub fn is_expired(&self) -> bool {
        self.evaluate_at(self.clock.now()).state == JwsState::Expired
    }

    /// Whether a claim was missing or malformed at load time.
    pub fn is_invalid(&self) -> bool {
        self.evaluation.state == JwsState::Invalid
    }

    /// Why the load-time state was reached, empty if no check applied.
    pub fn state_description(&self) -> &str {
        &self.evaluation.description
    }

    /// The state derived at load time.
    pub fn state(&self) -> JwsState {
        self.evaluation.state
    }

    /// The state and reason derived at load time.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Derive the state as it would be at `now` (Unix seconds).
    pub fn evaluate_at(&self, now: u64) -> Evaluation {
        fold(
            [Check::Expiration],
            self.baseline.clone(),
            &self.payload,
            &self.validation,
            now,
        )
    }

    /// Tolerated clock disagreement in seconds.
    pub fn clock_skew(&self) -> u64 {
        self.validation.clock_skew
    }

    /// Whether `exp` is required and checked.
    pub fn has_lifetime(&self) -> bool {
        self.validation.has_lifetime
    }
}

/// Builder for [`LoadedJws`].
#[derive(Debug, Clone)]
pub struct LoadedJwsBuilder<C = SystemClock> {
    payload: Claims,
    header: Claims,
    is_verified: bool,
    validation: Validation,
    clock: C,
}

impl<C: Clock> LoadedJwsBuilder<C> {
    /// Record the outcome of the external signature verification.
    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }

    /// Attach the decoded header.
    pub fn header(mut self, header: Claims) -> Self {
        self.header = header;
        self
    }

    /// Replace the validation settings.
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Tolerate `clock_skew` seconds of clock disagreement.
    pub fn clock_skew(mut self, clock_skew: u64) -> Self {
        self.validation = self.validation.with_clock_skew(clock_skew);
        self
    }

    /// Enable or disable expiration checking.
    pub fn lifetime(mut self, has_lifetime: bool) -> Self {
        self.validation = self.validation.with_lifetime(has_lifetime);
        self
    }

    /// Read the time from `clock` instead.
    pub fn clock<D: Clock>(self, clock: D) -> LoadedJwsBuilder<D> {
        LoadedJwsBuilder {
            payload: self.payload,
            header: self.header,
            is_verified: self.is_verified,
            validation: self.validation,
            clock,
        }
    }

    /// Derive the state and produce the loaded token.
    pub fn build(self) -> LoadedJws<C> {
        LoadedJws::with(
            self.payload,
            self.is_verified,
            self.header,
            self.validation,
            self.clock,
        )
    }
}
