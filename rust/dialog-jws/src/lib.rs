#![warn(missing_docs)]

//! Trust-state evaluation for decoded JSON Web Signatures.
//!
//! This crate sits between signature verification and the authentication
//! decision. It takes a token that has already been decoded into header and
//! payload claims, together with the boolean outcome of checking its
//! signature, and derives whether the token is verified, expired or invalid.
//!
//! # Overview
//!
//! Loading a token runs three checks in order, each able to overwrite the
//! previous result:
//!
//! 1. Seed `Verified` if the caller reports a valid signature
//! 2. Mark `Invalid` if `iat` lies in the future beyond the clock skew
//! 3. Mark `Invalid` if a lifetime is required and `exp` is unusable, or
//!    `Expired` once `now >= exp + clock_skew`
//!
//! Nothing here fails: malformed claims are reported through the state and
//! its description. Callers must reject any token for which
//! [`LoadedJws::is_verified`] is `false` or either of
//! [`LoadedJws::is_expired`] and [`LoadedJws::is_invalid`] is `true`.
//!
//! # Example
//!
//! ```
//! use dialog_jws::{FixedClock, LoadedJws};
//! use serde_json::json;
//!
//! let payload = json!({ "iat": 1_500, "exp": 1_000 });
//! let jws = LoadedJws::builder(payload.as_object().unwrap().clone())
//!     .verified(true)
//!     .clock(FixedClock(1_200))
//!     .build();
//!
//! assert!(jws.is_expired());
//! assert_eq!(jws.state_description(), "Signature is expired");
//! ```

pub mod check;
pub mod claims;
pub mod clock;
pub mod error;
pub mod loaded;
pub mod settings;
pub mod state;

pub use check::{Check, fold};
pub use claims::{
    Claims, ClaimsExt, EXPIRATION, ISSUED_AT, NumericDate, Rounding, claims_from_value,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ClaimsError;
pub use loaded::{LoadedJws, LoadedJwsBuilder};
pub use settings::Validation;
pub use state::{
    CREATED_AS_VERIFIED, EXPIRATION_NOT_SET, Evaluation, ISSUED_IN_FUTURE, JwsState,
    SIGNATURE_EXPIRED,
};
