//! Error types for loading token claims.

use thiserror::Error;

/// Errors raised when turning loosely typed JSON into [`Claims`].
///
/// Evaluating a token never fails; malformed claims surface as an
/// [`Invalid`] state instead. These errors only occur at the boundary where
/// a caller hands over a header or payload that is not a JSON object at all.
///
/// [`Claims`]: crate::Claims
/// [`Invalid`]: crate::JwsState::Invalid
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The value was valid JSON but not an object.
    #[error("Expected a JSON object for token claims, found {found}")]
    NotAnObject {
        /// The JSON type that was found instead
        found: &'static str,
    },
}
