//! Decoded header and payload claims.
//!
//! Claims arrive already decoded. Only the registered temporal claims `iat`
//! and `exp` are interpreted here; every other key passes through untouched.

use serde_json::{Map, Value};

use crate::ClaimsError;

/// A decoded header or payload: string keys mapped to arbitrary JSON values.
pub type Claims = Map<String, Value>;

/// Issued-at claim name.
pub const ISSUED_AT: &str = "iat";

/// Expiration claim name.
pub const EXPIRATION: &str = "exp";

/// A whole number of seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate(i64);

/// How a fractional or out-of-range claim becomes whole seconds.
///
/// Out-of-range values always saturate at `i64::MIN`/`i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Drop the fraction.
    TowardZero,
    /// Round up to the next whole second.
    ///
    /// Against a whole-second clock, `now - skew >= exp` holds exactly when
    /// it holds for `exp` rounded up, so expiry is neither early nor late.
    Up,
}

impl NumericDate {
    /// Wrap a Unix timestamp.
    #[must_use]
    pub const fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    /// The Unix timestamp in seconds.
    #[must_use]
    pub const fn to_unix(self) -> i64 {
        self.0
    }

    /// Strict numeric reading: JSON numbers and fully numeric strings.
    ///
    /// Surrounding whitespace and exponent notation are accepted in strings.
    /// Returns `None` for any other value.
    pub fn parse(value: &Value, rounding: Rounding) -> Option<Self> {
        let number = match value {
            Value::Number(number) => number
                .as_i64()
                .map(Number::Whole)
                .or_else(|| number.as_f64().map(Number::Real)),
            Value::String(text) => {
                let text = text.trim();
                let prefix = numeric_prefix(text);
                (!prefix.is_empty() && prefix.len() == text.len())
                    .then(|| Number::read(prefix))
                    .flatten()
            }
            _ => None,
        };
        number.map(|number| Self(number.round(rounding)))
    }

    /// Lenient reading used for `iat`, truncating toward zero.
    ///
    /// Strings are read up to their first non-numeric character, booleans
    /// count as `0`/`1` and arrays or objects as `0` when empty and `1`
    /// otherwise. Anything without a leading number counts as `0`, so a
    /// garbage `iat` is never treated as lying in the future.
    pub fn coerce(value: &Value) -> Self {
        let secs = match value {
            Value::Null => 0,
            Value::Bool(flag) => i64::from(*flag),
            Value::Array(items) => i64::from(!items.is_empty()),
            Value::Object(map) => i64::from(!map.is_empty()),
            Value::String(text) => Number::read(numeric_prefix(text.trim_start()))
                .map_or(0, |number| number.round(Rounding::TowardZero)),
            Value::Number(_) => Self::parse(value, Rounding::TowardZero).map_or(0, Self::to_unix),
        };
        Self(secs)
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Whole(i64),
    Real(f64),
}

impl Number {
    fn read(text: &str) -> Option<Self> {
        text.parse::<i64>()
            .map(Number::Whole)
            .ok()
            .or_else(|| text.parse::<f64>().ok().map(Number::Real))
    }

    /// Float to int casts saturate, infinities included.
    fn round(self, rounding: Rounding) -> i64 {
        match (self, rounding) {
            (Number::Whole(secs), _) => secs,
            (Number::Real(secs), Rounding::TowardZero) => secs.trunc() as i64,
            (Number::Real(secs), Rounding::Up) => secs.ceil() as i64,
        }
    }
}

/// The longest prefix of `text` that reads as a decimal number, with
/// optional sign, fraction and exponent. Empty if there is none.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        let mut end = start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut has_digits = integer_end > end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        if has_digits || fraction_end > end + 1 {
            has_digits = true;
            end = fraction_end;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }
    &text[..end]
}

/// Typed access to the temporal claims of a [`Claims`] map.
pub trait ClaimsExt {
    /// The `iat` claim, if present and not `null`.
    fn issued_at(&self) -> Option<NumericDate>;

    /// The `exp` claim, if present and numeric, rounded up to whole seconds.
    fn expiration(&self) -> Option<NumericDate>;
}

impl ClaimsExt for Claims {
    fn issued_at(&self) -> Option<NumericDate> {
        match self.get(ISSUED_AT) {
            None | Some(Value::Null) => None,
            Some(value) => Some(NumericDate::coerce(value)),
        }
    }

    fn expiration(&self) -> Option<NumericDate> {
        self.get(EXPIRATION).and_then(|exp| NumericDate::parse(exp, Rounding::Up))
    }
}

/// Convert a decoded JSON value into [`Claims`].
///
/// # Errors
///
/// Returns [`ClaimsError::NotAnObject`] unless `value` is a JSON object.
pub fn claims_from_value(value: Value) -> Result<Claims, ClaimsError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClaimsError::NotAnObject {
            found: json_type(&other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
