//! Integration tests for token state derivation.
//!
//! Time is injected through fixed and manually advanced clocks so each
//! scenario can be pinned to an exact instant.

use std::cell::Cell;

use dialog_jws::{
    Claims, Evaluation, FixedClock, JwsState, LoadedJws, Validation, claims_from_value,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};
use testresult::TestResult;

const T: u64 = 1_700_000_000;

fn claims(value: Value) -> Result<Claims, dialog_jws::ClaimsError> {
    claims_from_value(value)
}

fn load(
    payload: Claims,
    is_verified: bool,
    validation: Validation,
    now: u64,
) -> LoadedJws<FixedClock> {
    LoadedJws::builder(payload)
        .verified(is_verified)
        .validation(validation)
        .clock(FixedClock(now))
        .build()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn it_reports_a_passed_expiration() -> TestResult {
    let jws = load(
        claims(json!({ "exp": T - 100 }))?,
        false,
        Validation::default(),
        T,
    );

    assert!(jws.is_expired());
    assert_eq!(jws.state_description(), "Signature is expired");
    Ok(())
}

#[test]
fn it_requires_an_expiration_when_lifetime_is_enabled() -> TestResult {
    let jws = load(claims(json!({}))?, true, Validation::default(), T);

    assert!(jws.is_invalid());
    assert!(!jws.is_verified());
    assert_eq!(jws.state_description(), "Expiration timestamp is not set");
    Ok(())
}

#[test]
fn it_invalidates_a_verified_token_issued_in_the_future() -> TestResult {
    let jws = load(
        claims(json!({ "iat": T + 500, "exp": T + 1000 }))?,
        true,
        Validation::default(),
        T,
    );

    assert!(jws.is_invalid());
    assert!(!jws.is_verified());
    assert!(!jws.is_expired());
    assert_eq!(jws.state_description(), "Field 'iat' claim is in the future");
    Ok(())
}

#[test]
fn it_accepts_a_verified_token_within_its_lifetime() -> TestResult {
    let jws = load(
        claims(json!({ "exp": T + 1000 }))?,
        true,
        Validation::default(),
        T,
    );

    assert!(jws.is_verified());
    assert!(!jws.is_expired());
    assert!(!jws.is_invalid());
    assert_eq!(jws.state_description(), "Created as verified");
    Ok(())
}

#[test]
fn it_lets_expiration_override_a_future_issued_at() -> TestResult {
    let jws = load(
        claims(json!({ "iat": T + 500, "exp": T - 1 }))?,
        true,
        Validation::default(),
        T,
    );

    assert_eq!(jws.evaluation(), &Evaluation::expired());
    assert!(!jws.is_invalid());
    Ok(())
}

#[test]
fn it_treats_non_numeric_expiration_as_unset() -> TestResult {
    let jws = load(
        claims(json!({ "exp": "tomorrow" }))?,
        true,
        Validation::default(),
        T,
    );

    assert!(jws.is_invalid());
    assert!(!jws.is_expired());
    Ok(())
}

#[test]
fn it_accepts_numeric_string_claims() -> TestResult {
    let jws = load(
        claims(json!({ "iat": format!("{}", T - 10), "exp": format!("{}", T + 10) }))?,
        true,
        Validation::default(),
        T,
    );

    assert!(jws.is_verified());
    Ok(())
}

#[test]
fn it_does_not_expire_a_fractional_expiration_early() -> TestResult {
    let jws = load(claims(json!({ "exp": 1000.5 }))?, true, Validation::default(), 1000);

    assert!(jws.is_verified());
    assert!(!jws.is_expired());
    assert_eq!(jws.evaluate_at(1001).state, JwsState::Expired);
    Ok(())
}

#[test]
fn it_keeps_a_far_future_expiration_verified() -> TestResult {
    for exp in [json!(1e300), json!(u64::MAX), json!("1e400")] {
        let jws = load(claims(json!({ "exp": exp }))?, true, Validation::default(), T);

        assert!(jws.is_verified());
        assert!(!jws.is_invalid());
        assert!(!jws.is_expired());
        assert_eq!(jws.state_description(), "Created as verified");
    }
    Ok(())
}

#[test]
fn it_expires_a_far_past_expiration() -> TestResult {
    let jws = load(claims(json!({ "exp": -1e300 }))?, true, Validation::default(), T);

    assert!(jws.is_expired());
    assert_eq!(jws.state_description(), "Signature is expired");
    Ok(())
}

#[test]
fn it_reads_the_leading_number_of_a_trailing_garbage_issued_at() -> TestResult {
    let jws = load(
        claims(json!({ "iat": "9999999999x", "exp": "9999999999" }))?,
        true,
        Validation::default(),
        T,
    );

    assert!(jws.is_invalid());
    assert_eq!(jws.state_description(), "Field 'iat' claim is in the future");
    Ok(())
}

#[test]
fn it_widens_the_window_by_the_clock_skew() -> TestResult {
    let settings = Validation::default().with_clock_skew(60);
    let jws = load(
        claims(json!({ "iat": T + 60, "exp": T - 59 }))?,
        true,
        settings,
        T,
    );

    assert!(jws.is_verified());
    assert!(!jws.is_expired());
    assert_eq!(jws.evaluate_at(T + 1).state, JwsState::Expired);
    Ok(())
}

#[test]
fn it_never_expires_without_a_lifetime() -> TestResult {
    let jws = load(
        claims(json!({ "exp": 0 }))?,
        true,
        Validation::default().without_lifetime(),
        T,
    );

    assert!(jws.is_verified());
    assert!(!jws.is_expired());
    assert_eq!(jws.evaluate_at(u64::MAX).state, JwsState::Verified);
    Ok(())
}

#[test]
fn it_expires_on_a_later_query_as_time_passes() -> TestResult {
    let time = Cell::new(T);
    let jws = LoadedJws::builder(claims(json!({ "exp": T + 10 }))?)
        .verified(true)
        .clock(|| time.get())
        .build();

    assert!(!jws.is_expired());

    time.set(T + 10);
    assert!(jws.is_expired());
    assert!(jws.is_expired());

    // Load-time state is left untouched by the query.
    assert!(jws.is_verified());
    assert_eq!(jws.state(), JwsState::Verified);
    Ok(())
}

#[test]
fn it_passes_header_and_payload_through() -> TestResult {
    let header = claims(json!({ "alg": "ES256", "kid": "key-1" }))?;
    let payload = claims(json!({ "exp": T + 1, "roles": ["admin"], "nested": { "a": 1 } }))?;
    let jws = LoadedJws::builder(payload.clone())
        .header(header.clone())
        .clock(FixedClock(T))
        .build();

    assert_eq!(jws.header(), &header);
    assert_eq!(jws.payload(), &payload);
    Ok(())
}

// =============================================================================
// Properties
// =============================================================================

fn settings() -> impl Strategy<Value = Validation> {
    (any::<bool>(), 0u64..10_000).prop_map(|(has_lifetime, clock_skew)| Validation {
        has_lifetime,
        clock_skew,
    })
}

proptest! {
    #[test]
    fn verified_without_lifetime_stays_verified(
        skew in 0u64..10_000,
        iat_offset in 0u64..1_000_000,
    ) {
        let payload = claims(json!({ "iat": T - iat_offset })).unwrap();
        let settings = Validation::default()
            .without_lifetime()
            .with_clock_skew(skew);
        let jws = load(payload, true, settings, T);

        prop_assert!(jws.is_verified());
        prop_assert!(!jws.is_expired());
        prop_assert!(!jws.is_invalid());
    }

    #[test]
    fn missing_or_malformed_expiration_is_invalid(
        is_verified in any::<bool>(),
        skew in 0u64..10_000,
        exp in prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            Just(Some(json!("never"))),
            Just(Some(json!(false))),
            Just(Some(json!({ "at": 1 }))),
        ],
    ) {
        let mut payload = Claims::new();
        if let Some(exp) = exp {
            payload.insert("exp".into(), exp);
        }
        let jws = load(payload, is_verified, Validation::default().with_clock_skew(skew), T);

        prop_assert!(jws.is_invalid());
        prop_assert_eq!(jws.state_description(), "Expiration timestamp is not set");
    }

    #[test]
    fn future_issued_at_is_invalid(
        skew in 0u64..10_000,
        ahead in 1u64..1_000_000,
        is_verified in any::<bool>(),
    ) {
        let payload = claims(json!({ "iat": T + skew + ahead })).unwrap();
        let settings = Validation::default()
            .without_lifetime()
            .with_clock_skew(skew);
        let jws = load(payload, is_verified, settings, T);

        prop_assert!(jws.is_invalid());
        prop_assert!(!jws.is_verified());
    }

    #[test]
    fn passed_expiration_is_expired(
        skew in 0u64..10_000,
        past in 0u64..1_000_000,
        is_verified in any::<bool>(),
    ) {
        let payload = claims(json!({ "exp": T - skew - past })).unwrap();
        let jws = load(payload, is_verified, Validation::default().with_clock_skew(skew), T);

        prop_assert!(jws.is_expired());
        prop_assert_eq!(jws.state(), JwsState::Expired);
    }

    #[test]
    fn queries_are_idempotent(
        validation in settings(),
        is_verified in any::<bool>(),
        iat in proptest::option::of(T - 5_000..T + 5_000),
        exp in proptest::option::of(T - 5_000..T + 5_000),
    ) {
        let mut payload = Claims::new();
        if let Some(iat) = iat {
            payload.insert("iat".into(), json!(iat));
        }
        if let Some(exp) = exp {
            payload.insert("exp".into(), json!(exp));
        }
        let jws = load(payload, is_verified, validation, T);

        let snapshot = || {
            (
                jws.is_verified(),
                jws.is_expired(),
                jws.is_invalid(),
                jws.state_description().to_owned(),
            )
        };
        let first = snapshot();
        let second = snapshot();
        prop_assert_eq!(first, second);
        prop_assert_eq!(jws.evaluate_at(T), jws.evaluation().clone());
    }
}
