/*
 * Copyright (c) 2025 The NAMIB Project Developers.
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */
use std::time::Duration;

use ciborium::Value;
use rstest::rstest;

use super::{ValidationOptions, Validator};
use crate::cwt::{Claims, ClaimsMap};
use crate::error::{ClaimsError, CoseError, ErrorKind};
use crate::iana::claim;

const NBF: i64 = 1_000_000;
const EXP: i64 = 1_000_600;
const SKEW: u64 = 30;

fn window_claims() -> Claims {
    Claims::builder()
        .issuer("ldc:ca")
        .audience("ldc:txpool")
        .subject("ldc:chain")
        .not_before(NBF)
        .expiration(EXP)
        .issued_at(NBF)
        .build()
        .unwrap()
}

fn validator_at(now: i64) -> Validator {
    Validator::new(
        ValidationOptions::builder()
            .clock_skew(Duration::from_secs(SKEW))
            .fixed_now(now)
            .build()
            .unwrap(),
    )
}

fn claims_error(result: Result<(), CoseError>) -> ClaimsError {
    match result.unwrap_err().kind {
        ErrorKind::ClaimsInvalid(e) => e,
        kind => panic!("expected a claims error, got {kind:?}"),
    }
}

#[test]
fn identity_predicates() {
    let claims = window_claims();
    let options = ValidationOptions::builder()
        .expected_issuer("ldc:ca")
        .expected_audience("ldc:txpool")
        .expected_subject("ldc:chain")
        .fixed_now(NBF + 10)
        .build()
        .unwrap();
    Validator::new(options).validate(&claims).unwrap();

    let mismatch = ValidationOptions::builder()
        .expected_issuer("someone-else")
        .fixed_now(NBF + 10)
        .build()
        .unwrap();
    assert_eq!(
        claims_error(Validator::new(mismatch).validate(&claims)),
        ClaimsError::IssuerMismatch
    );

    // An expectation against an absent claim is a mismatch too.
    let no_audience = Claims::builder().issuer("ldc:ca").build().unwrap();
    let expects_audience = ValidationOptions::builder()
        .expected_audience("ldc:txpool")
        .build()
        .unwrap();
    assert_eq!(
        claims_error(Validator::new(expects_audience).validate(&no_audience)),
        ClaimsError::AudienceMismatch
    );
}

#[rstest]
// The token is accepted on [nbf - skew, exp + skew - 1] and nowhere else.
#[case::just_early_enough(NBF - SKEW as i64, None)]
#[case::too_early(NBF - SKEW as i64 - 1, Some(ClaimsError::NotYetValid))]
#[case::mid_window(NBF + 300, None)]
#[case::last_valid_instant(EXP + SKEW as i64 - 1, None)]
#[case::expired(EXP + SKEW as i64, Some(ClaimsError::Expired))]
fn time_window(#[case] now: i64, #[case] expected: Option<ClaimsError>) {
    let result = validator_at(now).validate(&window_claims());
    match expected {
        None => result.unwrap(),
        Some(subkind) => assert_eq!(claims_error(result), subkind),
    }
}

#[test]
fn long_expired_token_is_rejected() {
    let claims = Claims::builder()
        .issuer("ldc:ca")
        .subject("ldc:chain")
        .audience("ldc:txpool")
        .expiration(1_670_123_579i64)
        .cwt_id(vec![1, 2, 3, 4])
        .build()
        .unwrap();
    let validator = Validator::new(
        ValidationOptions::builder()
            .fixed_now(1_700_000_000i64)
            .build()
            .unwrap(),
    );
    assert_eq!(
        claims_error(validator.validate(&claims)),
        ClaimsError::Expired
    );
}

#[test]
fn inverted_lifetime_is_never_valid() {
    let claims = Claims::builder()
        .not_before(EXP)
        .expiration(NBF)
        .build()
        .unwrap();
    assert_eq!(
        claims_error(validator_at(NBF - 100).validate(&claims)),
        ClaimsError::InvalidLifetime
    );
}

#[test]
fn issued_in_future_only_fails_in_strict_mode() {
    let claims = Claims::builder()
        .issued_at(NBF + 1_000_000)
        .build()
        .unwrap();
    validator_at(NBF).validate(&claims).unwrap();

    let strict = Validator::new(
        ValidationOptions::builder()
            .fixed_now(NBF)
            .strict_issued_at(true)
            .build()
            .unwrap(),
    );
    assert_eq!(
        claims_error(strict.validate(&claims)),
        ClaimsError::IssuedInFuture
    );
}

#[test]
fn map_form_is_validated_with_shape_checks() {
    let mut claims = ClaimsMap::new();
    claims.set(claim::ISS, "ldc:ca");
    claims.set(claim::EXP, EXP);
    claims.set(claim::NBF, NBF);
    // Extension claims are ignored by the validator.
    claims.set(crate::iana::claim::CAT_V, 1);

    validator_at(NBF + 10).validate_map(&claims).unwrap();

    claims.set(claim::EXP, Value::Text("not a time".into()));
    assert!(matches!(
        validator_at(NBF + 10).validate_map(&claims).unwrap_err().kind,
        ErrorKind::InvalidCbor(_)
    ));
}
