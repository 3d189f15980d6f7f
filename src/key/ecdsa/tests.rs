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
use rstest::rstest;

use crate::error::ErrorKind;
use crate::iana::{alg, ec2};
use crate::key::ecdsa::{generate_key, new_signer, new_verifier};

#[rstest]
#[case::es256(alg::ES256)]
#[case::es384(alg::ES384)]
fn sign_verify_roundtrip(#[case] algorithm: i64) {
    let key = generate_key(algorithm).unwrap();
    let signer = new_signer(&key).unwrap();
    let verifier = new_verifier(&key).unwrap();

    let signature = signer.sign(b"This is the content.").unwrap();
    verifier.verify(b"This is the content.", &signature).unwrap();

    let err = verifier.verify(b"This is the CONTENT.", &signature).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VerifyFailed { .. }));
}

#[test]
fn verifier_from_public_coordinates_only() {
    let key = generate_key(alg::ES256).unwrap();
    let signature = new_signer(&key).unwrap().sign(b"data").unwrap();

    let public = key.to_public_key().unwrap();
    assert!(!public.params().has(ec2::D));
    let verifier = new_verifier(&public).unwrap();
    verifier.verify(b"data", &signature).unwrap();
}

#[test]
fn signer_requires_private_component() {
    let public = generate_key(alg::ES256).unwrap().to_public_key().unwrap();
    let err = new_signer(&public).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidKey(_)));
}

#[test]
fn curve_and_algorithm_must_agree() {
    let mut key = generate_key(alg::ES256).unwrap();
    key.params_mut().set(ec2::CRV, crate::iana::curve::P_384);
    assert!(matches!(
        new_signer(&key).unwrap_err().kind,
        ErrorKind::InvalidKey(_)
    ));
}

#[test]
fn es512_is_not_supported() {
    assert!(matches!(
        generate_key(alg::ES512).unwrap_err().kind,
        ErrorKind::Unsupported { .. }
    ));
}
