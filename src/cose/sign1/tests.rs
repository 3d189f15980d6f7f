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
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ciborium::Value;

use super::{verify_sign1_message, Sign1Message};
use crate::common::remove_cbor_tag;
use crate::error::ErrorKind;
use crate::iana::{alg, curve, ec2, header, key_param, key_type};
use crate::key::Key;

/// The ES256 key of the RFC 9052 examples corpus (sign1-tests), kid "11".
fn corpus_key() -> Key {
    let b64 = |s: &str| Value::Bytes(URL_SAFE_NO_PAD.decode(s).unwrap());
    Key::new(key_type::EC2)
        .with_param(key_param::KID, Value::Bytes(b"11".to_vec()))
        .with_param(key_param::ALG, alg::ES256)
        .with_param(ec2::CRV, curve::P_256)
        .with_param(ec2::X, b64("usWxHK2PmfnHKwXPS54m0kTcGJ90UiglWiGahtagnv8"))
        .with_param(ec2::Y, b64("IBOL-C3BttVivg-lSreASjpkttcsz-1rb7btKLv8EX4"))
        .with_param(ec2::D, b64("V8kgd2ZBRuh2dgyVINBUqpPDr7BOMGcF22CQMIUHtNM"))
}

fn corpus_message() -> Sign1Message<Vec<u8>> {
    let mut message = Sign1Message::new(b"This is the content.".to_vec());
    message.protected.set(header::ALG, alg::ES256);
    message
        .unprotected
        .set(header::KID, Value::Bytes(b"11".to_vec()));
    message
}

#[test]
fn sign_pass_02_external_aad() {
    let key = corpus_key();
    let signer = key.signer().unwrap();
    let verifier = key.verifier().unwrap();
    let external = hex::decode("11aa22bb33cc44dd55006699").unwrap();

    let mut message = corpus_message();
    let encoded = message.sign_and_encode(&*signer, Some(external.as_slice())).unwrap();
    assert_eq!(
        hex::encode(message.to_be_signed(Some(external.as_slice())).unwrap()).to_uppercase(),
        "846A5369676E61747572653143A101264C11AA22BB33CC44DD550066995454686\
         9732069732074686520636F6E74656E742E"
            .replace(char::is_whitespace, "")
    );

    // Our own output verifies.
    let decoded: Sign1Message<Vec<u8>> =
        verify_sign1_message(&*verifier, &encoded, Some(external.as_slice())).unwrap();
    assert_eq!(decoded.payload, message.payload);
    assert_eq!(decoded.protected, message.protected);
    assert_eq!(decoded.unprotected, message.unprotected);

    // The corpus fixture verifies too, with a different (but valid)
    // signature.
    let fixture = hex::decode(
        "d28443a10126a10442313154546869732069732074686520636f6e74656e742e5\
         84010729cd711cb3813d8d8e944a8da7111e7b258c9bdca6135f7ae1adbee9509\
         891267837e1e33bd36c150326ae62755c6bd8e540c3e8f92d7d225e8db72b8820\
         b"
        .replace(char::is_whitespace, ""),
    )
    .unwrap();
    let from_fixture: Sign1Message<Vec<u8>> =
        verify_sign1_message(&*verifier, &fixture, Some(external.as_slice())).unwrap();
    assert_eq!(from_fixture.payload, message.payload);
    assert_ne!(from_fixture.signature(), message.signature());

    // External AAD is part of the signed structure.
    assert!(verify_sign1_message::<Vec<u8>>(&*verifier, &fixture, None).is_err());
}

#[test]
fn sign_pass_03_untagged() {
    let key = corpus_key();
    let verifier = key.verifier().unwrap();
    let fixture = hex::decode(
        "8443a10126a10442313154546869732069732074686520636f6e74656e742e584\
         08eb33e4ca31d1c465ab05aac34cc6b23d58fef5c083106c4d25a91aef0b0117e\
         2af9a291aa32e14ab834dc56ed2a223444547e01f11d3b0916e5a4c345cacb36"
            .replace(char::is_whitespace, ""),
    )
    .unwrap();

    // The untagged form decodes and verifies.
    let message: Sign1Message<Vec<u8>> = Sign1Message::from_slice(&fixture).unwrap();
    message.verify(&*verifier, None).unwrap();
    assert_eq!(message.payload, b"This is the content.");

    // Re-encoding always emits the tagged form; stripping the tag
    // restores the original bytes.
    let reencoded = message.to_vec().unwrap();
    assert_eq!(reencoded[0], 0xd2);
    assert_eq!(remove_cbor_tag(&reencoded).unwrap(), fixture.as_slice());
}

#[test]
fn algorithm_coupling() {
    let key = corpus_key();
    let signer = key.signer().unwrap();

    let mut message = corpus_message();
    message.protected.set(header::ALG, alg::EDDSA);
    let err = message.sign(&*signer, None).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::AlgMismatch {
            expected: alg::ES256,
            found: alg::EDDSA
        }
    );
}

#[test]
fn key_headers_are_inserted() {
    let key = corpus_key();
    let signer = key.signer().unwrap();

    let mut message: Sign1Message<Vec<u8>> = Sign1Message::new(b"x".to_vec());
    message.sign(&*signer, None).unwrap();
    assert_eq!(message.protected.get_i64(header::ALG), Ok(alg::ES256));
    assert_eq!(message.unprotected.get_bytes(header::KID), Ok(b"11".to_vec()));
}

#[test]
fn encode_before_sign_is_a_precondition_error() {
    let message: Sign1Message<Vec<u8>> = Sign1Message::new(Vec::new());
    assert!(matches!(
        message.to_vec().unwrap_err().kind,
        ErrorKind::Precondition(_)
    ));

    let key = corpus_key();
    let verifier = key.verifier().unwrap();
    assert!(matches!(
        message.verify(&*verifier, None).unwrap_err().kind,
        ErrorKind::Precondition(_)
    ));
}

#[test]
fn foreign_tag_is_fatal() {
    let key = corpus_key();
    let signer = key.signer().unwrap();
    let mut message = corpus_message();
    let encoded = message.sign_and_encode(&*signer, None).unwrap();

    // Rewrite the COSE_Sign1 tag (0xd2) into the COSE_Mac0 tag (0xd1).
    let mut wrong = encoded;
    wrong[0] = 0xd1;
    assert!(Sign1Message::<Vec<u8>>::from_slice(&wrong).is_err());
}

#[test]
fn cwt_wrapping_is_explicit_and_tolerated() {
    let key = corpus_key();
    let signer = key.signer().unwrap();
    let verifier = key.verifier().unwrap();

    let mut message = corpus_message();
    let wrapped = message.sign_and_encode_cwt(&*signer, None).unwrap();
    assert_eq!(&wrapped[..3], [0xd8, 0x3d, 0xd2]);

    let decoded: Sign1Message<Vec<u8>> =
        verify_sign1_message(&*verifier, &wrapped, None).unwrap();
    assert_eq!(decoded.payload, message.payload);
    // The plain encoding of the same message drops the CWT tag.
    assert_eq!(remove_cbor_tag(&wrapped).unwrap(), message.to_vec().unwrap());
}
