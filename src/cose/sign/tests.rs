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
use ciborium::Value;

use super::{verify_sign_message, SignMessage};
use crate::cwt::ClaimsMap;
use crate::error::ErrorKind;
use crate::iana::{alg, claim, key_param};
use crate::key::{ecdsa, ed25519, Key, KeySet, Signer, Verifier};

fn claims_payload() -> ClaimsMap {
    let mut claims = ClaimsMap::new();
    claims.set(claim::ISS, "ldc:ca");
    claims.set(claim::SUB, "ldc:chain");
    claims.set(claim::AUD, "ldc:txpool");
    claims.set(claim::EXP, 1_670_123_579i64);
    claims.set(9, "read,write");
    claims
}

fn signer_keys() -> (Key, Key) {
    let ed = ed25519::generate_key()
        .with_param(key_param::KID, Value::Bytes(b"ed-1".to_vec()));
    let es = ecdsa::generate_key(alg::ES256)
        .unwrap()
        .with_param(key_param::KID, Value::Bytes(b"es-1".to_vec()));
    (ed, es)
}

#[test]
fn two_signers_roundtrip() {
    let (ed, es) = signer_keys();
    let set: KeySet = [ed, es].into_iter().collect();
    let signers = set.signers().unwrap();
    let verifiers = set.verifiers().unwrap();

    let mut message = SignMessage::new(claims_payload());
    let encoded = message.sign_and_encode_cwt(&signers, None).unwrap();

    let decoded: SignMessage<ClaimsMap> =
        verify_sign_message(&verifiers, &encoded, None).unwrap();
    assert_eq!(decoded.payload, message.payload);
    assert_eq!(decoded.signatures.len(), 2);
    assert_eq!(
        decoded.signatures[0].protected.get_i64(crate::iana::header::ALG),
        Ok(alg::EDDSA)
    );
    assert_eq!(
        decoded.signatures[1].protected.get_i64(crate::iana::header::ALG),
        Ok(alg::ES256)
    );
}

#[test]
fn missing_verifier_fails_the_uncovered_slot() {
    let (ed, es) = signer_keys();
    let set: KeySet = [ed.clone(), es].into_iter().collect();
    let signers = set.signers().unwrap();

    let mut message = SignMessage::new(claims_payload());
    let encoded = message.sign_and_encode(&signers, None).unwrap();

    // Only the Ed25519 verifier is available: slot 1 is uncovered.
    let only_ed: Vec<Box<dyn Verifier>> = vec![ed.verifier().unwrap()];
    let decoded: SignMessage<ClaimsMap> = SignMessage::from_slice(&encoded).unwrap();
    let err = decoded.verify(&only_ed, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::VerifyFailed { slot: Some(1) });

    // Lenient verification accepts the covered slot.
    assert_eq!(decoded.verify_lenient(&only_ed, None), Ok(1));
}

#[test]
fn verifiers_without_kid_are_tried_against_kidless_slots() {
    // Signers without a kid produce slots without a kid hint; every
    // verifier is then eligible.
    let ed = ed25519::generate_key();
    let signers: Vec<Box<dyn Signer>> = vec![ed.signer().unwrap()];
    let verifiers: Vec<Box<dyn Verifier>> = vec![ed.verifier().unwrap()];

    let mut message: SignMessage<Vec<u8>> = SignMessage::new(b"payload".to_vec());
    let encoded = message.sign_and_encode(&signers, None).unwrap();
    verify_sign_message::<Vec<u8>>(&verifiers, &encoded, None).unwrap();
}

#[test]
fn tampered_payload_fails_a_slot() {
    let (ed, es) = signer_keys();
    let set: KeySet = [ed, es].into_iter().collect();
    let signers = set.signers().unwrap();
    let verifiers = set.verifiers().unwrap();

    let mut message: SignMessage<Vec<u8>> = SignMessage::new(b"transfer 10".to_vec());
    let encoded = message.sign_and_encode(&signers, None).unwrap();

    let needle = b"transfer 10";
    let at = encoded
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    let mut tampered = encoded;
    tampered[at] ^= 0x01;

    let decoded: SignMessage<Vec<u8>> = SignMessage::from_slice(&tampered).unwrap();
    let err = decoded.verify(&verifiers, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::VerifyFailed { slot: Some(0) });
}

#[test]
fn empty_signer_set_is_rejected() {
    let mut message: SignMessage<Vec<u8>> = SignMessage::new(Vec::new());
    assert!(matches!(
        message.sign(&[], None).unwrap_err().kind,
        ErrorKind::Precondition(_)
    ));
}
