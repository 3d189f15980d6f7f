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
use super::{verify_mac0_message, Mac0Message};
use crate::error::ErrorKind;
use crate::iana::{alg, header};
use crate::key::hmac::generate_key;

#[test]
fn compute_verify_roundtrip() {
    let key = generate_key(alg::HMAC_256_64).unwrap();
    let macer = key.macer().unwrap();

    let mut message: Mac0Message<Vec<u8>> = Mac0Message::new(b"hello world".to_vec());
    let encoded = message.compute_and_encode(&*macer, None).unwrap();
    assert_eq!(message.tag().map(|tag| tag.len()), Some(8));
    assert_eq!(message.protected.get_i64(header::ALG), Ok(alg::HMAC_256_64));

    let decoded: Mac0Message<Vec<u8>> = verify_mac0_message(&*macer, &encoded, None).unwrap();
    assert_eq!(decoded.payload, b"hello world");
    assert_eq!(decoded.protected, message.protected);
    assert_eq!(decoded.unprotected, message.unprotected);
}

#[test]
fn flipped_payload_byte_fails_verification() {
    let key = generate_key(alg::HMAC_256_64).unwrap();
    let macer = key.macer().unwrap();

    let mut message: Mac0Message<Vec<u8>> = Mac0Message::new(b"hello world".to_vec());
    let encoded = message.compute_and_encode(&*macer, None).unwrap();

    // Find the payload inside the encoding and flip one byte of it.
    let needle = b"hello world";
    let at = encoded
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    let mut tampered = encoded;
    tampered[at] ^= 0x01;

    let err = verify_mac0_message::<Vec<u8>>(&*macer, &tampered, None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VerifyFailed { .. }));
}

#[test]
fn external_aad_is_covered() {
    let key = generate_key(alg::HMAC_256_256).unwrap();
    let macer = key.macer().unwrap();

    let mut message: Mac0Message<Vec<u8>> = Mac0Message::new(b"data".to_vec());
    let encoded = message
        .compute_and_encode(&*macer, Some(b"shared context"))
        .unwrap();

    verify_mac0_message::<Vec<u8>>(&*macer, &encoded, Some(b"shared context")).unwrap();
    assert!(verify_mac0_message::<Vec<u8>>(&*macer, &encoded, None).is_err());
}

#[test]
fn wrong_key_fails() {
    let macer = generate_key(alg::HMAC_256_256).unwrap().macer().unwrap();
    let other = generate_key(alg::HMAC_256_256).unwrap().macer().unwrap();

    let mut message: Mac0Message<Vec<u8>> = Mac0Message::new(b"data".to_vec());
    let encoded = message.compute_and_encode(&*macer, None).unwrap();
    assert!(verify_mac0_message::<Vec<u8>>(&*other, &encoded, None).is_err());
}
