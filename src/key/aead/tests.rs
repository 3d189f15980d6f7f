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
use rstest::rstest;

use crate::error::ErrorKind;
use crate::iana::{alg, symmetric};
use crate::key::aead::{generate_key, new_encryptor};
use crate::key::random_bytes;

#[rstest]
#[cfg_attr(feature = "aes-gcm", case::a128gcm(alg::A128GCM, 12))]
#[cfg_attr(feature = "aes-gcm", case::a192gcm(alg::A192GCM, 12))]
#[cfg_attr(feature = "aes-gcm", case::a256gcm(alg::A256GCM, 12))]
#[cfg_attr(feature = "aes-ccm", case::ccm_16_64_128(alg::AES_CCM_16_64_128, 13))]
#[cfg_attr(feature = "aes-ccm", case::ccm_64_128_256(alg::AES_CCM_64_128_256, 7))]
#[cfg_attr(
    feature = "chacha20-poly1305",
    case::chacha(alg::CHACHA20_POLY1305, 12)
)]
fn seal_open_roundtrip(#[case] algorithm: i64, #[case] nonce_len: usize) {
    let key = generate_key(algorithm).unwrap();
    let encryptor = new_encryptor(&key).unwrap();
    assert_eq!(encryptor.nonce_size(), nonce_len);

    let nonce = random_bytes(nonce_len);
    let sealed = encryptor.encrypt(b"secret content", &nonce, b"aad").unwrap();
    assert!(sealed.len() > b"secret content".len());

    let opened = encryptor.decrypt(&sealed, &nonce, b"aad").unwrap();
    assert_eq!(opened, b"secret content");

    // Authentication covers the AAD.
    let err = encryptor.decrypt(&sealed, &nonce, b"AAD").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VerifyFailed { .. }));
}

#[cfg(feature = "aes-gcm")]
#[test]
fn nonce_length_is_checked() {
    let key = generate_key(alg::A128GCM).unwrap();
    let encryptor = new_encryptor(&key).unwrap();
    assert!(encryptor.encrypt(b"x", &[0u8; 7], b"").is_err());
}

#[cfg(feature = "aes-gcm")]
#[test]
fn key_length_must_match_algorithm() {
    let key = generate_key(alg::A256GCM)
        .unwrap()
        .with_param(symmetric::K, Value::Bytes(vec![0u8; 16]));
    assert!(matches!(
        new_encryptor(&key).unwrap_err().kind,
        ErrorKind::InvalidKey(_)
    ));
}
