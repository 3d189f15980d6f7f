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
use crate::key::hmac::{generate_key, new_macer};

#[rstest]
#[case::hmac_256_64(alg::HMAC_256_64, 8)]
#[case::hmac_256_256(alg::HMAC_256_256, 32)]
#[case::hmac_384_384(alg::HMAC_384_384, 48)]
#[case::hmac_512_512(alg::HMAC_512_512, 64)]
fn create_verify_roundtrip(#[case] algorithm: i64, #[case] tag_len: usize) {
    let key = generate_key(algorithm).unwrap();
    let macer = new_macer(&key).unwrap();

    let tag = macer.mac_create(b"hello world").unwrap();
    assert_eq!(tag.len(), tag_len);
    macer.mac_verify(b"hello world", &tag).unwrap();

    let err = macer.mac_verify(b"hello worle", &tag).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VerifyFailed { .. }));
    // A truncated tag must not pass either.
    assert!(macer.mac_verify(b"hello world", &tag[..tag_len - 1]).is_err());
}

#[test]
fn key_length_must_match_algorithm() {
    let key = generate_key(alg::HMAC_256_256)
        .unwrap()
        .with_param(symmetric::K, Value::Bytes(vec![0u8; 16]));
    assert!(matches!(
        new_macer(&key).unwrap_err().kind,
        ErrorKind::InvalidKey(_)
    ));
}

#[test]
fn truncated_tag_is_prefix_of_full_tag() {
    let key = generate_key(alg::HMAC_256_256).unwrap();
    let full = new_macer(&key).unwrap().mac_create(b"payload").unwrap();

    let truncated_key = key.clone().with_param(
        crate::iana::key_param::ALG,
        alg::HMAC_256_64,
    );
    let short = new_macer(&truncated_key)
        .unwrap()
        .mac_create(b"payload")
        .unwrap();
    assert_eq!(short, &full[..8]);
}
