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
use super::{verify_mac_message, MacMessage};
use crate::cose::Recipient;
use crate::error::ErrorKind;
use crate::iana::alg;
use crate::key::hmac::generate_key;

#[test]
fn compute_verify_roundtrip_with_recipient() {
    let key = generate_key(alg::HMAC_256_256).unwrap();
    let macer = key.macer().unwrap();

    let mut message: MacMessage<Vec<u8>> = MacMessage::new(b"meter reading 42".to_vec());
    message.recipients.push(Recipient::direct(b"building-7"));
    let encoded = message.compute_and_encode(&*macer, None).unwrap();

    let decoded: MacMessage<Vec<u8>> = verify_mac_message(&*macer, &encoded, None).unwrap();
    assert_eq!(decoded.payload, b"meter reading 42");
    assert_eq!(decoded.recipients, message.recipients);
}

#[test]
fn recipients_are_required() {
    let key = generate_key(alg::HMAC_256_256).unwrap();
    let macer = key.macer().unwrap();
    let mut message: MacMessage<Vec<u8>> = MacMessage::new(Vec::new());
    assert!(matches!(
        message.compute(&*macer, None).unwrap_err().kind,
        ErrorKind::Precondition(_)
    ));
}

#[test]
fn tampered_tag_fails() {
    let key = generate_key(alg::HMAC_256_64).unwrap();
    let macer = key.macer().unwrap();

    let mut message: MacMessage<Vec<u8>> = MacMessage::new(b"data".to_vec());
    message.recipients.push(Recipient::direct(b"k"));
    let mut encoded = message.compute_and_encode(&*macer, None).unwrap();

    // Flip a byte of the 8-byte tag, which sits right before the
    // recipient array at the end of the message.
    let at = encoded.len() - 12;
    encoded[at] ^= 0xff;
    let err = verify_mac_message::<Vec<u8>>(&*macer, &encoded, None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VerifyFailed { .. }));
}
