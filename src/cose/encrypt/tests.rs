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
use super::EncryptMessage;
use crate::cose::Recipient;
use crate::error::ErrorKind;
use crate::iana::{alg, header};
use crate::key::aead::generate_key;

#[test]
fn direct_recipient_roundtrip() {
    let key = generate_key(alg::A256GCM).unwrap();
    let encryptor = key.encryptor().unwrap();

    let mut message: EncryptMessage<Vec<u8>> =
        EncryptMessage::new(b"the eagle lands at dawn".to_vec());
    message.recipients.push(Recipient::direct(b"our-psk"));
    let encoded = message.encrypt_and_encode(&*encryptor, None).unwrap();

    let decoded: EncryptMessage<Vec<u8>> =
        EncryptMessage::decrypt_and_decode(&*encryptor, &encoded, None).unwrap();
    assert_eq!(decoded.payload, b"the eagle lands at dawn");
    assert_eq!(decoded.recipients.len(), 1);
    assert_eq!(
        decoded.recipients[0].unprotected.get_i64(header::ALG),
        Ok(alg::DIRECT)
    );
    assert_eq!(
        decoded.recipients[0].unprotected.get_bytes(header::KID),
        Ok(b"our-psk".to_vec())
    );
    assert!(decoded.recipients[0].ciphertext.is_empty());
}

#[test]
fn recipients_are_required() {
    let key = generate_key(alg::A256GCM).unwrap();
    let encryptor = key.encryptor().unwrap();
    let mut message: EncryptMessage<Vec<u8>> = EncryptMessage::new(Vec::new());
    assert!(matches!(
        message.encrypt(&*encryptor, None).unwrap_err().kind,
        ErrorKind::Precondition(_)
    ));
}

#[test]
fn recipients_travel_verbatim() {
    let key = generate_key(alg::A128GCM).unwrap();
    let encryptor = key.encryptor().unwrap();

    let mut carried = Recipient::direct(b"kek-1");
    carried.ciphertext = vec![1, 2, 3, 4];
    let mut message: EncryptMessage<Vec<u8>> = EncryptMessage::new(b"x".to_vec());
    message.recipients.push(carried.clone());
    message.recipients.push(Recipient::direct(b"kek-2"));
    let encoded = message.encrypt_and_encode(&*encryptor, None).unwrap();

    let decoded: EncryptMessage<Vec<u8>> =
        EncryptMessage::decrypt_and_decode(&*encryptor, &encoded, None).unwrap();
    assert_eq!(decoded.recipients, message.recipients);
}
