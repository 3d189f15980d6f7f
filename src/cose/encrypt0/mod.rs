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

//! COSE_Encrypt0: an encrypted message with an implicit recipient
//! (RFC 9052 §5.2).

use ciborium::Value;

use crate::common::IntMap;
use crate::cose::util::message_nonce;
use crate::cose::{
    apply_key_headers, bytes_element, check_alg, decode_tagged, enc_structure, encode_tagged,
    headers_from_bytes, payload_element, protected_bytes, Headers, MessageCore, Payload,
};
use crate::error::CoseError;
use crate::iana::{header, tag};
use crate::key::{random_bytes, Encryptor};


const CONTEXT: &str = "Encrypt0";

/// A COSE_Encrypt0 message.
///
/// Unlike the signed and MACed messages, the payload does not travel in
/// clear, so decoding and decrypting are one step:
/// [`decrypt_and_decode`](Encrypt0Message::decrypt_and_decode).
#[derive(Clone, Debug)]
pub struct Encrypt0Message<T> {
    /// Header parameters covered by the authenticated encryption.
    pub protected: Headers,
    /// Header parameters outside it, e.g. the nonce.
    pub unprotected: Headers,
    pub payload: T,
    core: Option<MessageCore>,
}

impl<T: Payload> Encrypt0Message<T> {
    /// Creates an unencrypted message with empty header buckets.
    #[must_use]
    pub fn new(payload: T) -> Encrypt0Message<T> {
        Encrypt0Message {
            protected: Headers::new(),
            unprotected: Headers::new(),
            payload,
            core: None,
        }
    }

    /// Encrypts the payload with `encryptor`.
    ///
    /// The nonce is taken from the `IV` header, derived from a
    /// `Partial IV` and the key's `Base IV`, or freshly generated and
    /// stored in the unprotected bucket.
    ///
    /// # Errors
    ///
    /// Fails on a header/key algorithm mismatch, a malformed nonce
    /// configuration, or an encryptor failure.
    pub fn encrypt(
        &mut self,
        encryptor: &dyn Encryptor,
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "encrypt0::encrypt";
        apply_key_headers(OP, &mut self.protected, &mut self.unprotected, encryptor.key())?;
        let nonce = match message_nonce(
            OP,
            &self.protected,
            &self.unprotected,
            encryptor.key(),
            encryptor.nonce_size(),
        )? {
            Some(nonce) => nonce,
            None => {
                let nonce = random_bytes(encryptor.nonce_size());
                self.unprotected
                    .set(header::IV, Value::Bytes(nonce.clone()));
                nonce
            }
        };
        let protected = protected_bytes(&self.protected)?;
        let aad = enc_structure(CONTEXT, &protected, external_aad)?;
        let plaintext = self.payload.to_payload_bytes()?;
        let ciphertext = encryptor.encrypt(&plaintext, &nonce, &aad)?;
        self.core = Some(MessageCore {
            protected,
            payload: plaintext,
            authenticator: ciphertext,
        });
        Ok(())
    }

    /// Encrypts the payload and returns the tagged encoding.
    ///
    /// # Errors
    ///
    /// See [`Encrypt0Message::encrypt`].
    pub fn encrypt_and_encode(
        &mut self,
        encryptor: &dyn Encryptor,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.encrypt(encryptor, external_aad)?;
        self.to_vec()
    }

    /// Encrypts the payload and returns the encoding wrapped in the CWT
    /// tag.
    ///
    /// # Errors
    ///
    /// See [`Encrypt0Message::encrypt`].
    pub fn encrypt_and_encode_cwt(
        &mut self,
        encryptor: &dyn Encryptor,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.encrypt(encryptor, external_aad)?;
        self.to_cwt_vec()
    }

    /// Returns the tagged encoding of an encrypted message.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Precondition`](crate::error::ErrorKind::Precondition)
    /// before [`encrypt`](Encrypt0Message::encrypt) has run.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(false)
    }

    /// Returns the CWT-tagged encoding of an encrypted message.
    ///
    /// # Errors
    ///
    /// See [`Encrypt0Message::to_vec`].
    pub fn to_cwt_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(true)
    }

    fn encode(&self, wrap_as_cwt: bool) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "encrypt0::encode";
        let core = self.core.as_ref().ok_or_else(|| {
            CoseError::precondition(OP, "ciphertext not computed; call encrypt first")
        })?;
        encode_tagged(
            tag::COSE_ENCRYPT0,
            Value::Array(vec![
                Value::Bytes(core.protected.clone()),
                self.unprotected.to_value(),
                Value::Bytes(core.authenticator.clone()),
            ]),
            wrap_as_cwt,
        )
    }

    /// Decodes `data` and decrypts its ciphertext in one step.
    ///
    /// `external_aad` must equal the value supplied when encrypting.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, an algorithm mismatch, a missing nonce,
    /// or when authentication of the ciphertext fails.
    pub fn decrypt_and_decode(
        encryptor: &dyn Encryptor,
        data: &[u8],
        external_aad: Option<&[u8]>,
    ) -> Result<Encrypt0Message<T>, CoseError> {
        const OP: &str = "encrypt0::decrypt_and_decode";
        let items = decode_tagged(OP, data, tag::COSE_ENCRYPT0)?;
        if items.len() != 3 {
            return Err(CoseError::invalid_cbor(
                OP,
                format!("COSE_Encrypt0 must have 3 elements, found {}", items.len()),
            ));
        }
        let mut items = items.into_iter();
        let protected_raw = bytes_element(
            OP,
            "protected header",
            items.next().unwrap_or(Value::Null),
        )?;
        let protected = headers_from_bytes(&protected_raw)?;
        let unprotected = IntMap::from_value(OP, items.next().unwrap_or(Value::Null))?;
        let ciphertext = payload_element(OP, items.next().unwrap_or(Value::Null))?;

        check_alg(OP, &protected, encryptor.key())?;
        let nonce = message_nonce(
            OP,
            &protected,
            &unprotected,
            encryptor.key(),
            encryptor.nonce_size(),
        )?
        .ok_or_else(|| CoseError::invalid_cbor(OP, "message carries no IV or Partial IV"))?;
        let aad = enc_structure(CONTEXT, &protected_raw, external_aad)?;
        let plaintext = encryptor.decrypt(&ciphertext, &nonce, &aad)?;

        Ok(Encrypt0Message {
            protected,
            unprotected,
            payload: T::from_payload_bytes(&plaintext)?,
            core: Some(MessageCore {
                protected: protected_raw,
                payload: plaintext,
                authenticator: ciphertext,
            }),
        })
    }

    /// Returns the ciphertext, if one has been computed or decoded.
    #[must_use]
    pub fn ciphertext(&self) -> Option<&[u8]> {
        self.core.as_ref().map(|core| core.authenticator.as_slice())
    }
}
