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

//! COSE_Sign1: a message carrying a single signature (RFC 9052 §4.2).

use ciborium::Value;

use crate::common::IntMap;
use crate::cose::{
    apply_key_headers, auth_structure, bytes_element, check_alg, decode_tagged, encode_tagged,
    headers_from_bytes, payload_element, protected_bytes, Headers, MessageCore, Payload,
};
use crate::error::CoseError;
use crate::iana::tag;
use crate::key::{Signer, Verifier};

#[cfg(all(test, feature = "ecdsa"))]
mod tests;

const CONTEXT: &str = "Signature1";

/// A COSE_Sign1 message.
///
/// `T` is the payload representation; see [`Payload`].
#[derive(Clone, Debug)]
pub struct Sign1Message<T> {
    /// Header parameters covered by the signature.
    pub protected: Headers,
    /// Header parameters outside the signature, e.g. the kid hint.
    pub unprotected: Headers,
    pub payload: T,
    core: Option<MessageCore>,
}

/// Decodes `data` and verifies its signature in one step.
///
/// # Errors
///
/// Fails on malformed input or a failing signature check.
pub fn verify_sign1_message<T: Payload>(
    verifier: &dyn Verifier,
    data: &[u8],
    external_aad: Option<&[u8]>,
) -> Result<Sign1Message<T>, CoseError> {
    let message = Sign1Message::from_slice(data)?;
    message.verify(verifier, external_aad)?;
    Ok(message)
}

impl<T: Payload> Sign1Message<T> {
    /// Creates an unsigned message with empty header buckets.
    #[must_use]
    pub fn new(payload: T) -> Sign1Message<T> {
        Sign1Message {
            protected: Headers::new(),
            unprotected: Headers::new(),
            payload,
            core: None,
        }
    }

    /// Computes the signature with `signer`.
    ///
    /// The key's algorithm is inserted into the protected bucket when
    /// absent (and checked against it when present), and its kid into the
    /// unprotected bucket.
    ///
    /// # Errors
    ///
    /// Fails on a header/key algorithm mismatch or a signer failure.
    pub fn sign(
        &mut self,
        signer: &dyn Signer,
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "sign1::sign";
        apply_key_headers(OP, &mut self.protected, &mut self.unprotected, signer.key())?;
        let protected = protected_bytes(&self.protected)?;
        let payload = self.payload.to_payload_bytes()?;
        let to_sign = auth_structure(CONTEXT, &protected, None, external_aad, &payload)?;
        let signature = signer.sign(&to_sign)?;
        self.core = Some(MessageCore {
            protected,
            payload,
            authenticator: signature,
        });
        Ok(())
    }

    /// Signs the message and returns its tagged encoding.
    ///
    /// # Errors
    ///
    /// See [`Sign1Message::sign`].
    pub fn sign_and_encode(
        &mut self,
        signer: &dyn Signer,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.sign(signer, external_aad)?;
        self.to_vec()
    }

    /// Signs the message and returns its encoding wrapped in the CWT tag.
    ///
    /// # Errors
    ///
    /// See [`Sign1Message::sign`].
    pub fn sign_and_encode_cwt(
        &mut self,
        signer: &dyn Signer,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.sign(signer, external_aad)?;
        self.to_cwt_vec()
    }

    /// Returns the tagged encoding of a signed message.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Precondition`](crate::error::ErrorKind::Precondition)
    /// before [`sign`](Sign1Message::sign) has run.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(false)
    }

    /// Returns the CWT-tagged encoding of a signed message.
    ///
    /// # Errors
    ///
    /// See [`Sign1Message::to_vec`].
    pub fn to_cwt_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(true)
    }

    fn encode(&self, wrap_as_cwt: bool) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "sign1::encode";
        let core = self
            .core
            .as_ref()
            .ok_or_else(|| CoseError::precondition(OP, "signature not computed; call sign first"))?;
        encode_tagged(
            tag::COSE_SIGN1,
            Value::Array(vec![
                Value::Bytes(core.protected.clone()),
                self.unprotected.to_value(),
                Value::Bytes(core.payload.clone()),
                Value::Bytes(core.authenticator.clone()),
            ]),
            wrap_as_cwt,
        )
    }

    /// Decodes a message, accepting the tagged and untagged forms.
    ///
    /// # Errors
    ///
    /// Fails on malformed CBOR, a foreign outer tag, or a payload that
    /// does not parse into `T`.
    pub fn from_slice(data: &[u8]) -> Result<Sign1Message<T>, CoseError> {
        const OP: &str = "sign1::from_slice";
        let items = decode_tagged(OP, data, tag::COSE_SIGN1)?;
        if items.len() != 4 {
            return Err(CoseError::invalid_cbor(
                OP,
                format!("COSE_Sign1 must have 4 elements, found {}", items.len()),
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
        let payload_raw = payload_element(OP, items.next().unwrap_or(Value::Null))?;
        let signature = bytes_element(OP, "signature", items.next().unwrap_or(Value::Null))?;
        Ok(Sign1Message {
            protected,
            unprotected,
            payload: T::from_payload_bytes(&payload_raw)?,
            core: Some(MessageCore {
                protected: protected_raw,
                payload: payload_raw,
                authenticator: signature,
            }),
        })
    }

    /// Verifies the signature with `verifier`.
    ///
    /// `external_aad` must equal the value supplied when signing.
    ///
    /// # Errors
    ///
    /// Fails before [`from_slice`](Sign1Message::from_slice) or
    /// [`sign`](Sign1Message::sign) has run, on an algorithm mismatch, or
    /// when the signature check rejects the message.
    pub fn verify(
        &self,
        verifier: &dyn Verifier,
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "sign1::verify";
        let core = self.core.as_ref().ok_or_else(|| {
            CoseError::precondition(OP, "nothing to verify; call from_slice first")
        })?;
        check_alg(OP, &self.protected, verifier.key())?;
        let to_sign = auth_structure(
            CONTEXT,
            &core.protected,
            None,
            external_aad,
            &core.payload,
        )?;
        verifier.verify(&to_sign, &core.authenticator)
    }

    /// Returns the canonical `Sig_structure` bytes of a signed or decoded
    /// message.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Precondition`](crate::error::ErrorKind::Precondition)
    /// when no signature context is available yet.
    pub fn to_be_signed(&self, external_aad: Option<&[u8]>) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "sign1::to_be_signed";
        let core = self
            .core
            .as_ref()
            .ok_or_else(|| CoseError::precondition(OP, "call sign or from_slice first"))?;
        auth_structure(CONTEXT, &core.protected, None, external_aad, &core.payload)
    }

    /// Returns the signature, if one has been computed or decoded.
    #[must_use]
    pub fn signature(&self) -> Option<&[u8]> {
        self.core.as_ref().map(|core| core.authenticator.as_slice())
    }
}
