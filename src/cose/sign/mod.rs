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

//! COSE_Sign: a message carrying one signature per signer (RFC 9052 §4.1).

use ciborium::Value;

use crate::common::IntMap;
use crate::cose::{
    apply_key_headers, auth_structure, bytes_element, decode_tagged, encode_tagged,
    headers_from_bytes, payload_element, protected_bytes, Headers, MessageCore, Payload,
};
use crate::error::{variant_name, CoseError};
use crate::iana::{header, tag};
use crate::key::{Signer, Verifier};

#[cfg(all(test, feature = "ecdsa", feature = "ed25519"))]
mod tests;

const CONTEXT: &str = "Signature";

/// One signature slot of a [`SignMessage`]: per-signer header buckets and
/// the signature over the body.
#[derive(Clone, Debug, Default)]
pub struct SignatureSlot {
    /// Per-signer parameters covered by this slot's signature.
    pub protected: Headers,
    /// Per-signer parameters outside the signature, e.g. the kid hint.
    pub unprotected: Headers,
    signature: Vec<u8>,
    protected_raw: Vec<u8>,
}

impl SignatureSlot {
    /// Returns this slot's signature (empty before signing).
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn kid(&self) -> Result<Vec<u8>, CoseError> {
        self.unprotected.get_bytes(header::KID)
    }
}

/// A COSE_Sign message.
#[derive(Clone, Debug)]
pub struct SignMessage<T> {
    /// Body parameters covered by every signature.
    pub protected: Headers,
    /// Body parameters outside the signatures.
    pub unprotected: Headers,
    pub payload: T,
    /// One slot per signer. May be pre-populated to supply per-signer
    /// headers; otherwise [`sign`](SignMessage::sign) creates one default
    /// slot per signer.
    pub signatures: Vec<SignatureSlot>,
    core: Option<MessageCore>,
}

/// Decodes `data` and verifies every signature slot in one step.
///
/// # Errors
///
/// Fails on malformed input, an uncovered slot, or a failing signature.
pub fn verify_sign_message<T: Payload>(
    verifiers: &[Box<dyn Verifier>],
    data: &[u8],
    external_aad: Option<&[u8]>,
) -> Result<SignMessage<T>, CoseError> {
    let message = SignMessage::from_slice(data)?;
    message.verify(verifiers, external_aad)?;
    Ok(message)
}

impl<T: Payload> SignMessage<T> {
    /// Creates an unsigned message with empty header buckets and no
    /// signature slots.
    #[must_use]
    pub fn new(payload: T) -> SignMessage<T> {
        SignMessage {
            protected: Headers::new(),
            unprotected: Headers::new(),
            payload,
            signatures: Vec::new(),
            core: None,
        }
    }

    /// Computes one signature per signer.
    ///
    /// Existing slots are reused in order (and must match the signer
    /// count); otherwise one default slot per signer is created. Each
    /// signer's algorithm and kid are applied to its slot following the
    /// single-signer header rules.
    ///
    /// # Errors
    ///
    /// Fails on an empty signer set, a slot/signer count mismatch, a
    /// header/key algorithm mismatch, or a signer failure.
    pub fn sign(
        &mut self,
        signers: &[Box<dyn Signer>],
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "sign::sign";
        if signers.is_empty() {
            return Err(CoseError::precondition(OP, "no signers supplied"));
        }
        if self.signatures.is_empty() {
            self.signatures = signers.iter().map(|_| SignatureSlot::default()).collect();
        } else if self.signatures.len() != signers.len() {
            return Err(CoseError::precondition(
                OP,
                "signature slot count differs from signer count",
            ));
        }

        let body_protected = protected_bytes(&self.protected)?;
        let payload = self.payload.to_payload_bytes()?;
        for (slot, signer) in self.signatures.iter_mut().zip(signers) {
            apply_key_headers(OP, &mut slot.protected, &mut slot.unprotected, signer.key())?;
            slot.protected_raw = protected_bytes(&slot.protected)?;
            let to_sign = auth_structure(
                CONTEXT,
                &body_protected,
                Some(slot.protected_raw.as_slice()),
                external_aad,
                &payload,
            )?;
            slot.signature = signer.sign(&to_sign)?;
        }
        self.core = Some(MessageCore {
            protected: body_protected,
            payload,
            authenticator: Vec::new(),
        });
        Ok(())
    }

    /// Signs the message and returns its tagged encoding.
    ///
    /// # Errors
    ///
    /// See [`SignMessage::sign`].
    pub fn sign_and_encode(
        &mut self,
        signers: &[Box<dyn Signer>],
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.sign(signers, external_aad)?;
        self.to_vec()
    }

    /// Signs the message and returns its encoding wrapped in the CWT tag.
    ///
    /// # Errors
    ///
    /// See [`SignMessage::sign`].
    pub fn sign_and_encode_cwt(
        &mut self,
        signers: &[Box<dyn Signer>],
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.sign(signers, external_aad)?;
        self.to_cwt_vec()
    }

    /// Returns the tagged encoding of a signed message.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Precondition`](crate::error::ErrorKind::Precondition)
    /// before [`sign`](SignMessage::sign) has run.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(false)
    }

    /// Returns the CWT-tagged encoding of a signed message.
    ///
    /// # Errors
    ///
    /// See [`SignMessage::to_vec`].
    pub fn to_cwt_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(true)
    }

    fn encode(&self, wrap_as_cwt: bool) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "sign::encode";
        let core = self
            .core
            .as_ref()
            .ok_or_else(|| CoseError::precondition(OP, "signatures not computed; call sign first"))?;
        let signatures = self
            .signatures
            .iter()
            .map(|slot| {
                if slot.signature.is_empty() {
                    return Err(CoseError::precondition(OP, "unsigned signature slot"));
                }
                Ok(Value::Array(vec![
                    Value::Bytes(slot.protected_raw.clone()),
                    slot.unprotected.to_value(),
                    Value::Bytes(slot.signature.clone()),
                ]))
            })
            .collect::<Result<Vec<_>, _>>()?;
        encode_tagged(
            tag::COSE_SIGN,
            Value::Array(vec![
                Value::Bytes(core.protected.clone()),
                self.unprotected.to_value(),
                Value::Bytes(core.payload.clone()),
                Value::Array(signatures),
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
    pub fn from_slice(data: &[u8]) -> Result<SignMessage<T>, CoseError> {
        const OP: &str = "sign::from_slice";
        let items = decode_tagged(OP, data, tag::COSE_SIGN)?;
        if items.len() != 4 {
            return Err(CoseError::invalid_cbor(
                OP,
                format!("COSE_Sign must have 4 elements, found {}", items.len()),
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

        let Value::Array(raw_slots) = items.next().unwrap_or(Value::Null) else {
            return Err(CoseError::invalid_cbor(OP, "signature list must be an array"));
        };
        if raw_slots.is_empty() {
            return Err(CoseError::invalid_cbor(OP, "signature list must not be empty"));
        }
        let signatures = raw_slots
            .into_iter()
            .map(|raw| Self::slot_from_value(OP, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SignMessage {
            protected,
            unprotected,
            payload: T::from_payload_bytes(&payload_raw)?,
            signatures,
            core: Some(MessageCore {
                protected: protected_raw,
                payload: payload_raw,
                authenticator: Vec::new(),
            }),
        })
    }

    fn slot_from_value(op: &'static str, value: Value) -> Result<SignatureSlot, CoseError> {
        let Value::Array(items) = value else {
            return Err(CoseError::invalid_cbor(
                op,
                format!("signature slot must be an array, found {}", variant_name(&value)),
            ));
        };
        if items.len() != 3 {
            return Err(CoseError::invalid_cbor(
                op,
                format!("signature slot must have 3 elements, found {}", items.len()),
            ));
        }
        let mut items = items.into_iter();
        let protected_raw = bytes_element(
            op,
            "signature protected header",
            items.next().unwrap_or(Value::Null),
        )?;
        Ok(SignatureSlot {
            protected: headers_from_bytes(&protected_raw)?,
            unprotected: IntMap::from_value(op, items.next().unwrap_or(Value::Null))?,
            signature: bytes_element(op, "signature", items.next().unwrap_or(Value::Null))?,
            protected_raw,
        })
    }

    /// Verifies every signature slot against `verifiers`.
    ///
    /// Verifiers are matched to slots by kid; a slot without a kid is
    /// tried against every verifier. Every slot must be covered by at
    /// least one succeeding verifier.
    ///
    /// # Errors
    ///
    /// Fails with the first failing slot's error, carrying the slot
    /// index.
    pub fn verify(
        &self,
        verifiers: &[Box<dyn Verifier>],
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "sign::verify";
        let core = self.core.as_ref().ok_or_else(|| {
            CoseError::precondition(OP, "nothing to verify; call from_slice first")
        })?;
        for (index, slot) in self.signatures.iter().enumerate() {
            self.verify_slot(OP, core, index, slot, verifiers, external_aad)?
                .ok_or_else(|| CoseError::verify_failed_slot(OP, index))?;
        }
        Ok(())
    }

    /// Verifies the slots that have a matching verifier, skipping the
    /// rest, and returns the number of verified slots.
    ///
    /// # Errors
    ///
    /// Fails when a covered slot does not verify, or when no slot is
    /// covered at all.
    pub fn verify_lenient(
        &self,
        verifiers: &[Box<dyn Verifier>],
        external_aad: Option<&[u8]>,
    ) -> Result<usize, CoseError> {
        const OP: &str = "sign::verify_lenient";
        let core = self.core.as_ref().ok_or_else(|| {
            CoseError::precondition(OP, "nothing to verify; call from_slice first")
        })?;
        let mut verified = 0;
        for (index, slot) in self.signatures.iter().enumerate() {
            if self
                .verify_slot(OP, core, index, slot, verifiers, external_aad)?
                .is_some()
            {
                verified += 1;
            }
        }
        if verified == 0 {
            return Err(CoseError::verify_failed(OP));
        }
        Ok(verified)
    }

    /// Tries the verifiers eligible for `slot`. Returns `Ok(Some(()))` on
    /// success, `Ok(None)` when no verifier is eligible, and the first
    /// failure (with the slot index) when eligible verifiers all reject.
    fn verify_slot(
        &self,
        op: &'static str,
        core: &MessageCore,
        index: usize,
        slot: &SignatureSlot,
        verifiers: &[Box<dyn Verifier>],
        external_aad: Option<&[u8]>,
    ) -> Result<Option<()>, CoseError> {
        let kid = slot.kid().map_err(|e| e.with_slot(index))?;
        let slot_alg = if slot.protected.has(header::ALG) {
            Some(slot.protected.get_i64(header::ALG)?)
        } else {
            None
        };
        let to_sign = auth_structure(
            CONTEXT,
            &core.protected,
            Some(slot.protected_raw.as_slice()),
            external_aad,
            &core.payload,
        )?;

        let mut first_failure = None;
        for verifier in verifiers {
            if !kid.is_empty() && verifier.key().kid() != kid {
                continue;
            }
            if let Some(slot_alg) = slot_alg {
                if verifier.key().alg() != slot_alg {
                    continue;
                }
            }
            match verifier.verify(&to_sign, &slot.signature) {
                Ok(()) => return Ok(Some(())),
                Err(e) => {
                    first_failure.get_or_insert(e.with_slot(index));
                }
            }
        }
        // No eligible verifier at all: the caller decides whether that is
        // fatal. Eligible verifiers that all rejected: report the first
        // failure.
        match first_failure {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }
}
