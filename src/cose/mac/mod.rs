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

//! COSE_Mac: a MACed message with explicit recipients (RFC 9052 §6.1).

use ciborium::Value;

use crate::common::IntMap;
use crate::cose::recipient::{recipients_from_value, recipients_to_value};
use crate::cose::{
    apply_key_headers, auth_structure, bytes_element, check_alg, decode_tagged, encode_tagged,
    headers_from_bytes, payload_element, protected_bytes, Headers, MessageCore, Payload,
    Recipient,
};
use crate::error::CoseError;
use crate::iana::tag;
use crate::key::Macer;

#[cfg(all(test, feature = "hmac"))]
mod tests;

const CONTEXT: &str = "MAC";

/// A COSE_Mac message.
#[derive(Clone, Debug)]
pub struct MacMessage<T> {
    /// Header parameters covered by the tag.
    pub protected: Headers,
    /// Header parameters outside the tag.
    pub unprotected: Headers,
    pub payload: T,
    /// Recipient structures, carried verbatim.
    pub recipients: Vec<Recipient>,
    core: Option<MessageCore>,
}

/// Decodes `data` and verifies its MAC tag in one step.
///
/// # Errors
///
/// Fails on malformed input or a failing tag check.
pub fn verify_mac_message<T: Payload>(
    macer: &dyn Macer,
    data: &[u8],
    external_aad: Option<&[u8]>,
) -> Result<MacMessage<T>, CoseError> {
    let message = MacMessage::from_slice(data)?;
    message.verify(macer, external_aad)?;
    Ok(message)
}

impl<T: Payload> MacMessage<T> {
    /// Creates an uncomputed message with empty header buckets and no
    /// recipients.
    #[must_use]
    pub fn new(payload: T) -> MacMessage<T> {
        MacMessage {
            protected: Headers::new(),
            unprotected: Headers::new(),
            payload,
            recipients: Vec::new(),
            core: None,
        }
    }

    /// Computes the MAC tag with `macer`.
    ///
    /// # Errors
    ///
    /// Fails on a header/key algorithm mismatch, an empty recipient
    /// list, or a MACer failure.
    pub fn compute(
        &mut self,
        macer: &dyn Macer,
        external_aad: Option<&[u8]>,
    ) -> Result<(), CoseError> {
        const OP: &str = "mac::compute";
        if self.recipients.is_empty() {
            return Err(CoseError::precondition(OP, "message has no recipients"));
        }
        apply_key_headers(OP, &mut self.protected, &mut self.unprotected, macer.key())?;
        let protected = protected_bytes(&self.protected)?;
        let payload = self.payload.to_payload_bytes()?;
        let to_mac = auth_structure(CONTEXT, &protected, None, external_aad, &payload)?;
        let tag = macer.mac_create(&to_mac)?;
        self.core = Some(MessageCore {
            protected,
            payload,
            authenticator: tag,
        });
        Ok(())
    }

    /// Computes the tag and returns the tagged encoding.
    ///
    /// # Errors
    ///
    /// See [`MacMessage::compute`].
    pub fn compute_and_encode(
        &mut self,
        macer: &dyn Macer,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.compute(macer, external_aad)?;
        self.to_vec()
    }

    /// Computes the tag and returns the encoding wrapped in the CWT tag.
    ///
    /// # Errors
    ///
    /// See [`MacMessage::compute`].
    pub fn compute_and_encode_cwt(
        &mut self,
        macer: &dyn Macer,
        external_aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CoseError> {
        self.compute(macer, external_aad)?;
        self.to_cwt_vec()
    }

    /// Returns the tagged encoding of a computed message.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Precondition`](crate::error::ErrorKind::Precondition)
    /// before [`compute`](MacMessage::compute) has run.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(false)
    }

    /// Returns the CWT-tagged encoding of a computed message.
    ///
    /// # Errors
    ///
    /// See [`MacMessage::to_vec`].
    pub fn to_cwt_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.encode(true)
    }

    fn encode(&self, wrap_as_cwt: bool) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "mac::encode";
        let core = self
            .core
            .as_ref()
            .ok_or_else(|| CoseError::precondition(OP, "tag not computed; call compute first"))?;
        encode_tagged(
            tag::COSE_MAC,
            Value::Array(vec![
                Value::Bytes(core.protected.clone()),
                self.unprotected.to_value(),
                Value::Bytes(core.payload.clone()),
                Value::Bytes(core.authenticator.clone()),
                recipients_to_value(&self.recipients)?,
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
    pub fn from_slice(data: &[u8]) -> Result<MacMessage<T>, CoseError> {
        const OP: &str = "mac::from_slice";
        let items = decode_tagged(OP, data, tag::COSE_MAC)?;
        if items.len() != 5 {
            return Err(CoseError::invalid_cbor(
                OP,
                format!("COSE_Mac must have 5 elements, found {}", items.len()),
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
        let tag = bytes_element(OP, "tag", items.next().unwrap_or(Value::Null))?;
        let recipients = recipients_from_value(OP, items.next().unwrap_or(Value::Null))?;
        Ok(MacMessage {
            protected,
            unprotected,
            payload: T::from_payload_bytes(&payload_raw)?,
            recipients,
            core: Some(MessageCore {
                protected: protected_raw,
                payload: payload_raw,
                authenticator: tag,
            }),
        })
    }

    /// Verifies the MAC tag with `macer`.
    ///
    /// # Errors
    ///
    /// Fails before [`from_slice`](MacMessage::from_slice) or
    /// [`compute`](MacMessage::compute) has run, on an algorithm
    /// mismatch, or when the tag check rejects the message.
    pub fn verify(&self, macer: &dyn Macer, external_aad: Option<&[u8]>) -> Result<(), CoseError> {
        const OP: &str = "mac::verify";
        let core = self.core.as_ref().ok_or_else(|| {
            CoseError::precondition(OP, "nothing to verify; call from_slice first")
        })?;
        check_alg(OP, &self.protected, macer.key())?;
        let to_mac = auth_structure(
            CONTEXT,
            &core.protected,
            None,
            external_aad,
            &core.payload,
        )?;
        macer.mac_verify(&to_mac, &core.authenticator)
    }

    /// Returns the MAC tag, if one has been computed or decoded.
    #[must_use]
    pub fn tag(&self) -> Option<&[u8]> {
        self.core.as_ref().map(|core| core.authenticator.as_slice())
    }
}
