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

//! COSE_Recipient structures.
//!
//! Multi-recipient messages carry their recipients verbatim: this crate
//! transports the `[protected, unprotected, ciphertext]` triples but does
//! not run recipient-level key agreement, which is the business of the
//! registered [`Encryptor`](crate::key::Encryptor) factories.

use ciborium::Value;

use crate::common::IntMap;
use crate::cose::{bytes_element, headers_from_bytes, payload_element, protected_bytes, Headers};
use crate::error::{variant_name, CoseError};
use crate::iana::{alg, header};

/// One recipient of a [`MacMessage`](crate::cose::MacMessage) or
/// [`EncryptMessage`](crate::cose::EncryptMessage).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recipient {
    pub protected: Headers,
    pub unprotected: Headers,
    /// Encrypted key material, or empty for direct key agreement.
    pub ciphertext: Vec<u8>,
}

impl Recipient {
    /// Creates a direct-agreement recipient: the content key is the
    /// shared key identified by `kid`, no key material travels.
    #[must_use]
    pub fn direct(kid: &[u8]) -> Recipient {
        Recipient {
            protected: Headers::new(),
            unprotected: Headers::new()
                .with(header::ALG, alg::DIRECT)
                .with(header::KID, Value::Bytes(kid.to_vec())),
            ciphertext: Vec::new(),
        }
    }

    pub(crate) fn to_value(&self) -> Result<Value, CoseError> {
        let ciphertext = if self.ciphertext.is_empty() {
            Value::Null
        } else {
            Value::Bytes(self.ciphertext.clone())
        };
        Ok(Value::Array(vec![
            Value::Bytes(protected_bytes(&self.protected)?),
            self.unprotected.to_value(),
            ciphertext,
        ]))
    }

    pub(crate) fn from_value(op: &'static str, value: Value) -> Result<Recipient, CoseError> {
        let Value::Array(items) = value else {
            return Err(CoseError::invalid_cbor(
                op,
                format!("recipient must be an array, found {}", variant_name(&value)),
            ));
        };
        if items.len() != 3 {
            return Err(CoseError::invalid_cbor(
                op,
                format!("recipient must have 3 elements, found {}", items.len()),
            ));
        }
        let mut items = items.into_iter();
        let protected = headers_from_bytes(&bytes_element(
            op,
            "recipient protected header",
            items.next().unwrap_or(Value::Null),
        )?)?;
        let unprotected = IntMap::from_value(op, items.next().unwrap_or(Value::Null))?;
        let ciphertext = payload_element(op, items.next().unwrap_or(Value::Null))?;
        Ok(Recipient {
            protected,
            unprotected,
            ciphertext,
        })
    }
}

/// Serialises a recipient list.
pub(crate) fn recipients_to_value(recipients: &[Recipient]) -> Result<Value, CoseError> {
    Ok(Value::Array(
        recipients
            .iter()
            .map(Recipient::to_value)
            .collect::<Result<_, _>>()?,
    ))
}

/// Parses a recipient list.
pub(crate) fn recipients_from_value(
    op: &'static str,
    value: Value,
) -> Result<Vec<Recipient>, CoseError> {
    let Value::Array(items) = value else {
        return Err(CoseError::invalid_cbor(
            op,
            format!(
                "recipient list must be an array, found {}",
                variant_name(&value)
            ),
        ));
    };
    items
        .into_iter()
        .map(|item| Recipient::from_value(op, item))
        .collect()
}
