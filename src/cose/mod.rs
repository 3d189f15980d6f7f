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

//! The six COSE message types of RFC 9052 and their shared plumbing.
//!
//! Encoding always emits the message's COSE tag; the `*_cwt` encode
//! variants additionally wrap the result in the CWT tag (61). Decoding
//! tolerates both tags being absent, but a present outer tag must match
//! the message type being decoded.

use ciborium::Value;

use crate::common::cbor::{marshal_cbor, unmarshal_cbor};
use crate::error::{variant_name, CoseError};
use crate::iana::header::{ALG, KID};
use crate::iana::{alg, tag};
use crate::key::Key;

pub mod encrypt;
pub mod encrypt0;
pub mod header;
pub mod kdf;
pub mod mac;
pub mod mac0;
pub mod payload;
pub mod recipient;
pub mod sign;
pub mod sign1;

pub(crate) mod util;

pub use encrypt::EncryptMessage;
pub use encrypt0::Encrypt0Message;
pub use header::{headers_from_bytes, protected_bytes, Headers};
pub use kdf::{KdfContext, PartyInfo, SuppPubInfo};
pub use mac::MacMessage;
pub use mac0::Mac0Message;
pub use payload::Payload;
pub use recipient::Recipient;
pub use sign::{SignMessage, SignatureSlot};
pub use sign1::Sign1Message;

/// Raw wire-level fields of a message, cached after a successful
/// compute/sign/encrypt or decode.
#[derive(Clone, Debug)]
pub(crate) struct MessageCore {
    /// Canonical encoding of the (body) protected bucket.
    pub protected: Vec<u8>,
    /// Serialised payload (plaintext for encrypted messages).
    pub payload: Vec<u8>,
    /// Signature, MAC tag or ciphertext, depending on the message type.
    pub authenticator: Vec<u8>,
}

/// Builds the canonical `Sig_structure`/`MAC_structure` byte string
/// (RFC 9052 §4.4 and §6.3): `[context, body_protected, ?sign_protected,
/// external_aad, payload]`.
pub(crate) fn auth_structure(
    context: &str,
    body_protected: &[u8],
    sign_protected: Option<&[u8]>,
    external_aad: Option<&[u8]>,
    payload: &[u8],
) -> Result<Vec<u8>, CoseError> {
    let mut items = Vec::with_capacity(5);
    items.push(Value::Text(context.to_string()));
    items.push(Value::Bytes(body_protected.to_vec()));
    if let Some(sign_protected) = sign_protected {
        items.push(Value::Bytes(sign_protected.to_vec()));
    }
    items.push(Value::Bytes(external_aad.unwrap_or_default().to_vec()));
    items.push(Value::Bytes(payload.to_vec()));
    marshal_cbor(&Value::Array(items))
}

/// Builds the canonical `Enc_structure` byte string (RFC 9052 §5.3):
/// `[context, protected, external_aad]`.
pub(crate) fn enc_structure(
    context: &str,
    protected: &[u8],
    external_aad: Option<&[u8]>,
) -> Result<Vec<u8>, CoseError> {
    marshal_cbor(&Value::Array(vec![
        Value::Text(context.to_string()),
        Value::Bytes(protected.to_vec()),
        Value::Bytes(external_aad.unwrap_or_default().to_vec()),
    ]))
}

/// Serialises `content` wrapped in the COSE tag `tag_number`, optionally
/// wrapped again in the CWT tag.
pub(crate) fn encode_tagged(
    tag_number: u64,
    content: Value,
    wrap_as_cwt: bool,
) -> Result<Vec<u8>, CoseError> {
    let mut value = Value::Tag(tag_number, Box::new(content));
    if wrap_as_cwt {
        value = Value::Tag(tag::CWT, Box::new(value));
    }
    marshal_cbor(&value)
}

/// Parses a message envelope: strips an optional CWT tag and an optional
/// COSE tag (which must equal `expected_tag` when present) and returns
/// the elements of the underlying array.
pub(crate) fn decode_tagged(
    op: &'static str,
    data: &[u8],
    expected_tag: u64,
) -> Result<Vec<Value>, CoseError> {
    let value: Value = unmarshal_cbor(data).map_err(|e| CoseError { op, ..e })?;
    let value = match value {
        Value::Tag(number, inner) if number == tag::CWT => match *inner {
            Value::Tag(number, inner) if number == expected_tag => *inner,
            Value::Tag(number, _) => return Err(tag_mismatch(op, expected_tag, number)),
            other => other,
        },
        Value::Tag(number, inner) if number == expected_tag => *inner,
        Value::Tag(number, _) => return Err(tag_mismatch(op, expected_tag, number)),
        other => other,
    };
    match value {
        Value::Array(items) => Ok(items),
        other => Err(CoseError::invalid_cbor(
            op,
            format!("expected array, found {}", variant_name(&other)),
        )),
    }
}

fn tag_mismatch(op: &'static str, expected: u64, found: u64) -> CoseError {
    CoseError::invalid_cbor(op, format!("expected CBOR tag {expected}, found {found}"))
}

/// Extracts a byte string element of the message array.
pub(crate) fn bytes_element(
    op: &'static str,
    what: &str,
    value: Value,
) -> Result<Vec<u8>, CoseError> {
    match value {
        Value::Bytes(b) => Ok(b),
        other => Err(CoseError::invalid_cbor(
            op,
            format!("{what} must be a byte string, found {}", variant_name(&other)),
        )),
    }
}

/// Extracts a payload element, which may be `nil` for detached or empty
/// payloads.
pub(crate) fn payload_element(op: &'static str, value: Value) -> Result<Vec<u8>, CoseError> {
    match value {
        Value::Bytes(b) => Ok(b),
        Value::Null => Ok(Vec::new()),
        other => Err(CoseError::invalid_cbor(
            op,
            format!(
                "payload must be a byte string or nil, found {}",
                variant_name(&other)
            ),
        )),
    }
}

/// Applies the key-driven header rules shared by all compute/sign/encrypt
/// operations (RFC 9052 §3): the key's algorithm is inserted into the
/// protected bucket when absent and checked against it when present, and
/// a non-empty key identifier is inserted into the unprotected bucket
/// when absent.
pub(crate) fn apply_key_headers(
    op: &'static str,
    protected: &mut Headers,
    unprotected: &mut Headers,
    key: &Key,
) -> Result<(), CoseError> {
    let key_alg = key.alg();
    if protected.has(ALG) {
        let found = protected.get_i64(ALG)?;
        if found != key_alg {
            return Err(CoseError::alg_mismatch(op, key_alg, found));
        }
    } else if key_alg != alg::RESERVED {
        protected.set(ALG, key_alg);
    }

    if !unprotected.has(KID) {
        let kid = key.kid();
        if !kid.is_empty() {
            unprotected.set(KID, Value::Bytes(kid));
        }
    }
    Ok(())
}

/// Checks a decoded protected bucket against the algorithm fixed by the
/// key about to verify or decrypt the message.
pub(crate) fn check_alg(
    op: &'static str,
    protected: &Headers,
    key: &Key,
) -> Result<(), CoseError> {
    if protected.has(ALG) {
        let found = protected.get_i64(ALG)?;
        if found != key.alg() {
            return Err(CoseError::alg_mismatch(op, key.alg(), found));
        }
    }
    Ok(())
}
