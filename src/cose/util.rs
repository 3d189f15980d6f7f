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

//! Internal helpers for the encrypted message types.

use crate::cose::Headers;
use crate::error::CoseError;
use crate::iana::{header, key_param};
use crate::key::Key;

/// Resolves the nonce for an encryption operation from the header buckets
/// (RFC 9052 §3.1).
///
/// An explicit `IV` parameter wins. A `Partial IV` is left-padded with
/// zeros to the nonce length and XORed with the key's `Base IV`. When
/// neither parameter is present, `Ok(None)` is returned and the caller is
/// expected to generate a fresh nonce.
pub(crate) fn message_nonce(
    op: &'static str,
    protected: &Headers,
    unprotected: &Headers,
    key: &Key,
    nonce_len: usize,
) -> Result<Option<Vec<u8>>, CoseError> {
    let lookup = |label: i64| -> Result<Vec<u8>, CoseError> {
        let value = unprotected.get_bytes(label)?;
        if value.is_empty() {
            return protected.get_bytes(label);
        }
        Ok(value)
    };

    let iv = lookup(header::IV)?;
    let partial_iv = lookup(header::PARTIAL_IV)?;

    if !iv.is_empty() {
        if !partial_iv.is_empty() {
            return Err(CoseError::invalid_cbor(
                op,
                "IV and Partial IV must not both be present",
            ));
        }
        if iv.len() != nonce_len {
            return Err(CoseError::invalid_cbor(
                op,
                format!("IV must be {nonce_len} bytes"),
            ));
        }
        return Ok(Some(iv));
    }

    if partial_iv.is_empty() {
        return Ok(None);
    }
    if partial_iv.len() > nonce_len {
        return Err(CoseError::invalid_cbor(
            op,
            format!("Partial IV longer than the {nonce_len}-byte nonce"),
        ));
    }
    let base_iv = key.params().get_bytes(key_param::BASE_IV)?;
    if base_iv.is_empty() {
        return Err(CoseError::invalid_key(
            op,
            "Partial IV requires a Base IV on the key",
        ));
    }
    if base_iv.len() > nonce_len {
        return Err(CoseError::invalid_key(
            op,
            format!("Base IV longer than the {nonce_len}-byte nonce"),
        ));
    }

    let mut nonce = vec![0u8; nonce_len];
    nonce[nonce_len - partial_iv.len()..].copy_from_slice(&partial_iv);
    for (nonce_byte, base_byte) in nonce.iter_mut().zip(base_iv.iter()) {
        *nonce_byte ^= base_byte;
    }
    Ok(Some(nonce))
}
