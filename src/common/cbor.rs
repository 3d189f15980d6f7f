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

//! Thin wrappers around the [`ciborium`] serializer.
//!
//! All CBOR produced by this crate goes through [`marshal_cbor`], which
//! emits the deterministic encoding of RFC 8949 §4.2.1 for everything this
//! crate constructs itself (shortest-form integers, definite lengths;
//! canonical map ordering is the responsibility of
//! [`IntMap`](crate::common::IntMap)).

use ciborium::de::from_reader;
use ciborium::ser::into_writer;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoseError;

/// Encodes `value` as CBOR.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCbor`](crate::error::ErrorKind::InvalidCbor)
/// if the value cannot be represented as CBOR.
pub fn marshal_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CoseError> {
    let mut buf = Vec::new();
    into_writer(value, &mut buf)
        .map_err(|e| CoseError::invalid_cbor("cbor::marshal", e.to_string()))?;
    Ok(buf)
}

/// Decodes a single CBOR item from `data`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCbor`](crate::error::ErrorKind::InvalidCbor)
/// if `data` is not valid CBOR, does not fit `T`, or carries trailing
/// bytes after the first item.
pub fn unmarshal_cbor<T: DeserializeOwned>(data: &[u8]) -> Result<T, CoseError> {
    let mut reader = data;
    let value =
        from_reader(&mut reader).map_err(|e| CoseError::invalid_cbor("cbor::unmarshal", e.to_string()))?;
    if !reader.is_empty() {
        return Err(CoseError::invalid_cbor(
            "cbor::unmarshal",
            format!("{} trailing bytes after CBOR item", reader.len()),
        ));
    }
    Ok(value)
}

/// Strips exactly one leading CBOR tag from `data`.
///
/// Returns `data` unchanged when it does not start with a tag. The tag's
/// content is not re-encoded, so the result is the exact byte range of the
/// tagged item.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCbor`](crate::error::ErrorKind::InvalidCbor)
/// if the tag head is malformed or truncated.
pub fn remove_cbor_tag(data: &[u8]) -> Result<&[u8], CoseError> {
    const OP: &str = "cbor::remove_tag";

    let Some(&initial) = data.first() else {
        return Err(CoseError::invalid_cbor(OP, "empty input"));
    };
    if initial >> 5 != 6 {
        return Ok(data);
    }
    let head_len = match initial & 0x1f {
        0..=23 => 1,
        24 => 2,
        25 => 3,
        26 => 5,
        27 => 9,
        ai => {
            return Err(CoseError::invalid_cbor(
                OP,
                format!("invalid additional information {ai} in tag head"),
            ))
        }
    };
    if data.len() <= head_len {
        return Err(CoseError::invalid_cbor(OP, "truncated tag head"));
    }
    Ok(&data[head_len..])
}
