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

//! COSE header buckets.
//!
//! A header bucket is an [`IntMap`] keyed by the parameters of
//! [`iana::header`](crate::iana::header). The protected bucket travels as
//! a byte string covered by the authenticator; per RFC 9052 §3 an *empty*
//! protected bucket is serialised as the zero-length byte string, never
//! as the encoding of an empty map (`0xa0`).

use crate::common::IntMap;
use crate::error::CoseError;


/// A protected or unprotected COSE header bucket.
pub type Headers = IntMap;

/// Returns the wire form of a protected header bucket: the empty byte
/// string for an empty bucket, otherwise the canonical map encoding.
///
/// # Errors
///
/// Fails if a contained value cannot be represented as CBOR.
pub fn protected_bytes(headers: &Headers) -> Result<Vec<u8>, CoseError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    headers.to_vec()
}

/// Parses the wire form of a protected header bucket.
///
/// Accepts the empty byte string, a canonically-encoded map, and the
/// `0xa0` empty-map form found in older encoders. Anything else,
/// including indefinite-length and non-canonically ordered maps, is
/// rejected: the protected bucket feeds the authenticated structures and
/// must re-encode to the exact received bytes.
///
/// # Errors
///
/// Fails with [`ErrorKind::InvalidCbor`](crate::error::ErrorKind::InvalidCbor)
/// on malformed or non-canonical input.
pub fn headers_from_bytes(data: &[u8]) -> Result<Headers, CoseError> {
    const OP: &str = "header::from_bytes";
    if data.is_empty() {
        return Ok(Headers::new());
    }
    let headers = Headers::from_slice(data).map_err(|e| CoseError { op: OP, ..e })?;
    // The 0xa0 form passes this check: an empty bucket re-encodes to the
    // empty map, and only protected_bytes() applies the empty-string rule.
    if headers.to_vec()? != data {
        return Err(CoseError::invalid_cbor(
            OP,
            "protected header is not canonically encoded",
        ));
    }
    Ok(headers)
}
