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

//! The payload contract of the generic message types.

use ciborium::Value;

use crate::common::cbor::{marshal_cbor, unmarshal_cbor};
use crate::error::CoseError;

/// Conversion between a message payload and its wire bytes.
///
/// Raw byte payloads (`Vec<u8>`) pass through unchanged; everything else
/// is carried as its CBOR encoding. Implementations exist for `Vec<u8>`,
/// [`Value`], [`Claims`](crate::cwt::Claims) and
/// [`ClaimsMap`](crate::cwt::ClaimsMap).
pub trait Payload: Sized {
    /// Serialises the payload into the byte string embedded in the
    /// message.
    ///
    /// # Errors
    ///
    /// Fails if the payload cannot be represented as CBOR.
    fn to_payload_bytes(&self) -> Result<Vec<u8>, CoseError>;

    /// Rebuilds the payload from the byte string embedded in a decoded
    /// message.
    ///
    /// # Errors
    ///
    /// Fails if `data` does not parse into the payload type.
    fn from_payload_bytes(data: &[u8]) -> Result<Self, CoseError>;
}

impl Payload for Vec<u8> {
    fn to_payload_bytes(&self) -> Result<Vec<u8>, CoseError> {
        Ok(self.clone())
    }

    fn from_payload_bytes(data: &[u8]) -> Result<Self, CoseError> {
        Ok(data.to_vec())
    }
}

impl Payload for Value {
    fn to_payload_bytes(&self) -> Result<Vec<u8>, CoseError> {
        marshal_cbor(self)
    }

    fn from_payload_bytes(data: &[u8]) -> Result<Self, CoseError> {
        unmarshal_cbor(data)
    }
}
