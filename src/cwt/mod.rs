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

//! CBOR Web Token claim sets (RFC 8392) and their validation.
//!
//! A claim set exists in two interchangeable representations: the named
//! [`Claims`] record covering the seven registered claims, and the open
//! integer-keyed [`ClaimsMap`], which additionally carries extension
//! claims such as the CAT family (see [`iana::claim`](crate::iana::claim)).
//! Both implement [`Payload`] and can be carried in any COSE message
//! type, conventionally wrapped in the CWT tag via the `*_cwt` encode
//! variants.

use core::ops::{Deref, DerefMut};

use ciborium::Value;
use derive_builder::Builder;

use crate::common::IntMap;
use crate::cose::Payload;
use crate::error::CoseError;
use crate::iana::claim;

pub mod validator;

#[cfg(test)]
mod tests;

pub use validator::{ValidationOptions, ValidationOptionsBuilder, Validator};

/// The registered CWT claims as a named record.
///
/// Absent claims are `None` and are omitted from the encoded map.
#[derive(Clone, Debug, Default, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct Claims {
    /// `iss` (1): principal that issued the token.
    pub issuer: Option<String>,
    /// `sub` (2): principal that is the subject of the token.
    pub subject: Option<String>,
    /// `aud` (3): recipient the token is intended for.
    pub audience: Option<String>,
    /// `exp` (4): expiration time, in seconds since the epoch.
    pub expiration: Option<i64>,
    /// `nbf` (5): time before which the token must be rejected.
    pub not_before: Option<i64>,
    /// `iat` (6): time at which the token was issued.
    pub issued_at: Option<i64>,
    /// `cti` (7): opaque token identifier.
    pub cwt_id: Option<Vec<u8>>,
}

impl Claims {
    /// Returns a builder for a claim set.
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// Converts the record into its open map form.
    #[must_use]
    pub fn to_map(&self) -> ClaimsMap {
        let mut map = ClaimsMap::new();
        if let Some(issuer) = &self.issuer {
            map.set(claim::ISS, issuer.as_str());
        }
        if let Some(subject) = &self.subject {
            map.set(claim::SUB, subject.as_str());
        }
        if let Some(audience) = &self.audience {
            map.set(claim::AUD, audience.as_str());
        }
        if let Some(expiration) = self.expiration {
            map.set(claim::EXP, expiration);
        }
        if let Some(not_before) = self.not_before {
            map.set(claim::NBF, not_before);
        }
        if let Some(issued_at) = self.issued_at {
            map.set(claim::IAT, issued_at);
        }
        if let Some(cwt_id) = &self.cwt_id {
            map.set(claim::CTI, Value::Bytes(cwt_id.clone()));
        }
        map
    }

    /// Builds the record from the map form, checking the shape of every
    /// registered claim and ignoring extension claims.
    ///
    /// # Errors
    ///
    /// Fails when a registered claim carries a value of the wrong shape
    /// or an integer claim does not fit `i64`.
    pub fn from_map(map: &ClaimsMap) -> Result<Claims, CoseError> {
        let text = |label: i64| -> Result<Option<String>, CoseError> {
            if map.has(label) {
                map.get_string(label).map(Some)
            } else {
                Ok(None)
            }
        };
        let time = |label: i64| -> Result<Option<i64>, CoseError> {
            if map.has(label) {
                map.get_i64(label).map(Some)
            } else {
                Ok(None)
            }
        };
        Ok(Claims {
            issuer: text(claim::ISS)?,
            subject: text(claim::SUB)?,
            audience: text(claim::AUD)?,
            expiration: time(claim::EXP)?,
            not_before: time(claim::NBF)?,
            issued_at: time(claim::IAT)?,
            cwt_id: if map.has(claim::CTI) {
                Some(map.get_bytes(claim::CTI)?)
            } else {
                None
            },
        })
    }

    /// Encodes the claim set as a deterministic CBOR map.
    ///
    /// # Errors
    ///
    /// See [`IntMap::to_vec`].
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.to_map().to_vec()
    }

    /// Decodes a claim set from CBOR bytes.
    ///
    /// # Errors
    ///
    /// Fails on malformed CBOR or wrongly-shaped registered claims.
    pub fn from_slice(data: &[u8]) -> Result<Claims, CoseError> {
        Claims::from_map(&ClaimsMap::from_slice(data)?)
    }
}

impl Payload for Claims {
    fn to_payload_bytes(&self) -> Result<Vec<u8>, CoseError> {
        self.to_vec()
    }

    fn from_payload_bytes(data: &[u8]) -> Result<Self, CoseError> {
        Claims::from_slice(data)
    }
}

/// The open, integer-keyed form of a CWT claim set.
///
/// Extension claims live alongside the registered ones; typed accessors
/// are provided for the latter and follow the [`IntMap`] zero-value
/// contract.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimsMap(IntMap);

impl ClaimsMap {
    /// Creates an empty claim map.
    #[must_use]
    pub fn new() -> ClaimsMap {
        ClaimsMap::default()
    }

    /// Returns the `iss` claim, or an empty string when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-text value.
    pub fn issuer(&self) -> Result<String, CoseError> {
        self.0.get_string(claim::ISS)
    }

    /// Returns the `sub` claim, or an empty string when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-text value.
    pub fn subject(&self) -> Result<String, CoseError> {
        self.0.get_string(claim::SUB)
    }

    /// Returns the `aud` claim, or an empty string when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-text value.
    pub fn audience(&self) -> Result<String, CoseError> {
        self.0.get_string(claim::AUD)
    }

    /// Returns the `exp` claim, or zero when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-integer value.
    pub fn expiration(&self) -> Result<i64, CoseError> {
        self.0.get_i64(claim::EXP)
    }

    /// Returns the `nbf` claim, or zero when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-integer value.
    pub fn not_before(&self) -> Result<i64, CoseError> {
        self.0.get_i64(claim::NBF)
    }

    /// Returns the `iat` claim, or zero when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-integer value.
    pub fn issued_at(&self) -> Result<i64, CoseError> {
        self.0.get_i64(claim::IAT)
    }

    /// Returns the `cti` claim, or an empty vector when absent.
    ///
    /// # Errors
    ///
    /// Fails when the claim is present with a non-bytes value.
    pub fn cwt_id(&self) -> Result<Vec<u8>, CoseError> {
        self.0.get_bytes(claim::CTI)
    }

    /// Encodes the claim map as deterministic CBOR.
    ///
    /// # Errors
    ///
    /// See [`IntMap::to_vec`].
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.0.to_vec()
    }

    /// Decodes a claim map from CBOR bytes.
    ///
    /// # Errors
    ///
    /// See [`IntMap::from_slice`].
    pub fn from_slice(data: &[u8]) -> Result<ClaimsMap, CoseError> {
        IntMap::from_slice(data).map(ClaimsMap)
    }
}

impl Deref for ClaimsMap {
    type Target = IntMap;

    fn deref(&self) -> &IntMap {
        &self.0
    }
}

impl DerefMut for ClaimsMap {
    fn deref_mut(&mut self) -> &mut IntMap {
        &mut self.0
    }
}

impl From<IntMap> for ClaimsMap {
    fn from(map: IntMap) -> ClaimsMap {
        ClaimsMap(map)
    }
}

impl From<&Claims> for ClaimsMap {
    fn from(claims: &Claims) -> ClaimsMap {
        claims.to_map()
    }
}

impl Payload for ClaimsMap {
    fn to_payload_bytes(&self) -> Result<Vec<u8>, CoseError> {
        self.to_vec()
    }

    fn from_payload_bytes(data: &[u8]) -> Result<Self, CoseError> {
        ClaimsMap::from_slice(data)
    }
}
