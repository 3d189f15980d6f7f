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

//! The `COSE_KDF_Context` structure of RFC 9053 §5.2.
//!
//! Key-agreement recipients derive their content-encryption key by
//! feeding the canonical encoding of this context into their KDF. The
//! derivation itself is the business of the registered
//! [`Encryptor`](crate::key::Encryptor) factories; this module only
//! provides the deterministic context bytes.

use ciborium::Value;

use crate::common::cbor::marshal_cbor;
use crate::error::CoseError;

/// Identity, nonce and other transcript data of one party.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartyInfo {
    /// Party identity, e.g. its kid.
    pub identity: Option<Vec<u8>>,
    /// Party nonce.
    pub nonce: Option<Vec<u8>>,
    /// Other application-supplied party data.
    pub other: Option<Vec<u8>>,
}

impl PartyInfo {
    fn to_value(&self) -> Value {
        let field = |v: &Option<Vec<u8>>| match v {
            Some(bytes) => Value::Bytes(bytes.clone()),
            None => Value::Null,
        };
        Value::Array(vec![
            field(&self.identity),
            field(&self.nonce),
            field(&self.other),
        ])
    }
}

/// Public context information: output key length and the protected
/// bucket of the message being derived for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuppPubInfo {
    /// Length of the key to derive, in bits.
    pub key_data_length: u64,
    /// Wire form of the protected bucket (see
    /// [`protected_bytes`](crate::cose::protected_bytes)).
    pub protected: Vec<u8>,
    /// Other application-supplied public data.
    pub other: Option<Vec<u8>>,
}

/// The `COSE_KDF_Context` array.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KdfContext {
    /// Identifier of the content-encryption algorithm the derived key is
    /// for.
    pub algorithm_id: i64,
    pub party_u: PartyInfo,
    pub party_v: PartyInfo,
    pub supp_pub_info: SuppPubInfo,
    /// Secret supplementary data, appended only when present.
    pub supp_priv_info: Option<Vec<u8>>,
}

impl KdfContext {
    /// Returns the canonical encoding fed into the KDF.
    ///
    /// # Errors
    ///
    /// Fails if a contained value cannot be represented as CBOR.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        let mut supp_pub = vec![
            Value::from(self.supp_pub_info.key_data_length),
            Value::Bytes(self.supp_pub_info.protected.clone()),
        ];
        if let Some(other) = &self.supp_pub_info.other {
            supp_pub.push(Value::Bytes(other.clone()));
        }

        let mut items = vec![
            Value::from(self.algorithm_id),
            self.party_u.to_value(),
            self.party_v.to_value(),
            Value::Array(supp_pub),
        ];
        if let Some(priv_info) = &self.supp_priv_info {
            items.push(Value::Bytes(priv_info.clone()));
        }
        marshal_cbor(&Value::Array(items))
    }
}
