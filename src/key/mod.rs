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

//! COSE key representation, capability interfaces and the algorithm
//! registry.
//!
//! A [`Key`] is an [`IntMap`] with the parameter conventions of RFC 9052
//! §7. It does not perform cryptography itself: the four capability traits
//! ([`Signer`], [`Verifier`], [`Macer`], [`Encryptor`]) are produced by
//! factories registered per `(kty, alg)` pair in a [`Registry`]
//! (see [`registry`]). The builtin factories live in the per-algorithm
//! submodules and are enabled through cargo features.

use ciborium::Value;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::common::IntMap;
use crate::error::CoseError;
use crate::iana::{key_op, key_param, key_type, okp, symmetric};

pub mod registry;

#[cfg(any(
    feature = "aes-gcm",
    feature = "aes-ccm",
    feature = "chacha20-poly1305"
))]
pub mod aead;
#[cfg(feature = "ecdsa")]
pub mod ecdsa;
#[cfg(feature = "ed25519")]
pub mod ed25519;
#[cfg(feature = "hmac")]
pub mod hmac;

#[cfg(test)]
mod tests;

pub use registry::Registry;

/// A COSE key: an integer-keyed parameter map per RFC 9052 §7.
///
/// The `kty` parameter (1) is mandatory. Private key components (`d` for
/// EC2 and OKP keys, `k` for symmetric keys) are wiped when the key is
/// dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key(IntMap);

impl Key {
    /// Creates a key of the given key type.
    #[must_use]
    pub fn new(kty: i64) -> Key {
        Key(IntMap::new().with(key_param::KTY, kty))
    }

    /// Sets the parameter `label` to `value` and returns the key, for
    /// chained construction.
    #[must_use]
    pub fn with_param<V: Into<Value>>(mut self, label: i64, value: V) -> Key {
        self.0.set(label, value);
        self
    }

    /// Returns the key type, or [`key_type::RESERVED`] if absent or
    /// malformed.
    #[must_use]
    pub fn kty(&self) -> i64 {
        self.0.get_i64(key_param::KTY).unwrap_or(key_type::RESERVED)
    }

    /// Returns the fixed algorithm of the key, or
    /// [`alg::RESERVED`](crate::iana::alg::RESERVED) if the key does not
    /// restrict its algorithm.
    #[must_use]
    pub fn alg(&self) -> i64 {
        self.0.get_i64(key_param::ALG).unwrap_or(0)
    }

    /// Returns the key identifier, or an empty vector when absent.
    #[must_use]
    pub fn kid(&self) -> Vec<u8> {
        self.0.get_bytes(key_param::KID).unwrap_or_default()
    }

    /// Returns true if the key permits the operation `op`.
    ///
    /// A key without a `key_ops` parameter permits every operation.
    #[must_use]
    pub fn op_allowed(&self, op: i64) -> bool {
        match self.0.get(key_param::KEY_OPS) {
            None => true,
            Some(Value::Array(ops)) => ops
                .iter()
                .any(|v| v.as_integer().and_then(|i| i64::try_from(i).ok()) == Some(op)),
            Some(_) => false,
        }
    }

    /// Checks the basic key invariants: `kty` must be present and known.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::error::ErrorKind::InvalidKey)
    /// if the invariants do not hold.
    pub fn check(&self, op: &'static str) -> Result<(), CoseError> {
        match self.kty() {
            key_type::OKP | key_type::EC2 | key_type::SYMMETRIC => Ok(()),
            key_type::RESERVED => Err(CoseError::invalid_key(op, "key has no kty parameter")),
            kty => Err(CoseError::invalid_key(op, format!("unknown kty {kty}"))),
        }
    }

    /// Returns the public projection of this key.
    ///
    /// Private components are removed and, when a `key_ops` parameter is
    /// present, signing/MAC-creation operations are mapped to their
    /// verification counterparts.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](crate::error::ErrorKind::InvalidKey)
    /// for symmetric keys, which have no public projection.
    pub fn to_public_key(&self) -> Result<Key, CoseError> {
        const OP: &str = "key::to_public_key";
        self.check(OP)?;
        if self.kty() == key_type::SYMMETRIC {
            return Err(CoseError::invalid_key(
                OP,
                "symmetric keys have no public projection",
            ));
        }

        let mut public = self.clone();
        // EC2 and OKP use the same parameter number for the private
        // component.
        if let Some(Value::Bytes(d)) = public.0.get_mut(okp::D) {
            d.zeroize();
        }
        public.0.remove(okp::D);

        if public.0.has(key_param::KEY_OPS) {
            let ops: Vec<Value> = self
                .0
                .get_array(key_param::KEY_OPS)
                .map_err(|e| CoseError { op: OP, ..e })?
                .into_iter()
                .filter_map(|v| v.as_integer().and_then(|i| i64::try_from(i).ok()))
                .filter_map(|op| match op {
                    key_op::SIGN => Some(key_op::VERIFY),
                    key_op::MAC_CREATE => Some(key_op::MAC_VERIFY),
                    key_op::VERIFY | key_op::MAC_VERIFY => Some(op),
                    _ => None,
                })
                .map(Value::from)
                .collect();
            public.0.set(key_param::KEY_OPS, Value::Array(ops));
        }
        Ok(public)
    }

    /// Looks up a [`Signer`] for this key in the global registry.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Unsupported`](crate::error::ErrorKind::Unsupported)
    /// when no factory is registered for the key's `(kty, alg)` pair, or
    /// with the factory's error when the key is unfit for the role.
    pub fn signer(&self) -> Result<Box<dyn Signer>, CoseError> {
        registry::global().signer(self)
    }

    /// Looks up a [`Verifier`] for this key in the global registry.
    ///
    /// # Errors
    ///
    /// See [`Key::signer`].
    pub fn verifier(&self) -> Result<Box<dyn Verifier>, CoseError> {
        registry::global().verifier(self)
    }

    /// Looks up a [`Macer`] for this key in the global registry.
    ///
    /// # Errors
    ///
    /// See [`Key::signer`].
    pub fn macer(&self) -> Result<Box<dyn Macer>, CoseError> {
        registry::global().macer(self)
    }

    /// Looks up an [`Encryptor`] for this key in the global registry.
    ///
    /// # Errors
    ///
    /// See [`Key::signer`].
    pub fn encryptor(&self) -> Result<Box<dyn Encryptor>, CoseError> {
        registry::global().encryptor(self)
    }

    /// Returns a view of the key as its underlying parameter map.
    #[must_use]
    pub fn params(&self) -> &IntMap {
        &self.0
    }

    /// Returns a mutable view of the key's parameter map.
    pub fn params_mut(&mut self) -> &mut IntMap {
        &mut self.0
    }

    /// Encodes the key as deterministic CBOR.
    ///
    /// # Errors
    ///
    /// See [`IntMap::to_vec`].
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        self.0.to_vec()
    }

    /// Decodes a key from CBOR bytes and checks its basic invariants.
    ///
    /// # Errors
    ///
    /// Fails on malformed CBOR or a missing/unknown `kty`.
    pub fn from_slice(data: &[u8]) -> Result<Key, CoseError> {
        let key = Key(IntMap::from_slice(data)?);
        key.check("key::from_slice")?;
        Ok(key)
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        // okp::D and ec2::D share the parameter number; symmetric::K is
        // distinct.
        for label in [okp::D, symmetric::K] {
            if let Some(Value::Bytes(b)) = self.0.get_mut(label) {
                b.zeroize();
            }
        }
    }
}

impl From<IntMap> for Key {
    fn from(params: IntMap) -> Key {
        Key(params)
    }
}

/// Produces signatures over to-be-signed byte strings.
pub trait Signer: std::fmt::Debug {
    /// The signing key, including its private component.
    fn key(&self) -> &Key;

    /// Signs `data` and returns the raw signature.
    ///
    /// # Errors
    ///
    /// Implementations fail when the underlying primitive rejects the
    /// operation.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CoseError>;
}

/// Checks signatures over to-be-signed byte strings.
pub trait Verifier: std::fmt::Debug {
    /// The public projection of the verification key.
    fn key(&self) -> &Key;

    /// Verifies `signature` over `data`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::VerifyFailed`](crate::error::ErrorKind::VerifyFailed)
    /// when the signature does not match.
    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), CoseError>;
}

/// Creates and checks MAC tags.
pub trait Macer: std::fmt::Debug {
    /// The MAC key.
    fn key(&self) -> &Key;

    /// Computes the tag over `data`.
    ///
    /// # Errors
    ///
    /// Implementations fail when the underlying primitive rejects the
    /// operation.
    fn mac_create(&self, data: &[u8]) -> Result<Vec<u8>, CoseError>;

    /// Verifies `tag` over `data`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::VerifyFailed`](crate::error::ErrorKind::VerifyFailed)
    /// when the tag does not match.
    fn mac_verify(&self, data: &[u8], tag: &[u8]) -> Result<(), CoseError>;
}

/// Authenticated encryption with associated data.
pub trait Encryptor: std::fmt::Debug {
    /// The content-encryption key.
    fn key(&self) -> &Key;

    /// The nonce length in bytes expected by [`encrypt`](Encryptor::encrypt)
    /// and [`decrypt`](Encryptor::decrypt).
    fn nonce_size(&self) -> usize;

    /// Encrypts `plaintext`, returning the ciphertext with the tag
    /// appended.
    ///
    /// # Errors
    ///
    /// Fails when the nonce has the wrong length or the primitive rejects
    /// the operation.
    fn encrypt(&self, plaintext: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoseError>;

    /// Decrypts `ciphertext` (with the tag appended) and returns the
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::VerifyFailed`](crate::error::ErrorKind::VerifyFailed)
    /// when authentication fails.
    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoseError>;
}

/// An ordered collection of keys, e.g. the signer set of a multi-signer
/// message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeySet(pub Vec<Key>);

impl KeySet {
    /// Returns the first key whose `kid` equals `kid`.
    #[must_use]
    pub fn lookup_by_kid(&self, kid: &[u8]) -> Option<&Key> {
        self.0.iter().find(|k| k.kid() == kid)
    }

    /// Produces one [`Signer`] per key, preserving order.
    ///
    /// # Errors
    ///
    /// Fails if any key has no registered signer factory or is unfit for
    /// signing.
    pub fn signers(&self) -> Result<Vec<Box<dyn Signer>>, CoseError> {
        self.0.iter().map(Key::signer).collect()
    }

    /// Produces one [`Verifier`] per key, preserving order.
    ///
    /// # Errors
    ///
    /// Fails if any key has no registered verifier factory.
    pub fn verifiers(&self) -> Result<Vec<Box<dyn Verifier>>, CoseError> {
        self.0.iter().map(Key::verifier).collect()
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> KeySet {
        KeySet(iter.into_iter().collect())
    }
}

/// Fills a buffer of `len` bytes from the operating system RNG.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}
