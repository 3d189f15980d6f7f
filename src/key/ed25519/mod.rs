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

//! EdDSA over Ed25519 (OKP keys).

use ciborium::Value;
use ed25519_dalek::{Signer as _, Verifier as _};
use rand::rngs::OsRng;

use crate::error::CoseError;
use crate::iana::{alg, curve, key_op, key_type, okp};
use crate::key::{Key, Signer, Verifier};


const SEED_LEN: usize = 32;

/// Generates a fresh Ed25519 key.
#[must_use]
pub fn generate_key() -> Key {
    let secret = ed25519_dalek::SigningKey::generate(&mut OsRng);
    Key::new(key_type::OKP)
        .with_param(crate::iana::key_param::ALG, alg::EDDSA)
        .with_param(okp::CRV, curve::ED25519)
        .with_param(okp::X, Value::Bytes(secret.verifying_key().to_bytes().to_vec()))
        .with_param(okp::D, Value::Bytes(secret.to_bytes().to_vec()))
}

/// Builds an Ed25519 key from a 32-byte seed.
///
/// # Errors
///
/// Fails if `seed` does not have the expected length.
pub fn key_from_seed(seed: &[u8]) -> Result<Key, CoseError> {
    const OP: &str = "ed25519::key_from_seed";
    let seed: [u8; SEED_LEN] = seed
        .try_into()
        .map_err(|_| CoseError::invalid_key(OP, "seed must be 32 bytes"))?;
    let secret = ed25519_dalek::SigningKey::from_bytes(&seed);
    Ok(Key::new(key_type::OKP)
        .with_param(crate::iana::key_param::ALG, alg::EDDSA)
        .with_param(okp::CRV, curve::ED25519)
        .with_param(okp::X, Value::Bytes(secret.verifying_key().to_bytes().to_vec()))
        .with_param(okp::D, Value::Bytes(seed.to_vec())))
}

/// Creates an EdDSA [`Signer`] from an OKP key carrying the private seed
/// `d`. Registered in the default registry for `(OKP, EdDSA)`.
///
/// # Errors
///
/// Fails if the key is not a fit Ed25519 signing key.
pub fn new_signer(key: &Key) -> Result<Box<dyn Signer>, CoseError> {
    const OP: &str = "ed25519::new_signer";
    check_key(OP, key)?;
    if !key.op_allowed(key_op::SIGN) {
        return Err(CoseError::invalid_key(OP, "key does not permit sign"));
    }
    let d = key.params().get_bytes(okp::D)?;
    if d.is_empty() {
        return Err(CoseError::invalid_key(OP, "missing private component d"));
    }
    let seed: [u8; SEED_LEN] = d
        .as_slice()
        .try_into()
        .map_err(|_| CoseError::invalid_key(OP, "parameter d must be 32 bytes"))?;
    Ok(Box::new(Ed25519Signer {
        key: key.clone(),
        secret: ed25519_dalek::SigningKey::from_bytes(&seed),
    }))
}

/// Creates an EdDSA [`Verifier`] from an OKP key carrying the public
/// point `x` (or the seed `d`, from which it is reconstructed).
/// Registered alongside [`new_signer`].
///
/// # Errors
///
/// Fails if the key is not a fit Ed25519 verification key.
pub fn new_verifier(key: &Key) -> Result<Box<dyn Verifier>, CoseError> {
    const OP: &str = "ed25519::new_verifier";
    check_key(OP, key)?;
    if !key.op_allowed(key_op::VERIFY) {
        return Err(CoseError::invalid_key(OP, "key does not permit verify"));
    }
    let x = key.params().get_bytes(okp::X)?;
    let public = if x.is_empty() {
        let d = key.params().get_bytes(okp::D)?;
        if d.is_empty() {
            return Err(CoseError::invalid_key(OP, "missing public component x"));
        }
        let seed: [u8; SEED_LEN] = d
            .as_slice()
            .try_into()
            .map_err(|_| CoseError::invalid_key(OP, "parameter d must be 32 bytes"))?;
        ed25519_dalek::SigningKey::from_bytes(&seed).verifying_key()
    } else {
        let x: [u8; SEED_LEN] = x
            .as_slice()
            .try_into()
            .map_err(|_| CoseError::invalid_key(OP, "parameter x must be 32 bytes"))?;
        ed25519_dalek::VerifyingKey::from_bytes(&x)
            .map_err(|e| CoseError::invalid_key(OP, e.to_string()))?
    };
    Ok(Box::new(Ed25519Verifier {
        key: key.to_public_key()?,
        public,
    }))
}

fn check_key(op: &'static str, key: &Key) -> Result<(), CoseError> {
    if key.kty() != key_type::OKP {
        return Err(CoseError::invalid_key(op, "key type is not OKP"));
    }
    if key.alg() != alg::EDDSA {
        return Err(CoseError::unsupported(op, key_type::OKP, key.alg()));
    }
    if key.params().get_i64(okp::CRV)? != curve::ED25519 {
        return Err(CoseError::invalid_key(op, "curve must be Ed25519"));
    }
    Ok(())
}

#[derive(Debug)]
struct Ed25519Signer {
    key: Key,
    secret: ed25519_dalek::SigningKey,
}

impl Signer for Ed25519Signer {
    fn key(&self) -> &Key {
        &self.key
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CoseError> {
        Ok(self.secret.sign(data).to_bytes().to_vec())
    }
}

#[derive(Debug)]
struct Ed25519Verifier {
    key: Key,
    public: ed25519_dalek::VerifyingKey,
}

impl Verifier for Ed25519Verifier {
    fn key(&self) -> &Key {
        &self.key
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), CoseError> {
        const OP: &str = "ed25519::verify";
        let signature = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| CoseError::verify_failed(OP))?;
        self.public
            .verify(data, &signature)
            .map_err(|_| CoseError::verify_failed(OP))
    }
}
