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

//! AEAD encryptors: AES-GCM, AES-CCM and ChaCha20-Poly1305.
//!
//! All three families share the [`aead`](::aead) trait plumbing; the
//! per-family submodules only dispatch an algorithm identifier onto a
//! concrete cipher type.

use aead::{Aead, KeyInit, Payload};
use ciborium::Value;
use zeroize::Zeroize;

use crate::error::CoseError;
use crate::iana::{alg, key_op, key_type, symmetric};
use crate::key::{random_bytes, Encryptor, Key};

#[cfg(feature = "aes-ccm")]
mod aes_ccm;
#[cfg(feature = "aes-gcm")]
mod aes_gcm;
#[cfg(feature = "chacha20-poly1305")]
mod chacha_poly;

#[cfg(test)]
mod tests;

/// Key length in bytes for a symmetric AEAD algorithm (RFC 9053 §4).
pub(crate) fn key_size(op: &'static str, algorithm: i64) -> Result<usize, CoseError> {
    match algorithm {
        alg::A128GCM
        | alg::AES_CCM_16_64_128
        | alg::AES_CCM_64_64_128
        | alg::AES_CCM_16_128_128
        | alg::AES_CCM_64_128_128 => Ok(16),
        alg::A192GCM => Ok(24),
        alg::A256GCM
        | alg::AES_CCM_16_64_256
        | alg::AES_CCM_64_64_256
        | alg::AES_CCM_16_128_256
        | alg::AES_CCM_64_128_256
        | alg::CHACHA20_POLY1305 => Ok(32),
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}

/// Nonce length in bytes for a symmetric AEAD algorithm.
///
/// AES-GCM and ChaCha20-Poly1305 use 96-bit nonces; the AES-CCM variants
/// are parameterised to 13- or 7-byte nonces (RFC 9053 §4.2).
pub(crate) fn nonce_size(op: &'static str, algorithm: i64) -> Result<usize, CoseError> {
    match algorithm {
        alg::A128GCM | alg::A192GCM | alg::A256GCM | alg::CHACHA20_POLY1305 => Ok(12),
        alg::AES_CCM_16_64_128
        | alg::AES_CCM_16_64_256
        | alg::AES_CCM_16_128_128
        | alg::AES_CCM_16_128_256 => Ok(13),
        alg::AES_CCM_64_64_128
        | alg::AES_CCM_64_64_256
        | alg::AES_CCM_64_128_128
        | alg::AES_CCM_64_128_256 => Ok(7),
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}

/// Generates a fresh symmetric key for the given AEAD algorithm.
///
/// # Errors
///
/// Fails for algorithms outside the AEAD set.
pub fn generate_key(algorithm: i64) -> Result<Key, CoseError> {
    let len = key_size("aead::generate_key", algorithm)?;
    Ok(Key::new(key_type::SYMMETRIC)
        .with_param(crate::iana::key_param::ALG, algorithm)
        .with_param(symmetric::K, Value::Bytes(random_bytes(len))))
}

/// Creates an AEAD [`Encryptor`] from a symmetric key. Registered in the
/// default registry for every enabled AEAD algorithm identifier.
///
/// # Errors
///
/// Fails if the key is not symmetric, its `k` parameter is missing, or
/// the key length does not match the algorithm.
pub fn new_encryptor(key: &Key) -> Result<Box<dyn Encryptor>, CoseError> {
    const OP: &str = "aead::new_encryptor";
    if key.kty() != key_type::SYMMETRIC {
        return Err(CoseError::invalid_key(OP, "key type is not Symmetric"));
    }
    if !key.op_allowed(key_op::ENCRYPT) && !key.op_allowed(key_op::DECRYPT) {
        return Err(CoseError::invalid_key(
            OP,
            "key permits neither encrypt nor decrypt",
        ));
    }
    let algorithm = key.alg();
    let key_len = key_size(OP, algorithm)?;
    let nonce_len = nonce_size(OP, algorithm)?;
    let k = key.params().get_bytes(symmetric::K)?;
    if k.is_empty() {
        return Err(CoseError::invalid_key(OP, "missing key component k"));
    }
    if k.len() != key_len {
        return Err(CoseError::invalid_key(
            OP,
            format!("key must be {key_len} bytes for algorithm {algorithm}"),
        ));
    }
    Ok(Box::new(AeadEncryptor {
        key: key.clone(),
        algorithm,
        nonce_len,
        k,
    }))
}

#[derive(Debug)]
struct AeadEncryptor {
    key: Key,
    algorithm: i64,
    nonce_len: usize,
    k: Vec<u8>,
}

impl Encryptor for AeadEncryptor {
    fn key(&self) -> &Key {
        &self.key
    }

    fn nonce_size(&self) -> usize {
        self.nonce_len
    }

    fn encrypt(&self, plaintext: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "aead::encrypt";
        if nonce.len() != self.nonce_len {
            return Err(CoseError::invalid_key(
                OP,
                format!("nonce must be {} bytes", self.nonce_len),
            ));
        }
        dispatch(OP, self.algorithm, &self.k, plaintext, nonce, aad, true)
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "aead::decrypt";
        if nonce.len() != self.nonce_len {
            return Err(CoseError::invalid_key(
                OP,
                format!("nonce must be {} bytes", self.nonce_len),
            ));
        }
        dispatch(OP, self.algorithm, &self.k, ciphertext, nonce, aad, false)
    }
}

impl Drop for AeadEncryptor {
    fn drop(&mut self) {
        self.k.zeroize();
    }
}

#[allow(unused_variables)]
fn dispatch(
    op: &'static str,
    algorithm: i64,
    k: &[u8],
    data: &[u8],
    nonce: &[u8],
    aad: &[u8],
    seal: bool,
) -> Result<Vec<u8>, CoseError> {
    match algorithm {
        #[cfg(feature = "aes-gcm")]
        alg::A128GCM | alg::A192GCM | alg::A256GCM => {
            aes_gcm::apply(op, algorithm, k, data, nonce, aad, seal)
        }
        #[cfg(feature = "aes-ccm")]
        alg::AES_CCM_16_64_128
        | alg::AES_CCM_16_64_256
        | alg::AES_CCM_64_64_128
        | alg::AES_CCM_64_64_256
        | alg::AES_CCM_16_128_128
        | alg::AES_CCM_16_128_256
        | alg::AES_CCM_64_128_128
        | alg::AES_CCM_64_128_256 => aes_ccm::apply(op, algorithm, k, data, nonce, aad, seal),
        #[cfg(feature = "chacha20-poly1305")]
        alg::CHACHA20_POLY1305 => chacha_poly::apply(op, k, data, nonce, aad, seal),
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}

/// Runs one AEAD operation with the concrete cipher `A`.
fn apply_with<A: Aead + KeyInit>(
    op: &'static str,
    k: &[u8],
    data: &[u8],
    nonce: &[u8],
    aad: &[u8],
    seal: bool,
) -> Result<Vec<u8>, CoseError> {
    let cipher = A::new_from_slice(k).map_err(|e| CoseError::invalid_key(op, e.to_string()))?;
    let nonce = aead::Nonce::<A>::from_slice(nonce);
    let payload = Payload { msg: data, aad };
    if seal {
        cipher
            .encrypt(nonce, payload)
            .map_err(|_| CoseError::precondition(op, "plaintext rejected by AEAD cipher"))
    } else {
        cipher
            .decrypt(nonce, payload)
            .map_err(|_| CoseError::verify_failed(op))
    }
}
