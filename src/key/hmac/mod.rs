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

//! HMAC-SHA2 MACers, including the 64-bit truncated HMAC 256/64.

use ciborium::Value;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroize;

use crate::error::CoseError;
use crate::iana::{alg, key_op, key_type, symmetric};
use crate::key::{random_bytes, Key, Macer};

#[cfg(test)]
mod tests;

/// Key length and tag length in bytes for an HMAC algorithm, per
/// RFC 9053 §3.1.
fn algorithm_params(op: &'static str, algorithm: i64) -> Result<(usize, usize), CoseError> {
    match algorithm {
        alg::HMAC_256_64 => Ok((32, 8)),
        alg::HMAC_256_256 => Ok((32, 32)),
        alg::HMAC_384_384 => Ok((48, 48)),
        alg::HMAC_512_512 => Ok((64, 64)),
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}

/// Generates a fresh symmetric key for the given HMAC algorithm.
///
/// # Errors
///
/// Fails for non-HMAC algorithms.
pub fn generate_key(algorithm: i64) -> Result<Key, CoseError> {
    let (key_len, _) = algorithm_params("hmac::generate_key", algorithm)?;
    Ok(Key::new(key_type::SYMMETRIC)
        .with_param(crate::iana::key_param::ALG, algorithm)
        .with_param(symmetric::K, Value::Bytes(random_bytes(key_len))))
}

/// Creates an HMAC [`Macer`] from a symmetric key. Registered in the
/// default registry for the four HMAC-SHA2 algorithm identifiers.
///
/// # Errors
///
/// Fails if the key is not symmetric, its `k` parameter is missing, or
/// the key length does not match the algorithm.
pub fn new_macer(key: &Key) -> Result<Box<dyn Macer>, CoseError> {
    const OP: &str = "hmac::new_macer";
    if key.kty() != key_type::SYMMETRIC {
        return Err(CoseError::invalid_key(OP, "key type is not Symmetric"));
    }
    if !key.op_allowed(key_op::MAC_CREATE) && !key.op_allowed(key_op::MAC_VERIFY) {
        return Err(CoseError::invalid_key(
            OP,
            "key permits neither mac_create nor mac_verify",
        ));
    }
    let (key_len, tag_len) = algorithm_params(OP, key.alg())?;
    let k = key.params().get_bytes(symmetric::K)?;
    if k.is_empty() {
        return Err(CoseError::invalid_key(OP, "missing key component k"));
    }
    if k.len() != key_len {
        return Err(CoseError::invalid_key(
            OP,
            format!("key must be {key_len} bytes for algorithm {}", key.alg()),
        ));
    }
    Ok(Box::new(HmacMacer {
        key: key.clone(),
        algorithm: key.alg(),
        tag_len,
        k,
    }))
}

#[derive(Debug)]
struct HmacMacer {
    key: Key,
    algorithm: i64,
    tag_len: usize,
    k: Vec<u8>,
}

impl HmacMacer {
    fn compute(&self, data: &[u8]) -> Result<Vec<u8>, CoseError> {
        const OP: &str = "hmac::mac_create";
        let full = match self.algorithm {
            alg::HMAC_256_64 | alg::HMAC_256_256 => compute_with::<Hmac<Sha256>>(OP, &self.k, data),
            alg::HMAC_384_384 => compute_with::<Hmac<Sha384>>(OP, &self.k, data),
            _ => compute_with::<Hmac<Sha512>>(OP, &self.k, data),
        }?;
        Ok(full[..self.tag_len].to_vec())
    }
}

fn compute_with<M: Mac + hmac::digest::KeyInit>(
    op: &'static str,
    k: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CoseError> {
    let mut mac = <M as Mac>::new_from_slice(k)
        .map_err(|e| CoseError::invalid_key(op, e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl Macer for HmacMacer {
    fn key(&self) -> &Key {
        &self.key
    }

    fn mac_create(&self, data: &[u8]) -> Result<Vec<u8>, CoseError> {
        self.compute(data)
    }

    fn mac_verify(&self, data: &[u8], tag: &[u8]) -> Result<(), CoseError> {
        const OP: &str = "hmac::mac_verify";
        if tag.len() != self.tag_len {
            return Err(CoseError::verify_failed(OP));
        }
        let verify = |ok: bool| if ok { Ok(()) } else { Err(CoseError::verify_failed(OP)) };
        match self.algorithm {
            alg::HMAC_256_64 | alg::HMAC_256_256 => {
                verify(verify_with::<Hmac<Sha256>>(OP, &self.k, data, tag)?)
            }
            alg::HMAC_384_384 => verify(verify_with::<Hmac<Sha384>>(OP, &self.k, data, tag)?),
            _ => verify(verify_with::<Hmac<Sha512>>(OP, &self.k, data, tag)?),
        }
    }
}

fn verify_with<M: Mac + hmac::digest::KeyInit>(
    op: &'static str,
    k: &[u8],
    data: &[u8],
    tag: &[u8],
) -> Result<bool, CoseError> {
    let mut mac = <M as Mac>::new_from_slice(k)
        .map_err(|e| CoseError::invalid_key(op, e.to_string()))?;
    mac.update(data);
    // Constant-time comparison, tolerating the COSE truncated-tag forms.
    Ok(mac.verify_truncated_left(tag).is_ok())
}

impl Drop for HmacMacer {
    fn drop(&mut self) {
        self.k.zeroize();
    }
}
