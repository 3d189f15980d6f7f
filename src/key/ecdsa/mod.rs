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

//! ECDSA signing and verification over the NIST curves (ES256, ES384).
//!
//! ES512 is absent from the builtin set: the released `p521` crate does
//! not implement the digest primitive required for ECDSA.

use ciborium::Value;
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use rand::rngs::OsRng;

use crate::error::CoseError;
use crate::iana::{alg, curve, ec2, key_op, key_type};
use crate::key::{Key, Signer, Verifier};

#[cfg(test)]
mod tests;

/// Generates a fresh EC2 key for the given ECDSA algorithm.
///
/// # Errors
///
/// Fails for algorithms other than ES256 and ES384.
pub fn generate_key(algorithm: i64) -> Result<Key, CoseError> {
    const OP: &str = "ecdsa::generate_key";
    let (crv, d, x, y) = match algorithm {
        alg::ES256 => {
            let secret = p256::ecdsa::SigningKey::random(&mut OsRng);
            let point = secret.verifying_key().to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                return Err(CoseError::invalid_key(OP, "degenerate public point"));
            };
            (
                curve::P_256,
                secret.to_bytes().to_vec(),
                x.to_vec(),
                y.to_vec(),
            )
        }
        alg::ES384 => {
            let secret = p384::ecdsa::SigningKey::random(&mut OsRng);
            let point = secret.verifying_key().to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                return Err(CoseError::invalid_key(OP, "degenerate public point"));
            };
            (
                curve::P_384,
                secret.to_bytes().to_vec(),
                x.to_vec(),
                y.to_vec(),
            )
        }
        _ => return Err(CoseError::unsupported(OP, key_type::EC2, algorithm)),
    };
    Ok(Key::new(key_type::EC2)
        .with_param(crate::iana::key_param::ALG, algorithm)
        .with_param(ec2::CRV, crv)
        .with_param(ec2::X, Value::Bytes(x))
        .with_param(ec2::Y, Value::Bytes(y))
        .with_param(ec2::D, Value::Bytes(d)))
}

/// Creates an ECDSA [`Signer`] from an EC2 key carrying the private
/// scalar `d`. Registered in the default [`Registry`](crate::key::Registry)
/// for `(EC2, ES256)` and `(EC2, ES384)`.
///
/// # Errors
///
/// Fails if the key is not a fit EC2 signing key.
pub fn new_signer(key: &Key) -> Result<Box<dyn Signer>, CoseError> {
    const OP: &str = "ecdsa::new_signer";
    let parsed = ParsedKey::from_key(OP, key)?;
    if !key.op_allowed(key_op::SIGN) {
        return Err(CoseError::invalid_key(OP, "key does not permit sign"));
    }
    let d = parsed
        .d
        .as_deref()
        .ok_or_else(|| CoseError::invalid_key(OP, "missing private component d"))?;
    let inner = match parsed.alg {
        alg::ES256 => p256::ecdsa::SigningKey::from_slice(d)
            .map(SigningInner::P256)
            .map_err(|e| CoseError::invalid_key(OP, e.to_string()))?,
        _ => p384::ecdsa::SigningKey::from_slice(d)
            .map(SigningInner::P384)
            .map_err(|e| CoseError::invalid_key(OP, e.to_string()))?,
    };
    Ok(Box::new(EcdsaSigner {
        key: key.clone(),
        inner,
    }))
}

/// Creates an ECDSA [`Verifier`] from an EC2 key carrying either the
/// public coordinates `x`/`y` or the private scalar `d` (from which the
/// public key is reconstructed). Registered alongside [`new_signer`].
///
/// # Errors
///
/// Fails if the key is not a fit EC2 verification key.
pub fn new_verifier(key: &Key) -> Result<Box<dyn Verifier>, CoseError> {
    const OP: &str = "ecdsa::new_verifier";
    let parsed = ParsedKey::from_key(OP, key)?;
    if !key.op_allowed(key_op::VERIFY) {
        return Err(CoseError::invalid_key(OP, "key does not permit verify"));
    }
    let inner = match parsed.alg {
        alg::ES256 => VerifyingInner::P256(parsed.verifying_key_p256(OP)?),
        _ => VerifyingInner::P384(parsed.verifying_key_p384(OP)?),
    };
    Ok(Box::new(EcdsaVerifier {
        key: key.to_public_key()?,
        inner,
    }))
}

struct ParsedKey {
    alg: i64,
    d: Option<Vec<u8>>,
    x: Option<Vec<u8>>,
    y: Option<Vec<u8>>,
}

impl ParsedKey {
    fn from_key(op: &'static str, key: &Key) -> Result<ParsedKey, CoseError> {
        if key.kty() != key_type::EC2 {
            return Err(CoseError::invalid_key(op, "key type is not EC2"));
        }
        let (algorithm, expected_crv, coordinate_len) = match key.alg() {
            alg::ES256 => (alg::ES256, curve::P_256, 32),
            alg::ES384 => (alg::ES384, curve::P_384, 48),
            other => return Err(CoseError::unsupported(op, key_type::EC2, other)),
        };
        let crv = key.params().get_i64(ec2::CRV)?;
        if crv != expected_crv {
            return Err(CoseError::invalid_key(
                op,
                format!("curve {crv} is incompatible with algorithm {algorithm}"),
            ));
        }

        let param = |label: i64| -> Result<Option<Vec<u8>>, CoseError> {
            let bytes = key.params().get_bytes(label)?;
            if bytes.is_empty() {
                return Ok(None);
            }
            if bytes.len() != coordinate_len {
                return Err(CoseError::invalid_key(
                    op,
                    format!("parameter {label} must be {coordinate_len} bytes"),
                ));
            }
            Ok(Some(bytes))
        };
        let parsed = ParsedKey {
            alg: algorithm,
            d: param(ec2::D)?,
            x: param(ec2::X)?,
            y: param(ec2::Y)?,
        };
        if parsed.d.is_none() && (parsed.x.is_none() || parsed.y.is_none()) {
            return Err(CoseError::invalid_key(
                op,
                "key carries neither the private scalar d nor the public point x/y",
            ));
        }
        Ok(parsed)
    }

    fn verifying_key_p256(
        &self,
        op: &'static str,
    ) -> Result<p256::ecdsa::VerifyingKey, CoseError> {
        if let (Some(x), Some(y)) = (&self.x, &self.y) {
            let point = p256::EncodedPoint::from_affine_coordinates(
                p256::FieldBytes::from_slice(x),
                p256::FieldBytes::from_slice(y),
                false,
            );
            p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map_err(|e| CoseError::invalid_key(op, e.to_string()))
        } else {
            // Only d is present; reconstruct the public key from it.
            let d = self.d.as_deref().unwrap_or_default();
            p256::ecdsa::SigningKey::from_slice(d)
                .map(|secret| *secret.verifying_key())
                .map_err(|e| CoseError::invalid_key(op, e.to_string()))
        }
    }

    fn verifying_key_p384(
        &self,
        op: &'static str,
    ) -> Result<p384::ecdsa::VerifyingKey, CoseError> {
        if let (Some(x), Some(y)) = (&self.x, &self.y) {
            let point = p384::EncodedPoint::from_affine_coordinates(
                p384::FieldBytes::from_slice(x),
                p384::FieldBytes::from_slice(y),
                false,
            );
            p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map_err(|e| CoseError::invalid_key(op, e.to_string()))
        } else {
            let d = self.d.as_deref().unwrap_or_default();
            p384::ecdsa::SigningKey::from_slice(d)
                .map(|secret| *secret.verifying_key())
                .map_err(|e| CoseError::invalid_key(op, e.to_string()))
        }
    }
}

#[derive(Debug)]
enum SigningInner {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
}

#[derive(Debug)]
enum VerifyingInner {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

#[derive(Debug)]
struct EcdsaSigner {
    key: Key,
    inner: SigningInner,
}

impl Signer for EcdsaSigner {
    fn key(&self) -> &Key {
        &self.key
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CoseError> {
        // Raw fixed-width r || s, as COSE requires (RFC 9053, Section 2.1).
        let signature = match &self.inner {
            SigningInner::P256(secret) => {
                let signature: p256::ecdsa::Signature = secret.sign(data);
                signature.to_vec()
            }
            SigningInner::P384(secret) => {
                let signature: p384::ecdsa::Signature = secret.sign(data);
                signature.to_vec()
            }
        };
        Ok(signature)
    }
}

#[derive(Debug)]
struct EcdsaVerifier {
    key: Key,
    inner: VerifyingInner,
}

impl Verifier for EcdsaVerifier {
    fn key(&self) -> &Key {
        &self.key
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), CoseError> {
        const OP: &str = "ecdsa::verify";
        match &self.inner {
            VerifyingInner::P256(public) => p256::ecdsa::Signature::from_slice(signature)
                .and_then(|sig| public.verify(data, &sig)),
            VerifyingInner::P384(public) => p384::ecdsa::Signature::from_slice(signature)
                .and_then(|sig| public.verify(data, &sig)),
        }
        .map_err(|_| CoseError::verify_failed(OP))
    }
}
