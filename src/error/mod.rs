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

//! Contains error types used across this crate.

use core::fmt::{Display, Formatter};

use ciborium::Value;
use strum_macros::IntoStaticStr;

/// Error type returned by every fallible operation of this crate.
///
/// Carries the name of the originating operation in [`op`](CoseError::op)
/// so that errors bubbling up through nested message structures remain
/// attributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseError {
    /// Name of the operation that produced this error, e.g. `"sign1::verify"`.
    pub op: &'static str,
    /// What went wrong.
    pub kind: ErrorKind,
}

/// The different failure classes of [`CoseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input bytes could not be parsed as CBOR, or the decoded structure has
    /// the wrong shape (including a value of an unexpected type inside an
    /// integer-keyed map).
    InvalidCbor(String),
    /// A key is missing a required parameter, a parameter has the wrong
    /// type, or a private/public component needed for the requested role is
    /// absent.
    InvalidKey(String),
    /// The algorithm in the protected header disagrees with the algorithm
    /// fixed by the key.
    AlgMismatch {
        /// Algorithm identifier carried by the key.
        expected: i64,
        /// Algorithm identifier found in the protected header.
        found: i64,
    },
    /// No capability factory is registered for this `(kty, alg)` pair.
    Unsupported {
        /// Key type of the failed lookup.
        kty: i64,
        /// Algorithm identifier of the failed lookup.
        alg: i64,
    },
    /// A cryptographic check rejected the input.
    VerifyFailed {
        /// For multi-party messages, the index of the first failing slot.
        slot: Option<usize>,
    },
    /// A CWT claim predicate failed.
    ClaimsInvalid(ClaimsError),
    /// The API was used out of order, e.g. a message was emitted before its
    /// authenticator was computed.
    Precondition(&'static str),
}

/// Subkinds of [`ErrorKind::ClaimsInvalid`].
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum ClaimsError {
    /// The `iss` claim does not equal the expected issuer.
    IssuerMismatch,
    /// The `aud` claim does not equal the expected audience.
    AudienceMismatch,
    /// The `sub` claim does not equal the expected subject.
    SubjectMismatch,
    /// The token's expiration time has passed.
    Expired,
    /// The token's not-before time has not been reached yet.
    NotYetValid,
    /// The token claims to have been issued in the future.
    IssuedInFuture,
    /// The token carries `exp <= nbf` and can never be valid.
    InvalidLifetime,
}

impl CoseError {
    /// Creates an [`ErrorKind::InvalidCbor`] error.
    #[must_use]
    pub fn invalid_cbor<D: Into<String>>(op: &'static str, detail: D) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::InvalidCbor(detail.into()),
        }
    }

    /// Creates an [`ErrorKind::InvalidKey`] error.
    #[must_use]
    pub fn invalid_key<D: Into<String>>(op: &'static str, detail: D) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::InvalidKey(detail.into()),
        }
    }

    /// Creates an [`ErrorKind::AlgMismatch`] error.
    #[must_use]
    pub fn alg_mismatch(op: &'static str, expected: i64, found: i64) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::AlgMismatch { expected, found },
        }
    }

    /// Creates an [`ErrorKind::Unsupported`] error.
    #[must_use]
    pub fn unsupported(op: &'static str, kty: i64, alg: i64) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::Unsupported { kty, alg },
        }
    }

    /// Creates an [`ErrorKind::VerifyFailed`] error without a slot index.
    #[must_use]
    pub fn verify_failed(op: &'static str) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::VerifyFailed { slot: None },
        }
    }

    /// Creates an [`ErrorKind::VerifyFailed`] error for the multi-party
    /// signature slot at index `slot`.
    #[must_use]
    pub fn verify_failed_slot(op: &'static str, slot: usize) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::VerifyFailed { slot: Some(slot) },
        }
    }

    /// Creates an [`ErrorKind::ClaimsInvalid`] error.
    #[must_use]
    pub fn claims(op: &'static str, claims: ClaimsError) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::ClaimsInvalid(claims),
        }
    }

    /// Creates an [`ErrorKind::Precondition`] error.
    #[must_use]
    pub fn precondition(op: &'static str, detail: &'static str) -> CoseError {
        CoseError {
            op,
            kind: ErrorKind::Precondition(detail),
        }
    }

    /// Attaches `slot` to a [`ErrorKind::VerifyFailed`] error that does not
    /// carry a slot index yet; other kinds pass through unchanged.
    #[must_use]
    pub(crate) fn with_slot(mut self, slot: usize) -> CoseError {
        if let ErrorKind::VerifyFailed { slot: s @ None } = &mut self.kind {
            *s = Some(slot);
        }
        self
    }
}

/// Returns a human-readable name for the variant of `value`, for use in
/// type-mismatch diagnostics.
pub(crate) fn variant_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "bytes",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(_, _) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}

impl Display for CoseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.op, self.kind)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::InvalidCbor(detail) => write!(f, "invalid CBOR: {detail}"),
            ErrorKind::InvalidKey(detail) => write!(f, "invalid key: {detail}"),
            ErrorKind::AlgMismatch { expected, found } => {
                write!(f, "alg mismatch, expected {expected}, got {found}")
            }
            ErrorKind::Unsupported { kty, alg } => {
                write!(f, "no factory registered for kty {kty} alg {alg}")
            }
            ErrorKind::VerifyFailed { slot: Some(slot) } => {
                write!(f, "verification failed for slot {slot}")
            }
            ErrorKind::VerifyFailed { slot: None } => write!(f, "verification failed"),
            ErrorKind::ClaimsInvalid(claims) => write!(f, "invalid claims: {claims}"),
            ErrorKind::Precondition(detail) => write!(f, "{detail}"),
        }
    }
}

impl Display for ClaimsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{name}")
    }
}

impl std::error::Error for CoseError {}

impl std::error::Error for ClaimsError {}
