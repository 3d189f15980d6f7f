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

//! An implementation of the COSE message formats of RFC 9052/9053 and the
//! CBOR Web Token claim model of RFC 8392.
//!
//! The crate provides the six COSE message shapes
//! ([`Sign1Message`](cose::Sign1Message), [`SignMessage`](cose::SignMessage),
//! [`Mac0Message`](cose::Mac0Message), [`MacMessage`](cose::MacMessage),
//! [`Encrypt0Message`](cose::Encrypt0Message),
//! [`EncryptMessage`](cose::EncryptMessage)) on top of a deterministic
//! CBOR layer ([`common::IntMap`]), a map-typed [`key::Key`] with a
//! process-wide `(kty, alg)` capability registry, and CWT claim sets with
//! a configurable [`cwt::Validator`].
//!
//! Cryptographic primitives are pluggable: the builtin factories (ECDSA,
//! EdDSA, HMAC-SHA2, AES-GCM, AES-CCM, ChaCha20-Poly1305) are selected
//! through cargo features and can be replaced or extended through
//! [`key::Registry`].
//!
//! ```
//! use cose_cwt::cose::mac0::{verify_mac0_message, Mac0Message};
//! use cose_cwt::iana::alg;
//!
//! # fn main() -> Result<(), cose_cwt::CoseError> {
//! let key = cose_cwt::key::hmac::generate_key(alg::HMAC_256_64)?;
//! let macer = key.macer()?;
//!
//! let mut message: Mac0Message<Vec<u8>> = Mac0Message::new(b"hello world".to_vec());
//! let encoded = message.compute_and_encode(&*macer, None)?;
//!
//! let received = verify_mac0_message::<Vec<u8>>(&*macer, &encoded, None)?;
//! assert_eq!(received.payload, b"hello world");
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod cose;
pub mod cwt;
pub mod error;
pub mod iana;
pub mod key;

pub use common::{marshal_cbor, remove_cbor_tag, unmarshal_cbor, IntMap};
pub use cose::{
    Encrypt0Message, EncryptMessage, Headers, Mac0Message, MacMessage, Payload, Recipient,
    Sign1Message, SignMessage,
};
pub use cwt::{Claims, ClaimsMap, ValidationOptions, Validator};
pub use error::{ClaimsError, CoseError, ErrorKind};
pub use key::{Encryptor, Key, KeySet, Macer, Registry, Signer, Verifier};
