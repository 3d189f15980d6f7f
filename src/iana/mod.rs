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

//! Identifiers assigned in the IANA COSE and CWT registries, plus the
//! Common Access Token (CAT) extension claims.
//!
//! All identifiers are plain `i64` constants so that they can be used
//! directly as [`IntMap`](crate::common::IntMap) labels and values.

/// CBOR tag numbers relevant to COSE and CWT.
pub mod tag {
    /// COSE_Encrypt0, a single-recipient encrypted message.
    pub const COSE_ENCRYPT0: u64 = 16;
    /// COSE_Mac0, a MACed message with an implicit recipient.
    pub const COSE_MAC0: u64 = 17;
    /// COSE_Sign1, a message with a single signature.
    pub const COSE_SIGN1: u64 = 18;
    /// CBOR Web Token (RFC 8392).
    pub const CWT: u64 = 61;
    /// COSE_Encrypt, a multi-recipient encrypted message.
    pub const COSE_ENCRYPT: u64 = 96;
    /// COSE_Mac, a MACed message with explicit recipients.
    pub const COSE_MAC: u64 = 97;
    /// COSE_Sign, a message with one or more signatures.
    pub const COSE_SIGN: u64 = 98;
}

/// COSE key types (IANA "COSE Key Types" registry).
pub mod key_type {
    pub const RESERVED: i64 = 0;
    /// Octet key pair (Ed25519/Ed448/X25519/X448).
    pub const OKP: i64 = 1;
    /// Elliptic curve key with x/y coordinates.
    pub const EC2: i64 = 2;
    /// Symmetric key.
    pub const SYMMETRIC: i64 = 4;
}

/// Common COSE key parameters (IANA "COSE Key Common Parameters" registry).
pub mod key_param {
    /// Key type; mandatory on every key.
    pub const KTY: i64 = 1;
    /// Key identifier, a byte string.
    pub const KID: i64 = 2;
    /// Algorithm the key is restricted to.
    pub const ALG: i64 = 3;
    /// Permitted operations, an array of [`key_op`](super::key_op) values.
    pub const KEY_OPS: i64 = 4;
    /// Base IV to be XORed with partial IVs.
    pub const BASE_IV: i64 = 5;
}

/// EC2 key type parameters.
pub mod ec2 {
    pub const CRV: i64 = -1;
    pub const X: i64 = -2;
    pub const Y: i64 = -3;
    /// Private key scalar.
    pub const D: i64 = -4;
}

/// OKP key type parameters.
pub mod okp {
    pub const CRV: i64 = -1;
    pub const X: i64 = -2;
    /// Private key seed.
    pub const D: i64 = -4;
}

/// Symmetric key type parameters.
pub mod symmetric {
    /// The key value.
    pub const K: i64 = -1;
}

/// Values of the `key_ops` key parameter.
pub mod key_op {
    pub const SIGN: i64 = 1;
    pub const VERIFY: i64 = 2;
    pub const ENCRYPT: i64 = 3;
    pub const DECRYPT: i64 = 4;
    pub const WRAP_KEY: i64 = 5;
    pub const UNWRAP_KEY: i64 = 6;
    pub const DERIVE_KEY: i64 = 7;
    pub const DERIVE_BITS: i64 = 8;
    pub const MAC_CREATE: i64 = 9;
    pub const MAC_VERIFY: i64 = 10;
}

/// Elliptic curves (IANA "COSE Elliptic Curves" registry).
pub mod curve {
    pub const P_256: i64 = 1;
    pub const P_384: i64 = 2;
    pub const P_521: i64 = 3;
    pub const X25519: i64 = 4;
    pub const X448: i64 = 5;
    pub const ED25519: i64 = 6;
    pub const ED448: i64 = 7;
}

/// COSE header parameters (IANA "COSE Header Parameters" registry).
pub mod header {
    pub const ALG: i64 = 1;
    pub const CRIT: i64 = 2;
    pub const CONTENT_TYPE: i64 = 3;
    pub const KID: i64 = 4;
    pub const IV: i64 = 5;
    pub const PARTIAL_IV: i64 = 6;
    pub const COUNTER_SIGNATURE: i64 = 7;
    pub const X5BAG: i64 = 32;
    pub const X5CHAIN: i64 = 33;
    pub const X5T: i64 = 34;
    pub const X5U: i64 = 35;
    pub const CUPH_NONCE: i64 = 46;
}

/// COSE algorithm identifiers (IANA "COSE Algorithms" registry).
pub mod alg {
    pub const RESERVED: i64 = 0;
    /// Direct use of the shared key as the content encryption key.
    pub const DIRECT: i64 = -6;
    pub const ES256: i64 = -7;
    pub const EDDSA: i64 = -8;
    pub const ES384: i64 = -35;
    pub const ES512: i64 = -36;
    /// HMAC with SHA-256, tag truncated to 64 bits.
    pub const HMAC_256_64: i64 = 4;
    pub const HMAC_256_256: i64 = 5;
    pub const HMAC_384_384: i64 = 6;
    pub const HMAC_512_512: i64 = 7;
    pub const AES_CCM_16_64_128: i64 = 10;
    pub const AES_CCM_16_64_256: i64 = 11;
    pub const AES_CCM_64_64_128: i64 = 12;
    pub const AES_CCM_64_64_256: i64 = 13;
    pub const AES_CCM_16_128_128: i64 = 30;
    pub const AES_CCM_16_128_256: i64 = 31;
    pub const AES_CCM_64_128_128: i64 = 32;
    pub const AES_CCM_64_128_256: i64 = 33;
    pub const A128GCM: i64 = 1;
    pub const A192GCM: i64 = 2;
    pub const A256GCM: i64 = 3;
    pub const CHACHA20_POLY1305: i64 = 24;
}

/// CWT claim numbers (IANA "CWT Claims" registry) and the CAT extension
/// claims.
pub mod claim {
    pub const ISS: i64 = 1;
    pub const SUB: i64 = 2;
    pub const AUD: i64 = 3;
    pub const EXP: i64 = 4;
    pub const NBF: i64 = 5;
    pub const IAT: i64 = 6;
    pub const CTI: i64 = 7;
    /// Proof-of-possession confirmation (RFC 8747).
    pub const CNF: i64 = 8;

    /// Composite claim: at least one nested claim set must match.
    pub const OR: i64 = 41;
    /// Composite claim: no nested claim set may match.
    pub const NOR: i64 = 42;
    /// Composite claim: all nested claim sets must match.
    pub const AND: i64 = 43;
    /// Nested encrypted claim set.
    pub const ENC: i64 = 44;
    /// Claims that must be understood by the consumer.
    pub const CRIT: i64 = 45;

    /// Token replay handling directive.
    pub const CAT_REPLAY: i64 = 267;
    /// Acceptable client network prefixes.
    pub const CATNIP: i64 = 269;
    /// URI match expressions.
    pub const CATU: i64 = 270;
    /// Acceptable request methods.
    pub const CATM: i64 = 271;
    /// Acceptable ALPN identifiers.
    pub const CATALPN: i64 = 272;
    /// Acceptable ISO 3166 country/region codes.
    pub const CAT_GEO_ISO3166: i64 = 273;
    /// Pinned TLS public key.
    pub const CAT_TPK: i64 = 274;
    /// DPoP settings.
    pub const CAT_DPOP_W: i64 = 275;
    /// Conditional claim evaluation.
    pub const CAT_IF: i64 = 277;
    /// Token renewal directives.
    pub const CAT_R: i64 = 278;
    /// CAT version.
    pub const CAT_V: i64 = 279;
    /// Header match expressions.
    pub const CATH: i64 = 280;
    /// Acceptable geographic coordinates.
    pub const CAT_GEO_COORD: i64 = 281;
    /// Probability of rejection.
    pub const CAT_POR: i64 = 283;
    /// Interface data for [`CAT_IF`] expressions.
    pub const CAT_IF_DATA: i64 = 65536;
}

/// Match types used by the CAT match-expression claims (`catu`, `cath`).
pub mod cat_match {
    pub const EXACT: i64 = 0;
    pub const PREFIX: i64 = 1;
    pub const SUFFIX: i64 = 2;
    pub const CONTAINS: i64 = 3;
    pub const REGEX: i64 = 4;
    pub const SHA256: i64 = -1;
    pub const SHA512: i64 = -2;
}
