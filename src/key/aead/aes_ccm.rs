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

//! AES-CCM dispatch for the eight COSE CCM parameterisations.
//!
//! The identifier encodes `<nonce>_<tag>_<key>`: 16/64 means a 13-byte
//! nonce (2-byte length field), 64/128 a 7-byte nonce, and the tag is 64
//! or 128 bits (RFC 9053 §4.2).

use aes::{Aes128, Aes256};
use ccm::Ccm;
use typenum::{U13, U16, U7, U8};

use crate::error::CoseError;
use crate::iana::{alg, key_type};

pub(super) fn apply(
    op: &'static str,
    algorithm: i64,
    k: &[u8],
    data: &[u8],
    nonce: &[u8],
    aad: &[u8],
    seal: bool,
) -> Result<Vec<u8>, CoseError> {
    match algorithm {
        alg::AES_CCM_16_64_128 => {
            super::apply_with::<Ccm<Aes128, U8, U13>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_16_64_256 => {
            super::apply_with::<Ccm<Aes256, U8, U13>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_64_64_128 => {
            super::apply_with::<Ccm<Aes128, U8, U7>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_64_64_256 => {
            super::apply_with::<Ccm<Aes256, U8, U7>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_16_128_128 => {
            super::apply_with::<Ccm<Aes128, U16, U13>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_16_128_256 => {
            super::apply_with::<Ccm<Aes256, U16, U13>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_64_128_128 => {
            super::apply_with::<Ccm<Aes128, U16, U7>>(op, k, data, nonce, aad, seal)
        }
        alg::AES_CCM_64_128_256 => {
            super::apply_with::<Ccm<Aes256, U16, U7>>(op, k, data, nonce, aad, seal)
        }
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}
