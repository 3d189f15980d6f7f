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

//! AES-GCM dispatch (A128GCM, A192GCM, A256GCM).

use aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use typenum::U12;

use crate::error::CoseError;
use crate::iana::{alg, key_type};

type Aes192Gcm = AesGcm<Aes192, U12>;

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
        alg::A128GCM => super::apply_with::<Aes128Gcm>(op, k, data, nonce, aad, seal),
        alg::A192GCM => super::apply_with::<Aes192Gcm>(op, k, data, nonce, aad, seal),
        alg::A256GCM => super::apply_with::<Aes256Gcm>(op, k, data, nonce, aad, seal),
        _ => Err(CoseError::unsupported(op, key_type::SYMMETRIC, algorithm)),
    }
}
