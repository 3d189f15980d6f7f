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

//! ChaCha20-Poly1305 dispatch.

use chacha20poly1305::ChaCha20Poly1305;

use crate::error::CoseError;

pub(super) fn apply(
    op: &'static str,
    k: &[u8],
    data: &[u8],
    nonce: &[u8],
    aad: &[u8],
    seal: bool,
) -> Result<Vec<u8>, CoseError> {
    super::apply_with::<ChaCha20Poly1305>(op, k, data, nonce, aad, seal)
}
