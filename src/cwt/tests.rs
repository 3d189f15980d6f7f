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
use ciborium::Value;

use super::{Claims, ClaimsMap};
use crate::iana::claim;

#[test]
fn named_claims_encode_deterministically() {
    let claims = Claims::builder()
        .issuer("ldc:ca")
        .subject("ldc:chain")
        .audience("ldc:txpool")
        .expiration(1_670_123_579i64)
        .cwt_id(vec![1, 2, 3, 4])
        .build()
        .unwrap();
    assert_eq!(
        hex::encode(claims.to_vec().unwrap()),
        "a501666c64633a636102696c64633a636861696e036a6c64633a7478706f6f6c\
         041a638c103b074401020304"
    );
}

#[test]
fn rfc8392_example_claim_set() {
    // RFC 8392, Appendix A.1.
    let claims = Claims::builder()
        .issuer("coap://as.example.com")
        .subject("erikw")
        .audience("coap://light.example.com")
        .expiration(1_444_064_944i64)
        .not_before(1_443_944_944i64)
        .issued_at(1_443_944_944i64)
        .cwt_id(vec![0x0b, 0x71])
        .build()
        .unwrap();
    let data = claims.to_vec().unwrap();
    assert_eq!(
        hex::encode(&data),
        "a70175636f61703a2f2f61732e6578616d706c652e636f6d02656572696b7703\
         7818636f61703a2f2f6c696768742e6578616d706c652e636f6d041a5612aeb0\
         051a560fe5b0061a560fe5b007420b71"
    );
    assert_eq!(Claims::from_slice(&data).unwrap(), claims);
}

#[test]
fn map_and_named_forms_are_interchangeable() {
    let named = Claims::builder()
        .issuer("ldc:ca")
        .expiration(1_670_123_579i64)
        .build()
        .unwrap();
    let map = named.to_map();
    assert_eq!(map.issuer().unwrap(), "ldc:ca");
    assert_eq!(map.expiration().unwrap(), 1_670_123_579);
    // Zero-value contract for absent claims.
    assert_eq!(map.subject().unwrap(), "");
    assert_eq!(map.not_before().unwrap(), 0);
    assert!(map.cwt_id().unwrap().is_empty());

    assert_eq!(Claims::from_map(&map).unwrap(), named);
}

#[test]
fn extension_claims_survive_the_map_form() {
    let mut map = ClaimsMap::new();
    map.set(claim::ISS, "ldc:ca");
    map.set(claim::CATU, Value::Map(vec![]));
    map.set(claim::CAT_V, 1);

    let data = map.to_vec().unwrap();
    let decoded = ClaimsMap::from_slice(&data).unwrap();
    assert_eq!(decoded, map);
    // Extension claims do not disturb the named projection.
    let named = Claims::from_map(&decoded).unwrap();
    assert_eq!(named.issuer.as_deref(), Some("ldc:ca"));
}

#[test]
fn malformed_registered_claims_are_rejected() {
    let mut map = ClaimsMap::new();
    map.set(claim::ISS, 42);
    assert!(Claims::from_map(&map).is_err());

    let mut map = ClaimsMap::new();
    map.set(claim::CTI, "not bytes");
    assert!(Claims::from_map(&map).is_err());
}
