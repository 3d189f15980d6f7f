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

use super::IntMap;

fn sample_map() -> IntMap {
    IntMap::new()
        .with(1, 1)
        .with(2, 2i64)
        .with(3, 3)
        .with(-1, -1)
        .with(-2, -2i64)
        .with(-3, -3)
        .with(0, i64::MAX)
        .with(10, Value::Bytes(vec![1, 2, 3, 4]))
        .with(11, Value::Bytes(vec![1, 2, 3, 4]))
        .with(12, Value::Bytes(vec![1, 2, 3, 4]))
        .with(13, "hello")
        .with(14, Value::Array(vec![Value::from("hello")]))
        .with(15, "hello")
}

#[test]
fn get_integers() {
    let m = sample_map();

    assert_eq!(m.get_i32(1), Ok(1));
    assert_eq!(m.get_i32(-1), Ok(-1));
    // i64::MAX does not fit an i32.
    assert!(m.get_i32(0).is_err());
    // Missing labels yield the zero value.
    assert_eq!(m.get_i32(-10), Ok(0));
    assert!(m.get_i32(10).is_err());

    assert_eq!(m.get_i64(1), Ok(1));
    assert_eq!(m.get_i64(-1), Ok(-1));
    assert_eq!(m.get_i64(0), Ok(i64::MAX));
    assert_eq!(m.get_i64(-10), Ok(0));
    assert!(m.get_i64(10).is_err());

    assert_eq!(m.get_u64(1), Ok(1));
    assert!(m.get_u64(-1).is_err());
    assert_eq!(m.get_u64(0), Ok(i64::MAX as u64));
    assert_eq!(m.get_u64(-10), Ok(0));
    assert!(m.get_u64(10).is_err());
}

#[test]
fn get_bytes_and_strings() {
    let m = sample_map();

    assert!(m.get_bytes(1).is_err());
    assert!(m.get_bytes(-1).is_err());
    assert_eq!(m.get_bytes(-10), Ok(Vec::new()));
    assert_eq!(m.get_bytes(10), Ok(vec![1, 2, 3, 4]));
    assert_eq!(m.get_bytes(11), Ok(vec![1, 2, 3, 4]));
    assert!(m.get_bytes(13).is_err());
    assert!(m.get_bytes(14).is_err());

    assert!(m.get_string(1).is_err());
    assert!(m.get_string(-1).is_err());
    assert_eq!(m.get_string(-10), Ok(String::new()));
    assert_eq!(m.get_string(13), Ok("hello".to_string()));
    assert!(m.get_string(14).is_err());
    assert_eq!(m.get_string(15), Ok("hello".to_string()));

    assert_eq!(m.get_bool(-10), Ok(false));
    assert!(m.get_bool(13).is_err());
    assert_eq!(m.get_array(14).unwrap().len(), 1);
    assert!(m.get_array(13).is_err());
}

#[test]
fn canonical_encoding() {
    let m = sample_map();
    let data = m.to_vec().unwrap();
    // CBOR diagnostic:
    // {0: 9223372036854775807, 1: 1, 2: 2, 3: 3, 10: h'01020304',
    //  11: h'01020304', 12: h'01020304', 13: "hello", 14: ["hello"],
    //  15: "hello", -1: -1, -2: -2, -3: -3}
    assert_eq!(
        hex::encode(&data),
        concat!(
            "ad001b7fffffffffffffff010102020303",
            "0a44010203040b44010203040c4401020304",
            "0d6568656c6c6f0e816568656c6c6f0f6568656c6c6f",
            "202021212222",
        )
    );

    // Decoding and re-encoding is byte-stable.
    let decoded = IntMap::from_slice(&data).unwrap();
    assert_eq!(decoded, m);
    assert_eq!(decoded.to_vec().unwrap(), data);
}

#[test]
fn nested_maps_encode_canonically() {
    let inner = IntMap::new().with(-1, 1).with(2, "x").with(0, false);
    let outer = IntMap::new().with(5, inner);
    // {5: {0: false, 2: "x", -1: 1}}
    assert_eq!(hex::encode(outer.to_vec().unwrap()), "a105a300f40261782001");
}

#[test]
fn rejects_duplicate_and_non_integer_keys() {
    // {1: 0, 1: 0}
    assert!(IntMap::from_slice(&hex::decode("a201000100").unwrap()).is_err());
    // {"a": 0}
    assert!(IntMap::from_slice(&hex::decode("a1616100").unwrap()).is_err());
}

#[test]
fn rejects_trailing_bytes() {
    let data = IntMap::new().with(1, 1).to_vec().unwrap();
    let mut trailing = data.clone();
    trailing.push(0x00);
    assert!(IntMap::from_slice(&trailing).is_err());
    assert!(IntMap::from_slice(&data).is_ok());
}
