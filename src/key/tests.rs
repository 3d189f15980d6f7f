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

use crate::error::ErrorKind;
use crate::iana::{alg, ec2, key_op, key_param, key_type, symmetric};
use crate::key::{Key, KeySet};

#[test]
fn accessors_have_zero_defaults() {
    let key = Key::new(key_type::EC2);
    assert_eq!(key.kty(), key_type::EC2);
    assert_eq!(key.alg(), alg::RESERVED);
    assert!(key.kid().is_empty());

    let key = key
        .with_param(key_param::ALG, alg::ES256)
        .with_param(key_param::KID, Value::Bytes(b"11".to_vec()));
    assert_eq!(key.alg(), alg::ES256);
    assert_eq!(key.kid(), b"11");
}

#[test]
fn check_requires_known_kty() {
    assert!(Key::default().check("test").is_err());
    assert!(Key::new(99).check("test").is_err());
    assert!(Key::new(key_type::SYMMETRIC).check("test").is_ok());
}

#[test]
fn key_ops_gate_operations() {
    let key = Key::new(key_type::EC2);
    assert!(key.op_allowed(key_op::SIGN));

    let key = key.with_param(
        key_param::KEY_OPS,
        Value::Array(vec![Value::from(key_op::SIGN)]),
    );
    assert!(key.op_allowed(key_op::SIGN));
    assert!(!key.op_allowed(key_op::VERIFY));
}

#[test]
fn public_projection_strips_private_components() {
    let key = Key::new(key_type::EC2)
        .with_param(ec2::X, Value::Bytes(vec![1; 32]))
        .with_param(ec2::Y, Value::Bytes(vec![2; 32]))
        .with_param(ec2::D, Value::Bytes(vec![3; 32]))
        .with_param(
            key_param::KEY_OPS,
            Value::Array(vec![Value::from(key_op::SIGN)]),
        );
    let public = key.to_public_key().unwrap();
    assert!(!public.params().has(ec2::D));
    assert!(public.params().has(ec2::X));
    assert!(public.op_allowed(key_op::VERIFY));
    assert!(!public.op_allowed(key_op::SIGN));
}

#[test]
fn symmetric_keys_have_no_public_projection() {
    let key = Key::new(key_type::SYMMETRIC).with_param(symmetric::K, Value::Bytes(vec![0; 32]));
    assert!(matches!(
        key.to_public_key().unwrap_err().kind,
        ErrorKind::InvalidKey(_)
    ));
}

#[test]
fn cbor_roundtrip() {
    let key = Key::new(key_type::EC2)
        .with_param(key_param::ALG, alg::ES256)
        .with_param(ec2::CRV, crate::iana::curve::P_256)
        .with_param(ec2::X, Value::Bytes(vec![1; 32]));
    let data = key.to_vec().unwrap();
    let decoded = Key::from_slice(&data).unwrap();
    assert_eq!(decoded, key);
    assert_eq!(decoded.to_vec().unwrap(), data);
}

#[test]
fn keyset_lookup_returns_first_match() {
    let a = Key::new(key_type::SYMMETRIC)
        .with_param(key_param::KID, Value::Bytes(b"dup".to_vec()))
        .with_param(symmetric::K, Value::Bytes(vec![1; 32]));
    let b = Key::new(key_type::SYMMETRIC)
        .with_param(key_param::KID, Value::Bytes(b"dup".to_vec()))
        .with_param(symmetric::K, Value::Bytes(vec![2; 32]));
    let set: KeySet = [a.clone(), b].into_iter().collect();

    assert_eq!(set.lookup_by_kid(b"dup"), Some(&a));
    assert_eq!(set.lookup_by_kid(b"missing"), None);
}
