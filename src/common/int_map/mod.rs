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

//! An integer-keyed CBOR map with deterministic encoding.
//!
//! [`IntMap`] is the semantic container underlying COSE keys, COSE header
//! buckets and the map form of CWT claim sets: a mapping from small signed
//! integer parameter numbers to heterogeneous [`Value`]s.
//!
//! Encoding emits entries in the canonical CBOR order for integer keys
//! (RFC 8949 §4.2.1): non-negative keys ascending, then negative keys by
//! ascending absolute value. Two logically equal maps therefore always
//! encode to identical bytes.

use std::collections::btree_map;
use std::collections::BTreeMap;

use ciborium::Value;

use crate::common::cbor::{marshal_cbor, unmarshal_cbor};
use crate::error::{variant_name, CoseError};

#[cfg(test)]
mod tests;

/// A mapping from integer parameter numbers to CBOR values.
///
/// Typed accessors return the zero value of the requested shape when the
/// parameter is absent, and an error when it is present with an
/// incompatible value. This mirrors the lookup semantics of the COSE
/// parameter registries, where absence and the zero value are
/// interchangeable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntMap {
    entries: BTreeMap<i64, Value>,
}

impl IntMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> IntMap {
        IntMap::default()
    }

    /// Returns true if the parameter `label` is present.
    #[must_use]
    pub fn has(&self, label: i64) -> bool {
        self.entries.contains_key(&label)
    }

    /// Returns the raw value of the parameter `label`.
    #[must_use]
    pub fn get(&self, label: i64) -> Option<&Value> {
        self.entries.get(&label)
    }

    /// Returns a mutable reference to the raw value of the parameter
    /// `label`.
    pub fn get_mut(&mut self, label: i64) -> Option<&mut Value> {
        self.entries.get_mut(&label)
    }

    /// Sets the parameter `label` to `value`, replacing any previous value.
    pub fn set<V: Into<Value>>(&mut self, label: i64, value: V) {
        self.entries.insert(label, value.into());
    }

    /// Sets the parameter `label` to `value` and returns the map, for
    /// chained construction.
    #[must_use]
    pub fn with<V: Into<Value>>(mut self, label: i64, value: V) -> IntMap {
        self.set(label, value);
        self
    }

    /// Removes the parameter `label`, returning its previous value.
    pub fn remove(&mut self, label: i64) -> Option<Value> {
        self.entries.remove(&label)
    }

    /// Returns the number of parameters in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in ascending numeric label order.
    pub fn iter(&self) -> btree_map::Iter<'_, i64, Value> {
        self.entries.iter()
    }

    /// Iterates over the entries in the canonical CBOR key order:
    /// non-negative labels ascending, then negative labels by ascending
    /// absolute value.
    pub(crate) fn canonical_iter(&self) -> impl Iterator<Item = (&i64, &Value)> {
        self.entries.range(0..).chain(self.entries.range(..0).rev())
    }

    /// Returns the value of the parameter `label` as an `i32`.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not an integer or does not fit `i32`.
    pub fn get_i32(&self, label: i64) -> Result<i32, CoseError> {
        match self.entries.get(&label) {
            None => Ok(0),
            Some(Value::Integer(i)) => i32::try_from(*i)
                .map_err(|_| Self::overflow("int_map::get_i32", label, "i32")),
            Some(v) => Err(Self::mismatch("int_map::get_i32", label, "integer", v)),
        }
    }

    /// Returns the value of the parameter `label` as an `i64`.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not an integer or does not fit `i64`.
    pub fn get_i64(&self, label: i64) -> Result<i64, CoseError> {
        match self.entries.get(&label) {
            None => Ok(0),
            Some(Value::Integer(i)) => i64::try_from(*i)
                .map_err(|_| Self::overflow("int_map::get_i64", label, "i64")),
            Some(v) => Err(Self::mismatch("int_map::get_i64", label, "integer", v)),
        }
    }

    /// Returns the value of the parameter `label` as a `u64`.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not an integer, is negative, or does
    /// not fit `u64`.
    pub fn get_u64(&self, label: i64) -> Result<u64, CoseError> {
        match self.entries.get(&label) {
            None => Ok(0),
            Some(Value::Integer(i)) => u64::try_from(*i)
                .map_err(|_| Self::overflow("int_map::get_u64", label, "u64")),
            Some(v) => Err(Self::mismatch("int_map::get_u64", label, "integer", v)),
        }
    }

    /// Returns the value of the parameter `label` as a byte string.
    ///
    /// An absent parameter yields an empty vector.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not a byte string.
    pub fn get_bytes(&self, label: i64) -> Result<Vec<u8>, CoseError> {
        match self.entries.get(&label) {
            None => Ok(Vec::new()),
            Some(Value::Bytes(b)) => Ok(b.clone()),
            Some(v) => Err(Self::mismatch("int_map::get_bytes", label, "bytes", v)),
        }
    }

    /// Returns the value of the parameter `label` as a text string.
    ///
    /// An absent parameter yields an empty string.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not a text string.
    pub fn get_string(&self, label: i64) -> Result<String, CoseError> {
        match self.entries.get(&label) {
            None => Ok(String::new()),
            Some(Value::Text(s)) => Ok(s.clone()),
            Some(v) => Err(Self::mismatch("int_map::get_string", label, "text", v)),
        }
    }

    /// Returns the value of the parameter `label` as a bool.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not a bool.
    pub fn get_bool(&self, label: i64) -> Result<bool, CoseError> {
        match self.entries.get(&label) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(v) => Err(Self::mismatch("int_map::get_bool", label, "bool", v)),
        }
    }

    /// Returns the value of the parameter `label` as an array.
    ///
    /// An absent parameter yields an empty array.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not an array.
    pub fn get_array(&self, label: i64) -> Result<Vec<Value>, CoseError> {
        match self.entries.get(&label) {
            None => Ok(Vec::new()),
            Some(Value::Array(a)) => Ok(a.clone()),
            Some(v) => Err(Self::mismatch("int_map::get_array", label, "array", v)),
        }
    }

    /// Converts the map into a [`Value::Map`] with entries in canonical
    /// order. Nested [`IntMap`]s inserted through [`Value::from`] are
    /// already canonical; arbitrary user-supplied maps are emitted as-is.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.canonical_iter()
                .map(|(label, value)| (Value::Integer((*label).into()), value.clone()))
                .collect(),
        )
    }

    /// Builds a map from a decoded [`Value`].
    ///
    /// # Errors
    ///
    /// Fails if `value` is not a map, a key is not an integer fitting
    /// `i64`, or a key occurs twice.
    pub fn from_value(op: &'static str, value: Value) -> Result<IntMap, CoseError> {
        let Value::Map(raw) = value else {
            return Err(CoseError::invalid_cbor(
                op,
                format!("expected map, found {}", variant_name(&value)),
            ));
        };
        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            let label = key
                .as_integer()
                .and_then(|i| i64::try_from(i).ok())
                .ok_or_else(|| {
                    CoseError::invalid_cbor(op, "map key must be an integer fitting i64")
                })?;
            if entries.insert(label, value).is_some() {
                return Err(CoseError::invalid_cbor(
                    op,
                    format!("duplicate map key {label}"),
                ));
            }
        }
        Ok(IntMap { entries })
    }

    /// Encodes the map as a deterministic CBOR byte string.
    ///
    /// # Errors
    ///
    /// Fails if a contained value cannot be represented as CBOR.
    pub fn to_vec(&self) -> Result<Vec<u8>, CoseError> {
        marshal_cbor(&self.to_value())
    }

    /// Decodes a map from CBOR bytes.
    ///
    /// # Errors
    ///
    /// Fails on malformed CBOR, non-integer keys, duplicate keys or
    /// trailing input.
    pub fn from_slice(data: &[u8]) -> Result<IntMap, CoseError> {
        IntMap::from_value("int_map::from_slice", unmarshal_cbor(data)?)
    }

    fn mismatch(op: &'static str, label: i64, expected: &str, found: &Value) -> CoseError {
        CoseError::invalid_cbor(
            op,
            format!(
                "parameter {label}: expected {expected}, found {}",
                variant_name(found)
            ),
        )
    }

    fn overflow(op: &'static str, label: i64, target: &str) -> CoseError {
        CoseError::invalid_cbor(op, format!("parameter {label}: value overflows {target}"))
    }
}

impl From<IntMap> for Value {
    fn from(map: IntMap) -> Value {
        map.to_value()
    }
}

impl FromIterator<(i64, Value)> for IntMap {
    fn from_iter<I: IntoIterator<Item = (i64, Value)>>(iter: I) -> IntMap {
        IntMap {
            entries: iter.into_iter().collect(),
        }
    }
}
