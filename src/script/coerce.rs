//! Conversions from script-supplied values to the scalar types the wire
//! model needs.
//!
//! The `as_*` helpers are checked and report a mismatch as `None`. The
//! `prop_to_*` helpers read a key from a mapping and fall back to the zero
//! value of the target type when the key is missing or has the wrong shape.

use super::value::{FieldMap, FieldValue};

pub fn as_str(value: &FieldValue) -> Option<&str> {
    match value {
        FieldValue::Str(s) => Some(s),
        _ => None,
    }
}

pub fn as_bool(value: &FieldValue) -> Option<bool> {
    match value {
        FieldValue::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Integers and integral finite floats count as numeric.
fn as_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            if *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some(*f as i64)
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn as_u16(value: &FieldValue) -> Option<u16> {
    as_integer(value).and_then(|i| u16::try_from(i).ok())
}

pub fn as_u32(value: &FieldValue) -> Option<u32> {
    as_integer(value).and_then(|i| u32::try_from(i).ok())
}

pub fn prop_to_string(map: &FieldMap, key: &str) -> String {
    map.get(key)
        .and_then(as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

pub fn prop_to_u16(map: &FieldMap, key: &str) -> u16 {
    map.get(key).and_then(as_u16).unwrap_or(0)
}

pub fn prop_to_u32(map: &FieldMap, key: &str) -> u32 {
    map.get(key).and_then(as_u32).unwrap_or(0)
}

pub fn prop_to_bool(map: &FieldMap, key: &str) -> bool {
    map.get(key).and_then(as_bool).unwrap_or(false)
}
