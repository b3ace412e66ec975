// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion between erased values and target type descriptors.
//!
//! Same-kind conversion is a lossless clone. Numeric cross-kind conversion
//! follows the wire protocol's lenient policy: values are truncated to the
//! destination width. `NumericMode::Strict` instead rejects any conversion
//! that would lose information.

use crate::types::{TypeInfo, TypeKind};
use crate::value::{Value, ValueError};

/// Numeric conversion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// Truncate to the destination width (wire-compatible default).
    #[default]
    Lenient,
    /// Fail with `NarrowingLoss` when the destination cannot hold the value.
    Strict,
}

impl Value {
    /// Convert this value to the shape described by `target`.
    ///
    /// Returns the converted value and a flag telling whether a conversion
    /// actually happened (`false` means the result is a plain clone).
    pub fn convert_to(
        &self,
        target: &TypeInfo,
        mode: NumericMode,
    ) -> Result<(Value, bool), ValueError> {
        match (self, target.kind()) {
            (Value::Invalid, _) => Err(ValueError::TypeMismatch {
                expected: target.signature().to_string(),
                got: "invalid".to_string(),
            }),
            (_, TypeKind::Dynamic) => match self {
                Value::Dynamic(_) => Ok((self.clone(), false)),
                _ => Ok((Value::Dynamic(Box::new(self.clone())), true)),
            },
            (Value::Dynamic(inner), _) => {
                inner.convert_to(target, mode).map(|(v, _)| (v, true))
            }
            (_, TypeKind::Pointer(inner)) => self.convert_to(inner, mode),
            (Value::Void, TypeKind::Void) => Ok((Value::Void, false)),
            (Value::Bool(_), TypeKind::Bool) => Ok((self.clone(), false)),
            (Value::String(_), TypeKind::String) => Ok((self.clone(), false)),
            (Value::Raw(_), TypeKind::Raw) => Ok((self.clone(), false)),
            (Value::Object(_), TypeKind::Object) => Ok((self.clone(), false)),
            (Value::List(items), TypeKind::List(element)) => {
                let mut converted = false;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let (v, c) = item.convert_to(element, mode)?;
                    converted |= c;
                    out.push(v);
                }
                Ok((Value::List(out), converted))
            }
            (Value::Map(pairs), TypeKind::Map(key, value)) => {
                let mut converted = false;
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let (ck, c1) = k.convert_to(key, mode)?;
                    let (cv, c2) = v.convert_to(value, mode)?;
                    converted |= c1 | c2;
                    out.push((ck, cv));
                }
                Ok((Value::Map(out), converted))
            }
            (Value::Tuple(items), TypeKind::Tuple(members)) => {
                if items.len() != members.len() {
                    return Err(ValueError::Arity {
                        expected: members.len(),
                        got: items.len(),
                    });
                }
                let mut converted = false;
                let mut out = Vec::with_capacity(items.len());
                for (item, member) in items.iter().zip(members.iter()) {
                    let (v, c) = item.convert_to(member, mode)?;
                    converted |= c;
                    out.push(v);
                }
                Ok((Value::Tuple(out), converted))
            }
            _ if self.is_number() && is_numeric_kind(target.kind()) => {
                convert_number(self, target, mode)
            }
            _ => Err(ValueError::Incompatible {
                from: self.signature().to_string(),
                to: target.signature().to_string(),
            }),
        }
    }
}

fn is_numeric_kind(kind: &TypeKind) -> bool {
    matches!(kind, TypeKind::Int { .. } | TypeKind::Float { .. })
}

fn convert_number(
    value: &Value,
    target: &TypeInfo,
    mode: NumericMode,
) -> Result<(Value, bool), ValueError> {
    // Same width and signedness: plain clone.
    if value.signature() == target.signature() {
        return Ok((value.clone(), false));
    }
    if mode == NumericMode::Strict && !is_lossless(value, target.kind()) {
        return Err(ValueError::NarrowingLoss {
            from: value.signature().to_string(),
            to: target.signature().to_string(),
        });
    }
    let converted = match target.kind() {
        TypeKind::Int { bytes, signed } => make_int(as_i128(value), *bytes, *signed),
        TypeKind::Float { bytes: 4 } => Value::Float32(as_f64(value) as f32),
        TypeKind::Float { bytes: _ } => Value::Float64(as_f64(value)),
        _ => unreachable!("caller checked numeric target"),
    };
    Ok((converted, true))
}

fn as_i128(value: &Value) -> i128 {
    match value {
        Value::Int8(v) => *v as i128,
        Value::UInt8(v) => *v as i128,
        Value::Int16(v) => *v as i128,
        Value::UInt16(v) => *v as i128,
        Value::Int32(v) => *v as i128,
        Value::UInt32(v) => *v as i128,
        Value::Int64(v) => *v as i128,
        Value::UInt64(v) => *v as i128,
        Value::Float32(v) => *v as i128,
        Value::Float64(v) => *v as i128,
        _ => unreachable!("caller checked numeric source"),
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int8(v) => *v as f64,
        Value::UInt8(v) => *v as f64,
        Value::Int16(v) => *v as f64,
        Value::UInt16(v) => *v as f64,
        Value::Int32(v) => *v as f64,
        Value::UInt32(v) => *v as f64,
        Value::Int64(v) => *v as f64,
        Value::UInt64(v) => *v as f64,
        Value::Float32(v) => *v as f64,
        Value::Float64(v) => *v,
        _ => unreachable!("caller checked numeric source"),
    }
}

fn make_int(wide: i128, bytes: u8, signed: bool) -> Value {
    match (bytes, signed) {
        (1, true) => Value::Int8(wide as i8),
        (1, false) => Value::UInt8(wide as u8),
        (2, true) => Value::Int16(wide as i16),
        (2, false) => Value::UInt16(wide as u16),
        (4, true) => Value::Int32(wide as i32),
        (4, false) => Value::UInt32(wide as u32),
        (8, true) => Value::Int64(wide as i64),
        (8, false) => Value::UInt64(wide as u64),
        _ => unreachable!("invalid integer width: {} bytes", bytes),
    }
}

fn int_range(bytes: u8, signed: bool) -> (i128, i128) {
    if signed {
        let bits = bytes as u32 * 8;
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        let bits = bytes as u32 * 8;
        (0, (1i128 << bits) - 1)
    }
}

fn is_lossless(value: &Value, target: &TypeKind) -> bool {
    match target {
        TypeKind::Int { bytes, signed } => {
            if let Value::Float32(f) = value {
                if f.fract() != 0.0 || !f.is_finite() {
                    return false;
                }
            }
            if let Value::Float64(f) = value {
                if f.fract() != 0.0 || !f.is_finite() {
                    return false;
                }
            }
            let wide = as_i128(value);
            let (min, max) = int_range(*bytes, *signed);
            wide >= min && wide <= max
        }
        TypeKind::Float { bytes: 4 } => match value {
            Value::Float32(_) => true,
            Value::Float64(f) => (*f as f32) as f64 == *f || f.is_nan(),
            _ => {
                let wide = as_i128(value);
                (wide as f32) as i128 == wide
            }
        },
        TypeKind::Float { bytes: _ } => match value {
            Value::Float32(_) | Value::Float64(_) => true,
            _ => {
                let wide = as_i128(value);
                (wide as f64) as i128 == wide
            }
        },
        _ => false,
    }
}
