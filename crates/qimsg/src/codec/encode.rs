// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signature-driven encoder.

use super::{Buffer, CodecError, ObjectTranscoder};
use crate::signature::{Kind, Signature, Token};
use crate::types::TypeInfo;
use crate::value::{NumericMode, Value};

/// Encode one value per the signature, with no object transcoder and the
/// lenient numeric policy.
pub fn encode(buf: &mut Buffer, value: &Value, signature: &Signature) -> Result<(), CodecError> {
    Encoder::new(buf).encode(value, signature)
}

/// Configurable encoder walking a value and a signature in lock-step.
pub struct Encoder<'a> {
    buf: &'a mut Buffer,
    numeric: NumericMode,
    transcoder: Option<&'a mut dyn ObjectTranscoder>,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self {
            buf,
            numeric: NumericMode::Lenient,
            transcoder: None,
        }
    }

    /// Numeric conversion policy for values that need width changes.
    pub fn numeric_mode(mut self, mode: NumericMode) -> Self {
        self.numeric = mode;
        self
    }

    /// Strategy for object reference tokens.
    pub fn transcoder(mut self, transcoder: &'a mut dyn ObjectTranscoder) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Encode `value` per `signature`. A multi-token signature expects a
    /// tuple value of matching arity; the zero-token signature expects
    /// Void or an empty tuple and writes nothing.
    pub fn encode(&mut self, value: &Value, signature: &Signature) -> Result<(), CodecError> {
        match signature.len() {
            0 => match value {
                Value::Void => Ok(()),
                Value::Tuple(items) if items.is_empty() => Ok(()),
                other => Err(CodecError::Encode(format!(
                    "empty signature cannot carry a {} value",
                    other.kind_name()
                ))),
            },
            1 => self.token(value, signature.first().expect("len checked")),
            n => match value {
                Value::Tuple(items) if items.len() == n => {
                    for (item, token) in items.iter().zip(signature.iter()) {
                        self.token(item, token)?;
                    }
                    Ok(())
                }
                other => Err(CodecError::Encode(format!(
                    "signature {} expects a {}-element tuple, got {}",
                    signature,
                    n,
                    other.kind_name()
                ))),
            },
        }
    }

    fn token(&mut self, value: &Value, token: &Token) -> Result<(), CodecError> {
        match token.kind() {
            Kind::Unknown => Err(CodecError::UnsupportedToken(Kind::Unknown)),
            Kind::Dynamic => {
                let inner: &Value = match value {
                    Value::Dynamic(boxed) => boxed,
                    other => other,
                };
                if inner.is_invalid() {
                    return Err(CodecError::Encode(
                        "cannot encode an invalid value as dynamic".to_string(),
                    ));
                }
                let signature = inner.signature();
                self.buf.write_str(signature.as_str())?;
                self.token(inner, signature.first().expect("runtime signature"))
            }
            Kind::Object => {
                let object = value.as_object().ok_or_else(|| {
                    CodecError::Encode(format!(
                        "object token expects an object value, got {}",
                        value.kind_name()
                    ))
                })?;
                let transcoder = self
                    .transcoder
                    .as_deref_mut()
                    .ok_or(CodecError::MissingTranscoder)?;
                let reference = transcoder.encode_object(object)?;
                self.buf.write_u32(reference.service);
                self.buf.write_u32(reference.object);
                match &reference.meta {
                    Some(meta) => {
                        self.buf.write_bool(true);
                        meta.encode(self.buf)?;
                    }
                    None => self.buf.write_bool(false),
                }
                Ok(())
            }
            _ => {
                let target = TypeInfo::from_token(token);
                let (converted, _) = value.convert_to(&target, self.numeric)?;
                self.exact(&converted, token)
            }
        }
    }

    // The value was already converted to the token's exact shape; container
    // children re-enter `token` so nested dynamics and objects still work.
    fn exact(&mut self, value: &Value, token: &Token) -> Result<(), CodecError> {
        match (value, token.kind()) {
            (Value::Void, Kind::Void) => Ok(()),
            (Value::Bool(v), Kind::Bool) => {
                self.buf.write_bool(*v);
                Ok(())
            }
            (Value::Int8(v), Kind::Int8) => {
                self.buf.write_i8(*v);
                Ok(())
            }
            (Value::UInt8(v), Kind::UInt8) => {
                self.buf.write_u8(*v);
                Ok(())
            }
            (Value::Int16(v), Kind::Int16) => {
                self.buf.write_i16(*v);
                Ok(())
            }
            (Value::UInt16(v), Kind::UInt16) => {
                self.buf.write_u16(*v);
                Ok(())
            }
            (Value::Int32(v), Kind::Int32) => {
                self.buf.write_i32(*v);
                Ok(())
            }
            (Value::UInt32(v), Kind::UInt32) => {
                self.buf.write_u32(*v);
                Ok(())
            }
            (Value::Int64(v), Kind::Int64) => {
                self.buf.write_i64(*v);
                Ok(())
            }
            (Value::UInt64(v), Kind::UInt64) => {
                self.buf.write_u64(*v);
                Ok(())
            }
            (Value::Float32(v), Kind::Float32) => {
                self.buf.write_f32(*v);
                Ok(())
            }
            (Value::Float64(v), Kind::Float64) => {
                self.buf.write_f64(*v);
                Ok(())
            }
            (Value::String(v), Kind::String) => self.buf.write_str(v),
            (Value::Raw(v), Kind::Raw) => self.buf.write_sized(v),
            (Value::List(items), Kind::List) => {
                let count = u32::try_from(items.len())
                    .map_err(|_| CodecError::Oversize { len: items.len() })?;
                self.buf.write_u32(count);
                let children = token.children();
                let element = children.first().expect("list child");
                for item in items {
                    self.token(item, element)?;
                }
                Ok(())
            }
            (Value::Map(pairs), Kind::Map) => {
                let count = u32::try_from(pairs.len())
                    .map_err(|_| CodecError::Oversize { len: pairs.len() })?;
                self.buf.write_u32(count);
                let children = token.children();
                let key = children.token(0).expect("map key");
                let value_token = children.token(1).expect("map value");
                for (k, v) in pairs {
                    self.token(k, key)?;
                    self.token(v, value_token)?;
                }
                Ok(())
            }
            (Value::Tuple(items), Kind::Tuple) => {
                let children = token.children();
                for (item, child) in items.iter().zip(children.iter()) {
                    self.token(item, child)?;
                }
                Ok(())
            }
            (other, kind) => Err(CodecError::Encode(format!(
                "value {} does not match token {:?}",
                other.kind_name(),
                kind
            ))),
        }
    }
}
