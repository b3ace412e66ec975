// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signature-driven decoder.

use super::{BufReader, CodecError, ObjectReference, ObjectTranscoder};
use crate::object::MetaObject;
use crate::signature::{Kind, Signature, Token};
use crate::value::Value;

/// Decode one value per the signature, with no object transcoder.
///
/// The reader's cursor advances exactly to the token boundary, so
/// consecutive values can be decoded from one buffer by repeated calls.
pub fn decode(reader: &mut BufReader<'_>, signature: &Signature) -> Result<Value, CodecError> {
    Decoder::new(reader).decode(signature)
}

/// Configurable decoder replaying the encoder's walk over received bytes.
pub struct Decoder<'r, 'b> {
    reader: &'r mut BufReader<'b>,
    transcoder: Option<&'r mut dyn ObjectTranscoder>,
}

impl<'r, 'b> Decoder<'r, 'b> {
    pub fn new(reader: &'r mut BufReader<'b>) -> Self {
        Self {
            reader,
            transcoder: None,
        }
    }

    /// Strategy for object reference tokens.
    pub fn transcoder(mut self, transcoder: &'r mut dyn ObjectTranscoder) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Decode per `signature`: Void for the zero-token signature, one value
    /// for a single token, a tuple for a multi-token signature.
    pub fn decode(&mut self, signature: &Signature) -> Result<Value, CodecError> {
        match signature.len() {
            0 => Ok(Value::Void),
            1 => self.token(signature.first().expect("len checked")),
            _ => {
                let mut items = Vec::with_capacity(signature.len());
                for token in signature.iter() {
                    items.push(self.token(token)?);
                }
                Ok(Value::Tuple(items))
            }
        }
    }

    fn token(&mut self, token: &Token) -> Result<Value, CodecError> {
        match token.kind() {
            Kind::Void => Ok(Value::Void),
            Kind::Bool => Ok(Value::Bool(self.reader.read_bool()?)),
            Kind::Int8 => Ok(Value::Int8(self.reader.read_i8()?)),
            Kind::UInt8 => Ok(Value::UInt8(self.reader.read_u8()?)),
            Kind::Int16 => Ok(Value::Int16(self.reader.read_i16()?)),
            Kind::UInt16 => Ok(Value::UInt16(self.reader.read_u16()?)),
            Kind::Int32 => Ok(Value::Int32(self.reader.read_i32()?)),
            Kind::UInt32 => Ok(Value::UInt32(self.reader.read_u32()?)),
            Kind::Int64 => Ok(Value::Int64(self.reader.read_i64()?)),
            Kind::UInt64 => Ok(Value::UInt64(self.reader.read_u64()?)),
            Kind::Float32 => Ok(Value::Float32(self.reader.read_f32()?)),
            Kind::Float64 => Ok(Value::Float64(self.reader.read_f64()?)),
            Kind::String => Ok(Value::String(self.reader.read_str()?)),
            Kind::Raw => Ok(Value::Raw(self.reader.read_sized()?.to_vec())),
            Kind::List => {
                let count = self.reader.read_u32()? as usize;
                let children = token.children();
                let element = children.first().expect("list child");
                // Capacity bounded by the remaining bytes so a hostile
                // count cannot force a huge allocation up front.
                let mut items = Vec::with_capacity(count.min(self.reader.remaining().max(1)));
                for _ in 0..count {
                    items.push(self.token(element)?);
                }
                Ok(Value::List(items))
            }
            Kind::Map => {
                let count = self.reader.read_u32()? as usize;
                let children = token.children();
                let key = children.token(0).expect("map key");
                let value = children.token(1).expect("map value");
                let mut pairs = Vec::with_capacity(count.min(self.reader.remaining().max(1)));
                for _ in 0..count {
                    let k = self.token(key)?;
                    let v = self.token(value)?;
                    pairs.push((k, v));
                }
                Ok(Value::Map(pairs))
            }
            Kind::Tuple => {
                let children = token.children();
                let mut items = Vec::with_capacity(children.len());
                for child in children.iter() {
                    items.push(self.token(child)?);
                }
                Ok(Value::Tuple(items))
            }
            Kind::Dynamic => {
                let text = self.reader.read_str()?;
                let signature = Signature::parse(&text)?;
                let inner = self.decode(&signature)?;
                Ok(Value::Dynamic(Box::new(inner)))
            }
            Kind::Object => {
                let service = self.reader.read_u32()?;
                let object = self.reader.read_u32()?;
                let meta = if self.reader.read_bool()? {
                    Some(MetaObject::decode(self.reader)?)
                } else {
                    None
                };
                let transcoder = self
                    .transcoder
                    .as_deref_mut()
                    .ok_or(CodecError::MissingTranscoder)?;
                let reconstructed = transcoder.decode_object(ObjectReference {
                    service,
                    object,
                    meta,
                })?;
                Ok(Value::Object(reconstructed))
            }
            Kind::Unknown => Err(CodecError::UnsupportedToken(Kind::Unknown)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode, Buffer};

    fn roundtrip(value: &Value, signature: &str) -> Value {
        let sig = Signature::parse(signature).expect("signature");
        let mut buf = Buffer::new();
        encode(&mut buf, value, &sig).expect("encode");
        let mut reader = buf.reader();
        let decoded = decode(&mut reader, &sig).expect("decode");
        assert!(reader.is_eof(), "decode must consume exactly its bytes");
        decoded
    }

    #[test]
    fn scalar_roundtrips() {
        assert_eq!(roundtrip(&Value::Int32(42), "i"), Value::Int32(42));
        assert_eq!(roundtrip(&Value::Bool(true), "b"), Value::Bool(true));
        assert_eq!(
            roundtrip(&Value::Float64(2.5), "d"),
            Value::Float64(2.5)
        );
        assert_eq!(
            roundtrip(&Value::from("hello"), "s"),
            Value::from("hello")
        );
    }

    #[test]
    fn nested_container_roundtrip() {
        let value = Value::Map(vec![
            (
                Value::from("a"),
                Value::List(vec![Value::Int32(1), Value::Int32(2)]),
            ),
            (Value::from("b"), Value::List(vec![])),
        ]);
        assert_eq!(roundtrip(&value, "{s[i]}"), value);
    }

    #[test]
    fn map_preserves_pair_order() {
        let value = Value::Map(vec![
            (Value::from("z"), Value::Int32(1)),
            (Value::from("a"), Value::Int32(2)),
        ]);
        let decoded = roundtrip(&value, "{si}");
        assert_eq!(decoded, value);
        let pairs = decoded.as_map().expect("map");
        assert_eq!(pairs[0].0, Value::from("z"));
    }

    #[test]
    fn dynamic_roundtrip() {
        let value = Value::Dynamic(Box::new(Value::List(vec![
            Value::Int32(1),
            Value::Int32(2),
        ])));
        assert_eq!(roundtrip(&value, "m"), value);
    }

    #[test]
    fn consecutive_decodes_consume_exact_bytes() {
        let sig_i = Signature::parse("i").expect("sig");
        let sig_s = Signature::parse("s").expect("sig");
        let mut buf = Buffer::new();
        encode(&mut buf, &Value::Int32(7), &sig_i).expect("encode");
        encode(&mut buf, &Value::from("x"), &sig_s).expect("encode");

        let mut reader = buf.reader();
        assert_eq!(decode(&mut reader, &sig_i).expect("first"), Value::Int32(7));
        assert_eq!(
            decode(&mut reader, &sig_s).expect("second"),
            Value::from("x")
        );
        assert!(reader.is_eof());
    }

    #[test]
    fn truncated_scalar() {
        let sig = Signature::parse("i").expect("sig");
        let data = [1, 2];
        let mut reader = BufReader::new(&data);
        let err = decode(&mut reader, &sig).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));
    }

    #[test]
    fn hostile_list_count_is_truncated_not_oom() {
        let sig = Signature::parse("[i]").expect("sig");
        // Count claims u32::MAX elements, no payload follows.
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = BufReader::new(&data);
        let err = decode(&mut reader, &sig).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));
    }

    #[test]
    fn malformed_nested_signature() {
        let sig = Signature::parse("m").expect("sig");
        let mut buf = Buffer::new();
        buf.write_str("[i").expect("write"); // unterminated nested signature
        buf.write_u32(0);
        let mut reader = buf.reader();
        let err = decode(&mut reader, &sig).unwrap_err();
        assert!(matches!(err, CodecError::Signature(_)));
    }

    #[test]
    fn object_without_transcoder_fails() {
        let sig = Signature::parse("o").expect("sig");
        let mut buf = Buffer::new();
        buf.write_u32(1);
        buf.write_u32(2);
        buf.write_bool(false);
        let mut reader = buf.reader();
        let err = decode(&mut reader, &sig).unwrap_err();
        assert!(matches!(err, CodecError::MissingTranscoder));
    }
}
