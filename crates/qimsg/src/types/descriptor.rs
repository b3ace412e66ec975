// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! A `TypeInfo` is the operational contract for one erased type: a closed
//! kind tag plus `Arc`-linked children for containers. Its signature is a
//! pure function of the kind tree and is stable for the process lifetime.

use crate::signature::{Kind, Signature, Token};
use std::sync::Arc;

/// Kind of an erased type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Void,
    Bool,
    /// Fixed-width integer; `bytes` is 1, 2, 4 or 8.
    Int { bytes: u8, signed: bool },
    /// IEEE-754 float; `bytes` is 4 or 8.
    Float { bytes: u8 },
    String,
    Raw,
    Dynamic,
    Object,
    Unknown,
    List(Arc<TypeInfo>),
    Map(Arc<TypeInfo>, Arc<TypeInfo>),
    Tuple(Vec<Arc<TypeInfo>>),
    Pointer(Arc<TypeInfo>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
}

impl TypeInfo {
    /// Create a descriptor with an explicit name.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Descriptor name (empty for anonymous containers).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind tag.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn void() -> Arc<Self> {
        Arc::new(Self::new("void", TypeKind::Void))
    }

    pub fn boolean() -> Arc<Self> {
        Arc::new(Self::new("bool", TypeKind::Bool))
    }

    pub fn int8() -> Arc<Self> {
        Arc::new(Self::new(
            "int8",
            TypeKind::Int {
                bytes: 1,
                signed: true,
            },
        ))
    }

    pub fn uint8() -> Arc<Self> {
        Arc::new(Self::new(
            "uint8",
            TypeKind::Int {
                bytes: 1,
                signed: false,
            },
        ))
    }

    pub fn int16() -> Arc<Self> {
        Arc::new(Self::new(
            "int16",
            TypeKind::Int {
                bytes: 2,
                signed: true,
            },
        ))
    }

    pub fn uint16() -> Arc<Self> {
        Arc::new(Self::new(
            "uint16",
            TypeKind::Int {
                bytes: 2,
                signed: false,
            },
        ))
    }

    pub fn int32() -> Arc<Self> {
        Arc::new(Self::new(
            "int32",
            TypeKind::Int {
                bytes: 4,
                signed: true,
            },
        ))
    }

    pub fn uint32() -> Arc<Self> {
        Arc::new(Self::new(
            "uint32",
            TypeKind::Int {
                bytes: 4,
                signed: false,
            },
        ))
    }

    pub fn int64() -> Arc<Self> {
        Arc::new(Self::new(
            "int64",
            TypeKind::Int {
                bytes: 8,
                signed: true,
            },
        ))
    }

    pub fn uint64() -> Arc<Self> {
        Arc::new(Self::new(
            "uint64",
            TypeKind::Int {
                bytes: 8,
                signed: false,
            },
        ))
    }

    pub fn float32() -> Arc<Self> {
        Arc::new(Self::new("float32", TypeKind::Float { bytes: 4 }))
    }

    pub fn float64() -> Arc<Self> {
        Arc::new(Self::new("float64", TypeKind::Float { bytes: 8 }))
    }

    pub fn string() -> Arc<Self> {
        Arc::new(Self::new("string", TypeKind::String))
    }

    pub fn raw() -> Arc<Self> {
        Arc::new(Self::new("raw", TypeKind::Raw))
    }

    pub fn dynamic() -> Arc<Self> {
        Arc::new(Self::new("dynamic", TypeKind::Dynamic))
    }

    pub fn object() -> Arc<Self> {
        Arc::new(Self::new("object", TypeKind::Object))
    }

    pub fn unknown() -> Arc<Self> {
        Arc::new(Self::new("unknown", TypeKind::Unknown))
    }

    /// List descriptor. Structurally identical children produce identical
    /// observable signatures.
    pub fn list_of(element: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new("", TypeKind::List(element)))
    }

    /// Map descriptor.
    pub fn map_of(key: Arc<Self>, value: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new("", TypeKind::Map(key, value)))
    }

    /// Tuple descriptor.
    pub fn tuple_of(members: Vec<Arc<Self>>) -> Arc<Self> {
        Arc::new(Self::new("", TypeKind::Tuple(members)))
    }

    /// Pointer/optional descriptor around an inner type.
    pub fn pointer_to(inner: Arc<Self>) -> Arc<Self> {
        Arc::new(Self::new("", TypeKind::Pointer(inner)))
    }

    /// Signature of this type, derived purely from the kind tree.
    pub fn signature(&self) -> Signature {
        Signature::from_tokens(vec![self.token()])
    }

    fn token(&self) -> Token {
        match &self.kind {
            TypeKind::Void => Token::leaf(Kind::Void),
            TypeKind::Bool => Token::leaf(Kind::Bool),
            TypeKind::Int { bytes, signed } => Token::leaf(int_kind(*bytes, *signed)),
            TypeKind::Float { bytes: 4 } => Token::leaf(Kind::Float32),
            TypeKind::Float { bytes: _ } => Token::leaf(Kind::Float64),
            TypeKind::String => Token::leaf(Kind::String),
            TypeKind::Raw => Token::leaf(Kind::Raw),
            TypeKind::Dynamic => Token::leaf(Kind::Dynamic),
            TypeKind::Object => Token::leaf(Kind::Object),
            TypeKind::Unknown => Token::leaf(Kind::Unknown),
            TypeKind::List(element) => Token::list(element.token()),
            TypeKind::Map(key, value) => Token::map(key.token(), value.token()),
            TypeKind::Tuple(members) => {
                Token::tuple(members.iter().map(|m| m.token()).collect())
            }
            TypeKind::Pointer(inner) => inner.token().with_pointer(),
        }
    }

    /// Build a descriptor mirroring one signature token. Total: every token
    /// kind has a descriptor, including Unknown.
    pub fn from_token(token: &Token) -> Arc<Self> {
        let base = match token.kind() {
            Kind::Void => Self::void(),
            Kind::Bool => Self::boolean(),
            Kind::Int8 => Self::int8(),
            Kind::UInt8 => Self::uint8(),
            Kind::Int16 => Self::int16(),
            Kind::UInt16 => Self::uint16(),
            Kind::Int32 => Self::int32(),
            Kind::UInt32 => Self::uint32(),
            Kind::Int64 => Self::int64(),
            Kind::UInt64 => Self::uint64(),
            Kind::Float32 => Self::float32(),
            Kind::Float64 => Self::float64(),
            Kind::String => Self::string(),
            Kind::Raw => Self::raw(),
            Kind::Dynamic => Self::dynamic(),
            Kind::Object => Self::object(),
            Kind::Unknown => Self::unknown(),
            Kind::List => {
                let children = token.children();
                Self::list_of(Self::from_token(children.first().expect("list child")))
            }
            Kind::Map => {
                let children = token.children();
                Self::map_of(
                    Self::from_token(children.token(0).expect("map key")),
                    Self::from_token(children.token(1).expect("map value")),
                )
            }
            Kind::Tuple => Self::tuple_of(token.children().iter().map(Self::from_token).collect()),
        };
        if token.is_pointer() {
            Self::pointer_to(base)
        } else {
            base
        }
    }
}

// Container descriptors with an invalid width are a registration-time bug,
// so aborting here is acceptable; they cannot arise from wire input.
fn int_kind(bytes: u8, signed: bool) -> Kind {
    match (bytes, signed) {
        (1, true) => Kind::Int8,
        (1, false) => Kind::UInt8,
        (2, true) => Kind::Int16,
        (2, false) => Kind::UInt16,
        (4, true) => Kind::Int32,
        (4, false) => Kind::UInt32,
        (8, true) => Kind::Int64,
        (8, false) => Kind::UInt64,
        _ => unreachable!("invalid integer width: {} bytes", bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_signatures() {
        assert_eq!(TypeInfo::int32().signature().as_str(), "i");
        assert_eq!(TypeInfo::uint64().signature().as_str(), "L");
        assert_eq!(TypeInfo::float64().signature().as_str(), "d");
        assert_eq!(TypeInfo::string().signature().as_str(), "s");
        assert_eq!(TypeInfo::dynamic().signature().as_str(), "m");
    }

    #[test]
    fn container_signatures() {
        let list = TypeInfo::list_of(TypeInfo::string());
        assert_eq!(list.signature().as_str(), "[s]");

        let map = TypeInfo::map_of(TypeInfo::string(), TypeInfo::int32());
        assert_eq!(map.signature().as_str(), "{si}");

        let tuple = TypeInfo::tuple_of(vec![TypeInfo::int32(), TypeInfo::string()]);
        assert_eq!(tuple.signature().as_str(), "(is)");
    }

    #[test]
    fn container_constructors_are_deterministic() {
        let a = TypeInfo::list_of(TypeInfo::map_of(TypeInfo::string(), TypeInfo::int32()));
        let b = TypeInfo::list_of(TypeInfo::map_of(TypeInfo::string(), TypeInfo::int32()));
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn from_token_roundtrip() {
        for text in ["i", "[s]", "{si}", "(i[d]s)", "m", "o", "X"] {
            let sig = Signature::parse(text).expect("parse");
            let info = TypeInfo::from_token(sig.first().expect("token"));
            assert_eq!(info.signature().as_str(), text);
        }
    }

    #[test]
    fn pointer_renders_qualifier() {
        let ptr = TypeInfo::pointer_to(TypeInfo::object());
        assert_eq!(ptr.signature().as_str(), "o*");

        let sig = Signature::parse("o*").expect("parse");
        let info = TypeInfo::from_token(sig.first().expect("token"));
        assert_eq!(info.signature().as_str(), "o*");
    }
}
