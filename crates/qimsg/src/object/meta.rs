// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MetaObject: the introspectable snapshot of an object.
//!
//! The snapshot lists every method, signal and property with its id, name
//! and signatures. It is what remote callers receive to drive calls by
//! name, and it travels the wire as a small fixed structure when an object
//! reference embeds it.

use crate::codec::{BufReader, Buffer, CodecError};
use crate::signature::Signature;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Description of one callable method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaMethod {
    /// Id unique within the owning object.
    pub id: u32,
    /// Human-readable name; overloads share it.
    pub name: String,
    /// Parameter signature (a single tuple token).
    pub parameters: Signature,
    /// Return-value signature (a single token).
    pub returns: Signature,
}

/// Description of one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSignal {
    pub id: u32,
    pub name: String,
    /// Argument shapes delivered to subscribers.
    pub arguments: Signature,
}

/// Description of one property, with its synthesized companions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaProperty {
    pub id: u32,
    pub name: String,
    /// Value signature (a single token).
    pub signature: Signature,
    /// Id of the synthesized getter method.
    pub getter: u32,
    /// Id of the synthesized setter method.
    pub setter: u32,
    /// Id of the synthesized change signal.
    pub signal: u32,
}

/// Immutable introspection snapshot of a generic object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaObject {
    description: String,
    methods: BTreeMap<u32, MetaMethod>,
    signals: BTreeMap<u32, MetaSignal>,
    properties: BTreeMap<u32, MetaProperty>,
}

impl MetaObject {
    pub(crate) fn new(
        description: String,
        methods: BTreeMap<u32, MetaMethod>,
        signals: BTreeMap<u32, MetaSignal>,
        properties: BTreeMap<u32, MetaProperty>,
    ) -> Self {
        Self {
            description,
            methods,
            signals,
            properties,
        }
    }

    /// Free-form object description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Method descriptor by id.
    pub fn method(&self, id: u32) -> Option<&MetaMethod> {
        self.methods.get(&id)
    }

    /// All methods in id order.
    pub fn methods(&self) -> impl Iterator<Item = &MetaMethod> {
        self.methods.values()
    }

    /// Lowest-id method carrying `name` (overloads share a name).
    pub fn method_id(&self, name: &str) -> Option<u32> {
        self.methods.values().find(|m| m.name == name).map(|m| m.id)
    }

    /// All overloads registered under `name`, in id order.
    pub fn methods_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a MetaMethod> + use<'a, 'n> {
        self.methods.values().filter(move |m| m.name == name)
    }

    /// Resolve an overload: exact parameter signature first, then the
    /// first overload the provided signature converts to.
    pub fn find_method(&self, name: &str, provided: &Signature) -> Option<&MetaMethod> {
        self.methods_named(name)
            .find(|m| m.parameters.as_str() == provided.as_str())
            .or_else(|| {
                self.methods_named(name)
                    .find(|m| provided.is_convertible_to(&m.parameters))
            })
    }

    /// Signal descriptor by id.
    pub fn signal(&self, id: u32) -> Option<&MetaSignal> {
        self.signals.get(&id)
    }

    /// All signals in id order.
    pub fn signals(&self) -> impl Iterator<Item = &MetaSignal> {
        self.signals.values()
    }

    /// Signal id by name.
    pub fn signal_id(&self, name: &str) -> Option<u32> {
        self.signals.values().find(|s| s.name == name).map(|s| s.id)
    }

    /// Property descriptor by id.
    pub fn property(&self, id: u32) -> Option<&MetaProperty> {
        self.properties.get(&id)
    }

    /// All properties in id order.
    pub fn properties(&self) -> impl Iterator<Item = &MetaProperty> {
        self.properties.values()
    }

    /// Property id by name.
    pub fn property_id(&self, name: &str) -> Option<u32> {
        self.properties
            .values()
            .find(|p| p.name == name)
            .map(|p| p.id)
    }

    /// Multi-line human-readable listing used by introspection tooling.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        if !self.description.is_empty() {
            let _ = writeln!(out, "object: {}", self.description);
        }
        for m in self.methods.values() {
            let _ = writeln!(out, "  method   {:>4}  {}::{}{}", m.id, m.name, m.returns, m.parameters);
        }
        for s in self.signals.values() {
            let _ = writeln!(out, "  signal   {:>4}  {}({})", s.id, s.name, s.arguments);
        }
        for p in self.properties.values() {
            let _ = writeln!(out, "  property {:>4}  {}: {}", p.id, p.name, p.signature);
        }
        out
    }

    /// Encode the snapshot as its fixed wire structure.
    pub fn encode(&self, buf: &mut Buffer) -> Result<(), CodecError> {
        buf.write_str(&self.description)?;
        buf.write_u32(self.methods.len() as u32);
        for m in self.methods.values() {
            buf.write_u32(m.id);
            buf.write_str(&m.name)?;
            buf.write_str(m.parameters.as_str())?;
            buf.write_str(m.returns.as_str())?;
        }
        buf.write_u32(self.signals.len() as u32);
        for s in self.signals.values() {
            buf.write_u32(s.id);
            buf.write_str(&s.name)?;
            buf.write_str(s.arguments.as_str())?;
        }
        buf.write_u32(self.properties.len() as u32);
        for p in self.properties.values() {
            buf.write_u32(p.id);
            buf.write_str(&p.name)?;
            buf.write_str(p.signature.as_str())?;
            buf.write_u32(p.getter);
            buf.write_u32(p.setter);
            buf.write_u32(p.signal);
        }
        Ok(())
    }

    /// Decode a snapshot, validating every embedded signature.
    pub fn decode(reader: &mut BufReader<'_>) -> Result<Self, CodecError> {
        let description = reader.read_str()?;

        let method_count = reader.read_u32()?;
        let mut methods = BTreeMap::new();
        for _ in 0..method_count {
            let id = reader.read_u32()?;
            let name = reader.read_str()?;
            let parameters = Signature::parse(&reader.read_str()?)?;
            let returns = Signature::parse(&reader.read_str()?)?;
            methods.insert(
                id,
                MetaMethod {
                    id,
                    name,
                    parameters,
                    returns,
                },
            );
        }

        let signal_count = reader.read_u32()?;
        let mut signals = BTreeMap::new();
        for _ in 0..signal_count {
            let id = reader.read_u32()?;
            let name = reader.read_str()?;
            let arguments = Signature::parse(&reader.read_str()?)?;
            signals.insert(
                id,
                MetaSignal {
                    id,
                    name,
                    arguments,
                },
            );
        }

        let property_count = reader.read_u32()?;
        let mut properties = BTreeMap::new();
        for _ in 0..property_count {
            let id = reader.read_u32()?;
            let name = reader.read_str()?;
            let signature = Signature::parse(&reader.read_str()?)?;
            let getter = reader.read_u32()?;
            let setter = reader.read_u32()?;
            let signal = reader.read_u32()?;
            properties.insert(
                id,
                MetaProperty {
                    id,
                    name,
                    signature,
                    getter,
                    setter,
                    signal,
                },
            );
        }

        Ok(Self {
            description,
            methods,
            signals,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetaObject {
        let mut methods = BTreeMap::new();
        methods.insert(
            100,
            MetaMethod {
                id: 100,
                name: "add".to_string(),
                parameters: Signature::parse("(ii)").unwrap(),
                returns: Signature::parse("i").unwrap(),
            },
        );
        let mut signals = BTreeMap::new();
        signals.insert(
            101,
            MetaSignal {
                id: 101,
                name: "added".to_string(),
                arguments: Signature::parse("i").unwrap(),
            },
        );
        let mut properties = BTreeMap::new();
        properties.insert(
            102,
            MetaProperty {
                id: 102,
                name: "volume".to_string(),
                signature: Signature::parse("i").unwrap(),
                getter: 103,
                setter: 104,
                signal: 105,
            },
        );
        MetaObject::new("calculator".to_string(), methods, signals, properties)
    }

    #[test]
    fn lookups_by_id_and_name() {
        let meta = sample();
        assert_eq!(meta.method(100).map(|m| m.name.as_str()), Some("add"));
        assert_eq!(meta.method_id("add"), Some(100));
        assert_eq!(meta.signal_id("added"), Some(101));
        assert_eq!(meta.property_id("volume"), Some(102));
        assert_eq!(meta.method_id("missing"), None);
    }

    #[test]
    fn overload_resolution_prefers_exact() {
        let mut methods = BTreeMap::new();
        methods.insert(
            100,
            MetaMethod {
                id: 100,
                name: "f".to_string(),
                parameters: Signature::parse("(d)").unwrap(),
                returns: Signature::parse("v").unwrap(),
            },
        );
        methods.insert(
            101,
            MetaMethod {
                id: 101,
                name: "f".to_string(),
                parameters: Signature::parse("(i)").unwrap(),
                returns: Signature::parse("v").unwrap(),
            },
        );
        let meta = MetaObject::new(String::new(), methods, BTreeMap::new(), BTreeMap::new());

        let exact = Signature::parse("(i)").unwrap();
        assert_eq!(meta.find_method("f", &exact).map(|m| m.id), Some(101));

        // No exact overload: the first convertible one wins.
        let widened = Signature::parse("(w)").unwrap();
        assert_eq!(meta.find_method("f", &widened).map(|m| m.id), Some(100));

        let none = Signature::parse("(s)").unwrap();
        assert!(meta.find_method("f", &none).is_none());
    }

    #[test]
    fn wire_roundtrip() {
        let meta = sample();
        let mut buf = Buffer::new();
        meta.encode(&mut buf).expect("encode");

        let mut reader = buf.reader();
        let decoded = MetaObject::decode(&mut reader).expect("decode");
        assert!(reader.is_eof());
        assert_eq!(decoded, meta);
    }

    #[test]
    fn decode_rejects_malformed_signature() {
        let meta = sample();
        let mut buf = Buffer::new();
        meta.encode(&mut buf).expect("encode");

        // Corrupt the "(ii)" parameter signature into "(ii" by patching the
        // closing paren to an unknown byte.
        let mut bytes = buf.into_vec();
        let pos = bytes.windows(4).position(|w| w == b"(ii)").expect("params");
        bytes[pos + 3] = b'Q';

        let mut reader = BufReader::new(&bytes);
        let err = MetaObject::decode(&mut reader).unwrap_err();
        assert!(matches!(err, CodecError::Signature(_)));
    }

    #[test]
    fn describe_lists_every_member() {
        let meta = sample();
        let text = meta.describe();
        assert!(text.contains("add::i(ii)"));
        assert!(text.contains("added(i)"));
        assert!(text.contains("volume: i"));
    }
}
