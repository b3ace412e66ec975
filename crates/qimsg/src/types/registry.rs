// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide registry mapping Rust types to descriptors.
//!
//! Registration is rare (load time or first use), lookup is frequent; the
//! backing concurrent map keeps lookups from serializing. Re-registering an
//! identity is last-write-wins with a shadowing warning; callers that need
//! strict-once semantics probe first.

use crate::types::{Reflect, TypeInfo};
use dashmap::DashMap;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Errors for registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The identity was never registered and cannot be derived.
    Unknown(String),
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "Unknown type: {}", name),
        }
    }
}

impl std::error::Error for TypeError {}

struct Registered {
    info: Arc<TypeInfo>,
    rust_name: &'static str,
}

/// Registry of type descriptors keyed by `TypeId`.
pub struct TypeRegistry {
    entries: DashMap<TypeId, Registered>,
}

impl TypeRegistry {
    /// Fresh, empty registry (test isolation; production code uses
    /// [`TypeRegistry::global`]).
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The process-wide registry, constructed on first access.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    /// Register `T`'s descriptor. Idempotent; a structurally different
    /// re-registration shadows the previous descriptor (last-write-wins).
    pub fn register<T: Reflect>(&self) -> Arc<TypeInfo> {
        let id = TypeId::of::<T>();
        let info = T::type_info();
        if let Some(prev) = self.entries.get(&id) {
            if prev.info.signature() == info.signature() {
                return prev.info.clone();
            }
            log::warn!(
                "type registry: shadowing {} ({} -> {})",
                prev.rust_name,
                prev.info.signature(),
                info.signature()
            );
        } else {
            log::debug!(
                "type registry: registered {} as {}",
                type_name::<T>(),
                info.signature()
            );
        }
        self.entries.insert(
            id,
            Registered {
                info: info.clone(),
                rust_name: type_name::<T>(),
            },
        );
        info
    }

    /// Register an explicit descriptor for an identity. Last-write-wins:
    /// a structurally different descriptor shadows the previous one with a
    /// warning, never a silent duplicate.
    pub fn register_as(
        &self,
        id: TypeId,
        rust_name: &'static str,
        info: Arc<TypeInfo>,
    ) -> Arc<TypeInfo> {
        if let Some(prev) = self.entries.get(&id) {
            if prev.info.signature() != info.signature() {
                log::warn!(
                    "type registry: shadowing {} ({} -> {})",
                    prev.rust_name,
                    prev.info.signature(),
                    info.signature()
                );
            }
        }
        self.entries.insert(
            id,
            Registered {
                info: info.clone(),
                rust_name,
            },
        );
        info
    }

    /// Non-erroring existence check.
    pub fn probe<T: 'static>(&self) -> Option<Arc<TypeInfo>> {
        self.entries.get(&TypeId::of::<T>()).map(|e| e.info.clone())
    }

    /// Descriptor for `T`, registering it on first use (the structural
    /// derivation path for self-describing types).
    pub fn type_of<T: Reflect>(&self) -> Arc<TypeInfo> {
        match self.probe::<T>() {
            Some(info) => info,
            None => self.register::<T>(),
        }
    }

    /// Descriptor for a raw identity; `Unknown` if it was never registered.
    pub fn lookup(&self, id: TypeId) -> Result<Arc<TypeInfo>, TypeError> {
        self.entries
            .get(&id)
            .map(|e| e.info.clone())
            .ok_or_else(|| TypeError::Unknown(format!("{:?}", id)))
    }

    /// Descriptor looked up by the Rust type path it was registered under.
    pub fn lookup_by_name(&self, rust_name: &str) -> Result<Arc<TypeInfo>, TypeError> {
        self.entries
            .iter()
            .find(|e| e.rust_name == rust_name)
            .map(|e| e.info.clone())
            .ok_or_else(|| TypeError::Unknown(rust_name.to_string()))
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_probe() {
        let registry = TypeRegistry::new();
        assert!(registry.probe::<i32>().is_none());

        let info = registry.register::<i32>();
        assert_eq!(info.signature().as_str(), "i");
        assert!(registry.probe::<i32>().is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_is_idempotent() {
        let registry = TypeRegistry::new();
        registry.register::<String>();
        registry.register::<String>();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn type_of_registers_lazily() {
        let registry = TypeRegistry::new();
        let info = registry.type_of::<Vec<i32>>();
        assert_eq!(info.signature().as_str(), "[i]");
        assert!(registry.probe::<Vec<i32>>().is_some());
    }

    #[test]
    fn explicit_registration_is_last_write_wins() {
        struct Marker;
        let registry = TypeRegistry::new();
        let id = TypeId::of::<Marker>();

        registry.register_as(id, "Marker", TypeInfo::int32());
        assert_eq!(registry.lookup(id).unwrap().signature().as_str(), "i");

        // Shadowing: the new descriptor becomes authoritative.
        registry.register_as(id, "Marker", TypeInfo::string());
        assert_eq!(registry.lookup(id).unwrap().signature().as_str(), "s");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_unregistered_is_recoverable() {
        let registry = TypeRegistry::new();
        let err = registry.lookup(TypeId::of::<u64>()).unwrap_err();
        assert!(matches!(err, TypeError::Unknown(_)));
    }

    #[test]
    fn lookup_by_name() {
        let registry = TypeRegistry::new();
        registry.register::<bool>();
        let info = registry.lookup_by_name("bool").expect("registered");
        assert_eq!(info.signature().as_str(), "b");
        assert!(registry.lookup_by_name("no::such::Type").is_err());
    }
}
