// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors and the process-wide type registry.
//!
//! A [`TypeInfo`] is the operational contract for one erased type. The
//! [`TypeRegistry`] maps Rust type identities to descriptors; the
//! [`Reflect`] trait lets native types self-describe and cross the erasure
//! boundary in both directions.
//!
//! # Example
//!
//! ```rust
//! use qimsg::types::{Reflect, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let info = registry.type_of::<Vec<(i32, String)>>();
//! assert_eq!(info.signature().as_str(), "[(is)]");
//! ```

mod descriptor;
mod reflect;
mod registry;

pub use descriptor::{TypeInfo, TypeKind};
pub use reflect::Reflect;
pub use registry::{TypeError, TypeRegistry};
