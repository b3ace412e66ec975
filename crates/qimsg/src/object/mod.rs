// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic objects: the RPC-addressable unit of methods, signals and
//! properties.
//!
//! An object is built once through [`ObjectBuilder`] (the registration
//! phase), then used read-only for dispatch. Methods are invoked by id or
//! name and resolve through a [`crate::future::Future`]; signals carry
//! pub/sub subscriptions; properties synthesize a getter/setter overload
//! pair and a change signal.
//!
//! # Example
//!
//! ```rust
//! use qimsg::object::ObjectBuilder;
//! use qimsg::value::Value;
//! use std::time::Duration;
//!
//! let mut builder = ObjectBuilder::new("calculator");
//! builder.method("add", |a: i32, b: i32| a + b).unwrap();
//! let object = builder.build();
//!
//! let future = object.call_method("add", vec![Value::Int32(3), Value::Int32(4)]);
//! assert_eq!(future.result(Duration::from_secs(1)).unwrap(), Value::Int32(7));
//! ```

mod builder;
mod callable;
mod meta;
mod object;
mod property;
mod signal;

pub use builder::{ObjectBuilder, USER_ID_BASE};
pub use callable::{CallContext, IntoMethod, MethodThunk};
pub use meta::{MetaMethod, MetaObject, MetaProperty, MetaSignal};
pub use object::{AnyObject, CallOptions, GenericObject};
pub use signal::{Link, SignalCallback};

use std::fmt;

/// Errors for object registration and member lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The same name+parameters combination is already registered.
    DuplicateName { name: String, parameters: String },
    /// Explicitly-chosen id is already taken.
    IdInUse(u32),
    /// Explicitly-chosen id falls in the reserved built-in range.
    ReservedId(u32),
    /// No method under that id or name.
    NoSuchMethod(String),
    /// No signal under that id.
    NoSuchSignal(u32),
    /// No property under that id.
    NoSuchProperty(u32),
    /// Provided values do not fit the declared signature.
    IncompatibleArguments { expected: String, got: String },
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name, parameters } => {
                write!(f, "'{}{}' is already registered", name, parameters)
            }
            Self::IdInUse(id) => write!(f, "Id {} is already in use", id),
            Self::ReservedId(id) => {
                write!(f, "Id {} is reserved for protocol built-ins", id)
            }
            Self::NoSuchMethod(name) => write!(f, "No such method: {}", name),
            Self::NoSuchSignal(id) => write!(f, "No such signal: {}", id),
            Self::NoSuchProperty(id) => write!(f, "No such property: {}", id),
            Self::IncompatibleArguments { expected, got } => {
                write!(f, "Arguments {} do not fit {}", got, expected)
            }
        }
    }
}

impl std::error::Error for ObjectError {}

#[cfg(test)]
mod tests;
