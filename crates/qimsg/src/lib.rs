// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # qimsg - Distributed-object RPC middleware core
//!
//! A pure Rust implementation of a distributed-object messaging core:
//! remote services expose methods, signals and properties through a
//! type-erased object model, values are described by a compact signature
//! grammar and travel as length-prefixed little-endian buffers, and every
//! call resolves through a future with timeout waits and cooperative
//! cancellation.
//!
//! ## Quick Start
//!
//! ```rust
//! use qimsg::{ObjectBuilder, Value};
//! use std::time::Duration;
//!
//! let mut builder = ObjectBuilder::new("calculator");
//! builder.method("add", |a: i32, b: i32| a + b)?;
//! let object = builder.build();
//!
//! let future = object.call_method("add", vec![Value::Int32(3), Value::Int32(4)]);
//! assert_eq!(future.result(Duration::from_secs(1))?, Value::Int32(7));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                         Object Layer                               |
//! |   ObjectBuilder -> GenericObject -> call/connect/property          |
//! +--------------------------------------------------------------------+
//! |                        Erasure Layer                               |
//! |   Signature grammar | TypeInfo registry | Value conversion         |
//! +--------------------------------------------------------------------+
//! |                          Wire Layer                                |
//! |   Buffer/BufReader | Encoder/Decoder | ObjectTranscoder hook       |
//! +--------------------------------------------------------------------+
//! |                    Transport (external)                            |
//! |   send(bytes) / onReceive(bytes) - sockets are not our business    |
//! +--------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Signature`] | Parsed shape description driving codec and dispatch |
//! | [`Value`] | Owned type-erased value of any protocol type |
//! | [`TypeRegistry`] | Process-wide map from Rust types to descriptors |
//! | [`ObjectBuilder`] | Registration phase of a generic object |
//! | [`GenericObject`] | The RPC-addressable method/signal/property bundle |
//! | [`Future`] | Call result with timeout waits and cancellation |
//!
//! ## Wire format
//!
//! All scalars are little-endian; strings and raw blobs carry a u32
//! length prefix and no terminator; lists and maps a u32 count; tuples
//! nothing (arity is fixed by the signature); dynamics a nested signature
//! string; object references a (service, object, metaobject?) triple.
//!
//! ## Modules Overview
//!
//! - [`signature`] - Signature grammar (start here)
//! - [`types`] - Type descriptors and the registry
//! - [`value`] - Type-erased values and conversion
//! - [`codec`] - Binary wire codec
//! - [`object`] - Generic object model and dispatch
//! - [`future`] - Promise/Future pair
//! - [`exec`] - Execution contexts for queued dispatch

/// Binary wire codec driven by signatures.
pub mod codec;
/// Crate-wide error types.
pub mod error;
/// Execution contexts for the Queued threading model.
pub mod exec;
/// Promise/Future pair for asynchronous call results.
pub mod future;
/// Generic objects: methods, signals, properties, dispatch.
pub mod object;
/// Signature grammar: parse, render, iterate, convertibility.
pub mod signature;
/// Type descriptors, registry and the `Reflect` trait.
pub mod types;
/// Type-erased values.
pub mod value;

pub use codec::{decode, encode, BufReader, Buffer, CodecError, ObjectReference, ObjectTranscoder};
pub use error::{CallError, CallErrorKind, Error, Result};
pub use exec::{ExecutionContext, SerialContext, ThreadingModel};
pub use future::{Future, FutureState, Promise};
pub use object::{
    AnyObject, CallOptions, GenericObject, Link, MetaMethod, MetaObject, MetaProperty, MetaSignal,
    ObjectBuilder, ObjectError,
};
pub use signature::{Kind, MethodSignature, Signature, SignatureError};
pub use types::{Reflect, TypeError, TypeInfo, TypeKind, TypeRegistry};
pub use value::{NumericMode, Value, ValueError};
