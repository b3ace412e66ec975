// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signature grammar for describing value shapes.
//!
//! A signature is a compact ASCII string: `"i"` an int32, `"[s]"` a list of
//! strings, `"{si}"` a string-to-int32 map, `"(is)"` a two-element tuple,
//! `"m"` a self-describing dynamic value, `"o"` an object reference. The
//! parsed form drives the wire codec and the overload resolution of the
//! object model.
//!
//! # Example
//!
//! ```rust
//! use qimsg::signature::{Kind, Signature};
//!
//! let sig = Signature::parse("{s[i]}").unwrap();
//! assert_eq!(sig.len(), 1);
//! let map = sig.first().unwrap();
//! assert_eq!(map.kind(), Kind::Map);
//! assert_eq!(map.children().token(1).unwrap().kind(), Kind::List);
//! ```

mod compat;
mod method;
mod parser;

pub use method::MethodSignature;
pub use parser::{Kind, Signature, SignatureError, Token};
