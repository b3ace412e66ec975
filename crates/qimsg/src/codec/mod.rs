// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary wire codec driven by signatures.
//!
//! The encoder walks a value and a target signature in lock-step and emits
//! a little-endian, length-prefixed byte stream; the decoder replays the
//! same walk over received bytes. Dynamic tokens carry a nested signature
//! so heterogeneous values cross the wire self-describingly; object
//! reference tokens delegate to a caller-supplied [`ObjectTranscoder`].
//!
//! # Example
//!
//! ```rust
//! use qimsg::codec::{decode, encode, Buffer};
//! use qimsg::signature::Signature;
//! use qimsg::value::Value;
//!
//! let sig = Signature::parse("(is)").unwrap();
//! let value = Value::Tuple(vec![Value::Int32(7), Value::from("seven")]);
//!
//! let mut buf = Buffer::new();
//! encode(&mut buf, &value, &sig).unwrap();
//! let decoded = decode(&mut buf.reader(), &sig).unwrap();
//! assert_eq!(decoded, value);
//! ```

mod buffer;
mod decode;
mod encode;
mod reference;

pub use buffer::{BufReader, Buffer};
pub use decode::{decode, Decoder};
pub use encode::{encode, Encoder};
pub use reference::{ObjectReference, ObjectTranscoder};

use crate::signature::{Kind, SignatureError};
use crate::value::ValueError;
use std::fmt;

/// Errors for wire codec operations.
#[derive(Debug)]
pub enum CodecError {
    /// Fewer bytes remain than the current token requires.
    Truncated { need: usize, have: usize },
    /// A signature embedded in the stream (or supplied) does not parse.
    Signature(SignatureError),
    /// The value cannot satisfy the target signature.
    Value(ValueError),
    /// A length-prefixed string holds invalid UTF-8.
    Utf8(std::string::FromUtf8Error),
    /// The token parses but has no wire representation.
    UnsupportedToken(Kind),
    /// An object reference token was reached with no transcoder supplied.
    MissingTranscoder,
    /// A length does not fit the u32 prefix.
    Oversize { len: usize },
    /// Any other structural mismatch while encoding.
    Encode(String),
    /// Any other structural mismatch while decoding.
    Decode(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { need, have } => {
                write!(f, "Truncated input: need {} bytes, have {}", need, have)
            }
            Self::Signature(e) => write!(f, "Malformed signature: {}", e),
            Self::Value(e) => write!(f, "Value does not fit signature: {}", e),
            Self::Utf8(e) => write!(f, "UTF-8 error: {}", e),
            Self::UnsupportedToken(kind) => {
                write!(f, "Token {:?} has no wire representation", kind)
            }
            Self::MissingTranscoder => {
                write!(f, "Object reference reached with no transcoder supplied")
            }
            Self::Oversize { len } => {
                write!(f, "Length {} exceeds the u32 prefix range", len)
            }
            Self::Encode(msg) => write!(f, "Encode error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signature(e) => Some(e),
            Self::Value(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SignatureError> for CodecError {
    fn from(e: SignatureError) -> Self {
        Self::Signature(e)
    }
}

impl From<ValueError> for CodecError {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}
