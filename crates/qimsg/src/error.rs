// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-wide error types.
//!
//! Every module reports its own error enum; this module adds the umbrella
//! [`Error`] for callers that mix layers, and [`CallError`], the failure
//! payload carried by call futures. A `CallError` always has a
//! human-readable message (the channel older peers understand) plus a
//! structured kind.

use crate::codec::CodecError;
use crate::object::ObjectError;
use crate::signature::SignatureError;
use crate::types::TypeError;
use crate::value::ValueError;
use std::fmt;

/// Result alias for the umbrella error.
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella over all module errors.
#[derive(Debug)]
pub enum Error {
    Signature(SignatureError),
    Type(TypeError),
    Value(ValueError),
    Codec(CodecError),
    Object(ObjectError),
    Call(CallError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signature(e) => write!(f, "{}", e),
            Self::Type(e) => write!(f, "{}", e),
            Self::Value(e) => write!(f, "{}", e),
            Self::Codec(e) => write!(f, "{}", e),
            Self::Object(e) => write!(f, "{}", e),
            Self::Call(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signature(e) => Some(e),
            Self::Type(e) => Some(e),
            Self::Value(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Object(e) => Some(e),
            Self::Call(e) => Some(e),
        }
    }
}

impl From<SignatureError> for Error {
    fn from(e: SignatureError) -> Self {
        Self::Signature(e)
    }
}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Self {
        Self::Type(e)
    }
}

impl From<ValueError> for Error {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<ObjectError> for Error {
    fn from(e: ObjectError) -> Self {
        Self::Object(e)
    }
}

impl From<CallError> for Error {
    fn from(e: CallError) -> Self {
        Self::Call(e)
    }
}

/// Structured failure categories for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallErrorKind {
    /// Method id or name not found on the object.
    NoSuchMethod,
    /// Arguments could not be decoded or converted.
    InvalidArgument,
    /// The call observed a cancellation request.
    Canceled,
    /// Waiting on the future timed out.
    Timeout,
    /// Failure inside the invoked thunk or the result path.
    Internal,
    /// Error string received from a remote peer.
    Remote,
}

/// Failure payload of a call future: structured kind plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    kind: CallErrorKind,
    message: String,
}

impl CallError {
    /// Build from a kind and message.
    pub fn new(kind: CallErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unknown method id/name.
    pub fn no_such_method(what: impl fmt::Display) -> Self {
        Self::new(
            CallErrorKind::NoSuchMethod,
            format!("no such method: {}", what),
        )
    }

    /// Bad or unconvertible arguments.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::InvalidArgument, message)
    }

    /// Cooperatively cancelled call.
    pub fn canceled() -> Self {
        Self::new(CallErrorKind::Canceled, "call canceled")
    }

    /// Wait deadline expired.
    pub fn timeout() -> Self {
        Self::new(CallErrorKind::Timeout, "wait timed out")
    }

    /// Internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::Internal, message)
    }

    /// Message-channel error from an older peer (no structured kind).
    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::Remote, message)
    }

    /// Structured kind.
    pub fn kind(&self) -> CallErrorKind {
        self.kind
    }

    /// Human-readable message (the wire-compatible error channel).
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CallError {}

impl From<ValueError> for CallError {
    fn from(e: ValueError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

impl From<CodecError> for CallError {
    fn from(e: CodecError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}
