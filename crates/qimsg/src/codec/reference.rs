// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object references crossing the wire.
//!
//! The codec has no opinion on how live objects map to wire identities;
//! that strategy belongs to whoever owns the connection. Encoding an
//! object token asks the transcoder for a serializable reference; decoding
//! asks it to turn a reference back into a local proxy or a direct object.

use super::CodecError;
use crate::object::{AnyObject, MetaObject};

/// Serializable identity of a remote-visible object: service id, object id
/// and optionally the embedded introspection snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectReference {
    pub service: u32,
    pub object: u32,
    pub meta: Option<MetaObject>,
}

impl ObjectReference {
    /// Reference without an embedded metaobject.
    pub fn new(service: u32, object: u32) -> Self {
        Self {
            service,
            object,
            meta: None,
        }
    }

    /// Attach the introspection snapshot.
    pub fn with_meta(mut self, meta: MetaObject) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Caller-supplied strategy for object values crossing the wire.
pub trait ObjectTranscoder {
    /// Produce the wire identity of a live object.
    fn encode_object(&mut self, object: &AnyObject) -> Result<ObjectReference, CodecError>;

    /// Reconstruct a local object (or proxy) from a wire identity.
    fn decode_object(&mut self, reference: ObjectReference) -> Result<AnyObject, CodecError>;
}
