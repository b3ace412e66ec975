// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property storage.
//!
//! A property owns one value behind a lock; writes convert the incoming
//! value to the declared signature before storing, so readers always see
//! the exact declared shape.

use crate::signature::Signature;
use crate::types::TypeInfo;
use crate::value::{NumericMode, Value, ValueError};
use parking_lot::Mutex;

/// Property storage plus the id of its change signal.
pub(crate) struct PropertyEntry {
    pub(crate) state: std::sync::Arc<PropertyState>,
    pub(crate) signal: u32,
}

pub(crate) struct PropertyState {
    signature: Signature,
    value: Mutex<Value>,
}

impl PropertyState {
    pub(crate) fn new(signature: Signature, initial: Value) -> Self {
        Self {
            signature,
            value: Mutex::new(initial),
        }
    }

    pub(crate) fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn get(&self) -> Value {
        self.value.lock().clone()
    }

    /// Convert to the declared shape and store; returns the stored value
    /// for change notification.
    pub(crate) fn store(&self, value: Value) -> Result<Value, ValueError> {
        let target = TypeInfo::from_token(self.signature.first().expect("single-token signature"));
        let (converted, _) = value.convert_to(&target, NumericMode::Lenient)?;
        *self.value.lock() = converted.clone();
        Ok(converted)
    }
}
