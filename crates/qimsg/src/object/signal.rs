// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signal subscriber bookkeeping.
//!
//! The subscriber list is the only object state mutated after the build
//! phase, so it carries its own lock; dispatch-table lookups stay
//! lock-free. Subscribers are notified in registration order for any
//! single emission.

use crate::signature::Signature;
use crate::value::Value;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Subscriber callback invoked with the emission's arguments.
pub type SignalCallback = dyn Fn(&[Value]) + Send + Sync;

/// Subscription handle returned by `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub(crate) signal: u32,
    pub(crate) seq: u64,
}

impl Link {
    /// Id of the signal this link subscribes to.
    pub fn signal_id(&self) -> u32 {
        self.signal
    }
}

pub(crate) struct SignalState {
    pub(crate) arguments: Signature,
    subscribers: Mutex<Vec<(u64, Arc<SignalCallback>)>>,
    next: AtomicU64,
}

impl SignalState {
    pub(crate) fn new(arguments: Signature) -> Self {
        Self {
            arguments,
            subscribers: Mutex::new(Vec::new()),
            next: AtomicU64::new(1),
        }
    }

    pub(crate) fn connect(&self, callback: Box<SignalCallback>) -> u64 {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((seq, Arc::from(callback)));
        seq
    }

    /// Idempotent: false for an unknown or already-removed link.
    pub(crate) fn disconnect(&self, seq: u64) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != seq);
        subscribers.len() < before
    }

    /// Notify all current subscribers in registration order. The list is
    /// snapshotted first so callbacks run outside the lock.
    pub(crate) fn emit(&self, args: &[Value]) {
        let snapshot: Vec<Arc<SignalCallback>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in snapshot {
            callback(args);
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
