// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Promise/Future pair for asynchronous call results.
//!
//! A call moves through `Pending -> Running -> {Completed, Failed,
//! Canceled}`; terminal states never change. Waiting is an explicit,
//! separate blocking operation with a caller-chosen timeout (zero means
//! poll-only). Cancellation is cooperative: [`Future::cancel`] raises a
//! flag the running thunk polls; it never preempts.

use crate::error::CallError;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Observable state of a future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

enum Inner<T> {
    Pending,
    Running,
    Completed(T),
    Failed(CallError),
    Canceled,
}

impl<T> Inner<T> {
    fn state(&self) -> FutureState {
        match self {
            Self::Pending => FutureState::Pending,
            Self::Running => FutureState::Running,
            Self::Completed(_) => FutureState::Completed,
            Self::Failed(_) => FutureState::Failed,
            Self::Canceled => FutureState::Canceled,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed(_) | Self::Failed(_) | Self::Canceled
        )
    }
}

struct Shared<T> {
    state: Mutex<Inner<T>>,
    cond: Condvar,
    cancel: Arc<AtomicBool>,
}

/// Producer side of an asynchronous result.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

/// Consumer side of an asynchronous result.
pub struct Future<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Fresh promise in the Pending state.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(Inner::Pending),
                cond: Condvar::new(),
                cancel: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    /// Consumer handle observing this promise.
    pub fn future(&self) -> Future<T> {
        Future {
            shared: self.shared.clone(),
        }
    }

    /// Transition Pending -> Running. Returns false when the call should
    /// not run: already running, terminal, or cancellation was requested
    /// before execution started (in which case the state becomes Canceled).
    pub fn set_running(&self) -> bool {
        let mut state = self.shared.state.lock();
        if !matches!(*state, Inner::Pending) {
            return false;
        }
        if self.shared.cancel.load(Ordering::Acquire) {
            *state = Inner::Canceled;
            drop(state);
            self.shared.cond.notify_all();
            return false;
        }
        *state = Inner::Running;
        true
    }

    /// Resolve with a value. No-op on an already-terminal promise.
    pub fn set_value(&self, value: T) {
        self.finish(Inner::Completed(value));
    }

    /// Resolve with an error. No-op on an already-terminal promise.
    pub fn set_error(&self, error: CallError) {
        self.finish(Inner::Failed(error));
    }

    /// Resolve as cancelled. No-op on an already-terminal promise.
    pub fn set_canceled(&self) {
        self.finish(Inner::Canceled);
    }

    /// True once the consumer requested cancellation.
    pub fn cancel_requested(&self) -> bool {
        self.shared.cancel.load(Ordering::Acquire)
    }

    pub(crate) fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.shared.cancel.clone()
    }

    fn finish(&self, terminal: Inner<T>) {
        let mut state = self.shared.state.lock();
        if state.is_terminal() {
            return;
        }
        *state = terminal;
        drop(state);
        self.shared.cond.notify_all();
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Future<T> {
    /// Already-completed future.
    pub fn from_value(value: T) -> Self {
        let promise = Promise::new();
        promise.set_value(value);
        promise.future()
    }

    /// Synchronously-failed future.
    pub fn from_error(error: CallError) -> Self {
        let promise = Promise::new();
        promise.set_error(error);
        promise.future()
    }

    /// Current state snapshot.
    pub fn state(&self) -> FutureState {
        self.shared.state.lock().state()
    }

    /// True once the future reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.shared.state.lock().is_terminal()
    }

    /// Block until terminal or the timeout expires. A zero timeout is a
    /// pure poll. Returns true when the future is terminal on return.
    pub fn wait(&self, timeout: Duration) -> bool {
        let mut state = self.shared.state.lock();
        if state.is_terminal() {
            return true;
        }
        if timeout.is_zero() {
            return false;
        }
        let deadline = Instant::now() + timeout;
        while !state.is_terminal() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let result = self.shared.cond.wait_for(&mut state, deadline - now);
            if result.timed_out() && !state.is_terminal() {
                return false;
            }
        }
        true
    }

    /// Request cooperative cancellation. Terminal futures ignore it.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::Release);
    }

    /// True once cancellation has been requested.
    pub fn cancel_requested(&self) -> bool {
        self.shared.cancel.load(Ordering::Acquire)
    }

    /// The failure payload, if the future failed.
    pub fn error(&self) -> Option<CallError> {
        match &*self.shared.state.lock() {
            Inner::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }
}

impl<T: Clone> Future<T> {
    /// The completed value, if any.
    pub fn value(&self) -> Option<T> {
        match &*self.shared.state.lock() {
            Inner::Completed(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Wait up to `timeout`, then report the outcome: the value, the
    /// failure, `Canceled`, or `Timeout` when the deadline expired first.
    pub fn result(&self, timeout: Duration) -> Result<T, CallError> {
        if !self.wait(timeout) {
            return Err(CallError::timeout());
        }
        match &*self.shared.state.lock() {
            Inner::Completed(v) => Ok(v.clone()),
            Inner::Failed(e) => Err(e.clone()),
            Inner::Canceled => Err(CallError::canceled()),
            _ => unreachable!("wait returned true on a non-terminal future"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn completes_with_value() {
        let promise = Promise::new();
        let future = promise.future();
        assert_eq!(future.state(), FutureState::Pending);

        assert!(promise.set_running());
        assert_eq!(future.state(), FutureState::Running);

        promise.set_value(42);
        assert_eq!(future.state(), FutureState::Completed);
        assert_eq!(future.value(), Some(42));
        assert_eq!(future.result(Duration::ZERO).unwrap(), 42);
    }

    #[test]
    fn terminal_state_never_changes() {
        let promise = Promise::new();
        let future = promise.future();
        promise.set_value(1);
        promise.set_error(CallError::internal("late"));
        promise.set_canceled();
        assert_eq!(future.state(), FutureState::Completed);
        assert_eq!(future.value(), Some(1));
    }

    #[test]
    fn cancel_after_completion_is_a_noop() {
        let promise = Promise::new();
        let future = promise.future();
        promise.set_value(7);
        future.cancel();
        assert_eq!(future.state(), FutureState::Completed);
        assert_eq!(future.value(), Some(7));
    }

    #[test]
    fn cancel_before_running_is_observed() {
        let promise = Promise::<i32>::new();
        let future = promise.future();
        future.cancel();
        assert!(!promise.set_running());
        assert_eq!(future.state(), FutureState::Canceled);
        assert!(matches!(future.result(Duration::ZERO), Err(e) if e.kind() == crate::error::CallErrorKind::Canceled));
    }

    #[test]
    fn zero_timeout_wait_polls_only() {
        let promise = Promise::<i32>::new();
        let future = promise.future();
        let start = Instant::now();
        assert!(!future.wait(Duration::ZERO));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn wait_times_out() {
        let promise = Promise::<i32>::new();
        let future = promise.future();
        assert!(!future.wait(Duration::from_millis(20)));
        let err = future.result(Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.kind(), crate::error::CallErrorKind::Timeout);
        drop(promise);
    }

    #[test]
    fn wakes_a_blocked_waiter() {
        let promise = Promise::new();
        let future = promise.future();
        let handle = thread::spawn(move || future.result(Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(10));
        promise.set_value("done".to_string());
        assert_eq!(handle.join().expect("join").unwrap(), "done");
    }

    #[test]
    fn failed_future_carries_kind_and_message() {
        let future = Future::<i32>::from_error(CallError::remote("remote says no"));
        assert_eq!(future.state(), FutureState::Failed);
        let err = future.error().expect("failed");
        assert_eq!(err.kind(), crate::error::CallErrorKind::Remote);
        assert_eq!(err.message(), "remote says no");
    }
}
