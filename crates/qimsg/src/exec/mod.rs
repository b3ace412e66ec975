// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Execution contexts for the Queued threading model.
//!
//! The dispatcher resolves a per-call threading model with hard precedence
//! method > caller override > object default; `Auto` defers down that chain
//! and bottoms out at `Direct`. Queued calls are handed to an
//! [`ExecutionContext`]; [`SerialContext`] runs them one at a time on a
//! single owned worker thread, which is what object-wide serialization
//! means.

use crossbeam::channel::{unbounded, Sender};
use parking_lot::Mutex;
use std::thread::JoinHandle;

/// Where a call executes relative to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadingModel {
    /// Run inline on the calling thread.
    Direct,
    /// Post to an execution context and run later.
    Queued,
    /// Defer to the next level of the precedence chain.
    #[default]
    Auto,
}

/// Minimal execution abstraction the dispatcher posts deferred work to.
pub trait ExecutionContext: Send + Sync {
    /// Enqueue a task for later execution.
    fn post(&self, task: Box<dyn FnOnce() + Send + 'static>);
}

enum Message {
    Task(Box<dyn FnOnce() + Send + 'static>),
    Shutdown,
}

/// One worker thread draining a task queue in FIFO order.
///
/// Tasks posted here run strictly one at a time. A panicking task takes the
/// worker down; panics are registration-time bugs, not wire conditions.
pub struct SerialContext {
    tx: Sender<Message>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SerialContext {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<Message>();
        let worker = std::thread::Builder::new()
            .name("qimsg-serial".to_string())
            .spawn(move || {
                while let Ok(message) = rx.recv() {
                    match message {
                        Message::Task(task) => task(),
                        Message::Shutdown => break,
                    }
                }
            })
            .expect("spawn serial worker");
        Self {
            tx,
            worker: Mutex::new(Some(worker)),
        }
    }
}

impl ExecutionContext for SerialContext {
    fn post(&self, task: Box<dyn FnOnce() + Send + 'static>) {
        if self.tx.send(Message::Task(task)).is_err() {
            log::warn!("serial context: task posted after shutdown, dropped");
        }
    }
}

impl Default for SerialContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SerialContext {
    fn drop(&mut self) {
        let _ = self.tx.send(Message::Shutdown);
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}
