// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The generic object: dispatch of calls, signals and properties.
//!
//! After the build phase the method map is read-only, so dispatch-time
//! lookups take no lock. The per-call threading model resolves with hard
//! precedence method > caller override > object default; `Auto` defers
//! down the chain and bottoms out at Direct.

use crate::codec::{decode, encode, BufReader, Buffer};
use crate::error::{CallError, CallErrorKind};
use crate::exec::{ExecutionContext, ThreadingModel};
use crate::future::{Future, Promise};
use crate::object::callable::{CallContext, Method};
use crate::object::property::PropertyEntry;
use crate::object::signal::{Link, SignalState};
use crate::object::{MetaObject, ObjectError};
use crate::signature::{Kind, Signature, Token};
use crate::types::TypeInfo;
use crate::value::{NumericMode, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a generic object.
pub type AnyObject = Arc<GenericObject>;

/// Caller-side options for one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    /// Requested threading model; overridden by the method's own model.
    pub model: ThreadingModel,
}

/// An RPC-addressable bundle of methods, signals and properties.
pub struct GenericObject {
    meta: Arc<MetaObject>,
    methods: HashMap<u32, Arc<Method>>,
    signals: HashMap<u32, Arc<SignalState>>,
    properties: HashMap<u32, PropertyEntry>,
    default_model: ThreadingModel,
    context: Option<Arc<dyn ExecutionContext>>,
}

impl GenericObject {
    pub(crate) fn assemble(
        meta: Arc<MetaObject>,
        methods: HashMap<u32, Arc<Method>>,
        signals: HashMap<u32, Arc<SignalState>>,
        properties: HashMap<u32, PropertyEntry>,
        default_model: ThreadingModel,
        context: Option<Arc<dyn ExecutionContext>>,
    ) -> Self {
        Self {
            meta,
            methods,
            signals,
            properties,
            default_model,
            context,
        }
    }

    /// Introspection snapshot, always consistent with the dispatch tables.
    pub fn meta_object(&self) -> Arc<MetaObject> {
        self.meta.clone()
    }

    /// Multi-line listing of every member (introspection tooling).
    pub fn describe(&self) -> String {
        self.meta.describe()
    }

    /// Invoke a method by id with already-erased arguments.
    pub fn call(&self, method: u32, args: Vec<Value>) -> Future<Value> {
        self.call_with(method, args, CallOptions::default())
    }

    /// Invoke with caller options. Returns immediately; under the Direct
    /// model the execution happens inline within this call stack.
    pub fn call_with(&self, method: u32, args: Vec<Value>, options: CallOptions) -> Future<Value> {
        let Some(m) = self.methods.get(&method) else {
            log::debug!("call: no such method id {}", method);
            return Future::from_error(CallError::no_such_method(method));
        };
        let args = match convert_args(args, &m.meta.parameters) {
            Ok(args) => args,
            Err(e) => return Future::from_error(e),
        };
        let model = self.resolve_model(m.model, options.model);
        let promise = Promise::new();
        let future = promise.future();
        let m = m.clone();
        self.dispatch(
            model,
            Box::new(move || run_thunk(&m, args, &promise)),
        );
        future
    }

    /// Invoke by name; overloads resolve by the arguments' signature,
    /// exact parameter match first, then convertibility.
    pub fn call_method(&self, name: &str, args: Vec<Value>) -> Future<Value> {
        self.call_method_with(name, args, CallOptions::default())
    }

    /// Named invocation with caller options.
    pub fn call_method_with(
        &self,
        name: &str,
        args: Vec<Value>,
        options: CallOptions,
    ) -> Future<Value> {
        let provided =
            Signature::from_tokens(vec![Token::tuple(args.iter().map(Value::token).collect())]);
        match self.meta.find_method(name, &provided) {
            Some(m) => self.call_with(m.id, args, options),
            None => {
                log::debug!("call: no method '{}' accepts {}", name, provided);
                Future::from_error(CallError::no_such_method(name))
            }
        }
    }

    /// Transport-facing dispatch boundary: decode the payload per the
    /// method's parameter signature, invoke, encode the result per its
    /// return signature.
    pub fn call_encoded(&self, method: u32, payload: &[u8]) -> Future<Vec<u8>> {
        let Some(m) = self.methods.get(&method) else {
            log::debug!("call_encoded: no such method id {}", method);
            return Future::from_error(CallError::no_such_method(method));
        };
        let mut reader = BufReader::new(payload);
        let decoded = match decode(&mut reader, &m.meta.parameters) {
            Ok(value) => value,
            Err(e) => return Future::from_error(CallError::invalid_argument(e.to_string())),
        };
        let args = match decoded {
            Value::Tuple(items) => items,
            Value::Void => Vec::new(),
            other => vec![other],
        };
        let model = self.resolve_model(m.model, ThreadingModel::Auto);
        let promise = Promise::new();
        let future = promise.future();
        let m = m.clone();
        self.dispatch(
            model,
            Box::new(move || {
                if !promise.set_running() {
                    return;
                }
                let context = CallContext::new(promise.cancel_flag());
                match (m.thunk)(&context, args) {
                    Ok(value) => {
                        let mut buf = Buffer::new();
                        match encode(&mut buf, &value, &m.meta.returns) {
                            Ok(()) => promise.set_value(buf.into_vec()),
                            Err(e) => promise.set_error(CallError::internal(format!(
                                "result does not fit {}: {}",
                                m.meta.returns, e
                            ))),
                        }
                    }
                    Err(e) if e.kind() == CallErrorKind::Canceled => promise.set_canceled(),
                    Err(e) => promise.set_error(e),
                }
            }),
        );
        future
    }

    /// Subscribe to a signal. Subscribers are notified in registration
    /// order for any single emission.
    pub fn connect<F>(&self, signal: u32, callback: F) -> Result<Link, ObjectError>
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        let state = self
            .signals
            .get(&signal)
            .ok_or(ObjectError::NoSuchSignal(signal))?;
        let seq = state.connect(Box::new(callback));
        Ok(Link { signal, seq })
    }

    /// Remove a subscription; false for an unknown or stale link.
    pub fn disconnect(&self, link: Link) -> bool {
        self.signals
            .get(&link.signal)
            .map(|state| state.disconnect(link.seq))
            .unwrap_or(false)
    }

    /// Emit a signal. Arguments are checked and converted to the declared
    /// shapes; a single-threaded object serializes delivery through its
    /// context like any queued call.
    pub fn post(&self, signal: u32, args: Vec<Value>) -> Result<(), ObjectError> {
        let state = self
            .signals
            .get(&signal)
            .ok_or(ObjectError::NoSuchSignal(signal))?;
        let provided = Signature::from_tokens(args.iter().map(Value::token).collect());
        if !provided.is_convertible_to(&state.arguments) {
            return Err(ObjectError::IncompatibleArguments {
                expected: state.arguments.to_string(),
                got: provided.to_string(),
            });
        }
        let mut converted = Vec::with_capacity(args.len());
        for (arg, token) in args.iter().zip(state.arguments.iter()) {
            let target = TypeInfo::from_token(token);
            let (value, _) = arg.convert_to(&target, NumericMode::Lenient).map_err(|e| {
                ObjectError::IncompatibleArguments {
                    expected: state.arguments.to_string(),
                    got: e.to_string(),
                }
            })?;
            converted.push(value);
        }
        let state = state.clone();
        let deliver: Box<dyn FnOnce() + Send> = Box::new(move || state.emit(&converted));
        match (self.default_model, &self.context) {
            (ThreadingModel::Queued, Some(context)) => context.post(deliver),
            _ => deliver(),
        }
        Ok(())
    }

    /// Current value of a property.
    pub fn property(&self, id: u32) -> Result<Value, ObjectError> {
        self.properties
            .get(&id)
            .map(|entry| entry.state.get())
            .ok_or(ObjectError::NoSuchProperty(id))
    }

    /// Write a property; emits exactly one change notification carrying
    /// the stored value.
    pub fn set_property(&self, id: u32, value: Value) -> Result<(), ObjectError> {
        let entry = self
            .properties
            .get(&id)
            .ok_or(ObjectError::NoSuchProperty(id))?;
        let stored = entry.state.store(value).map_err(|e| {
            ObjectError::IncompatibleArguments {
                expected: entry.state.signature().to_string(),
                got: e.to_string(),
            }
        })?;
        if let Some(signal) = self.signals.get(&entry.signal) {
            signal.emit(&[stored]);
        }
        Ok(())
    }

    fn resolve_model(&self, method: ThreadingModel, caller: ThreadingModel) -> ThreadingModel {
        if method != ThreadingModel::Auto {
            return method;
        }
        if caller != ThreadingModel::Auto {
            return caller;
        }
        if self.default_model != ThreadingModel::Auto {
            return self.default_model;
        }
        ThreadingModel::Direct
    }

    fn dispatch(&self, model: ThreadingModel, task: Box<dyn FnOnce() + Send + 'static>) {
        match model {
            ThreadingModel::Queued => match &self.context {
                Some(context) => context.post(task),
                None => {
                    log::warn!("queued call with no execution context, running inline");
                    task();
                }
            },
            _ => task(),
        }
    }
}

fn run_thunk(method: &Method, args: Vec<Value>, promise: &Promise<Value>) {
    if !promise.set_running() {
        // Cancellation was requested before execution started.
        return;
    }
    let context = CallContext::new(promise.cancel_flag());
    match (method.thunk)(&context, args) {
        Ok(value) => promise.set_value(value),
        Err(e) if e.kind() == CallErrorKind::Canceled => promise.set_canceled(),
        Err(e) => promise.set_error(e),
    }
}

/// Check the provided arguments against the declared parameter signature
/// and convert them to the declared shapes.
fn convert_args(args: Vec<Value>, parameters: &Signature) -> Result<Vec<Value>, CallError> {
    let canonical = if parameters.len() == 1
        && parameters.first().map(Token::kind) == Some(Kind::Tuple)
    {
        parameters.clone()
    } else {
        Signature::from_tokens(vec![Token::tuple(parameters.iter().cloned().collect())])
    };
    let provided =
        Signature::from_tokens(vec![Token::tuple(args.iter().map(Value::token).collect())]);
    if !provided.is_convertible_to(&canonical) {
        return Err(CallError::invalid_argument(format!(
            "arguments {} do not convert to {}",
            provided, canonical
        )));
    }
    let target = TypeInfo::from_token(canonical.first().expect("tuple token"));
    let (converted, _) = Value::Tuple(args)
        .convert_to(&target, NumericMode::Lenient)
        .map_err(|e| CallError::invalid_argument(e.to_string()))?;
    match converted {
        Value::Tuple(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

impl fmt::Debug for GenericObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericObject")
            .field("description", &self.meta.description())
            .field("methods", &self.methods.len())
            .field("signals", &self.signals.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}
