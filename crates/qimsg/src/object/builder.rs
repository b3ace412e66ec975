// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration-phase builder for generic objects.
//!
//! Registration is single-threaded by contract: the builder owns all maps
//! until `build`, after which the dispatch tables are immutable and
//! dispatch-time lookups need no locking. Ids below [`USER_ID_BASE`] are
//! reserved for protocol built-ins; user registrations allocate upward
//! from there and, once assigned, ids are never reassigned.

use crate::error::CallError;
use crate::exec::{ExecutionContext, SerialContext, ThreadingModel};
use crate::object::callable::{IntoMethod, Method, MethodThunk};
use crate::object::property::{PropertyEntry, PropertyState};
use crate::object::signal::SignalState;
use crate::object::{
    AnyObject, GenericObject, MetaMethod, MetaObject, MetaProperty, MetaSignal, ObjectError,
};
use crate::signature::{MethodSignature, Signature};
use crate::types::{Reflect, TypeInfo, TypeRegistry};
use crate::value::{NumericMode, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// First id available to user registrations; lower ids belong to the
/// protocol's built-in object slots.
pub const USER_ID_BASE: u32 = 100;

/// Builder collecting methods, signals and properties for one object.
pub struct ObjectBuilder {
    description: String,
    next_id: u32,
    methods: BTreeMap<u32, Arc<Method>>,
    signals: BTreeMap<u32, Arc<SignalState>>,
    signal_meta: BTreeMap<u32, MetaSignal>,
    properties: BTreeMap<u32, PropertyEntry>,
    property_meta: BTreeMap<u32, MetaProperty>,
    default_model: ThreadingModel,
    context: Option<Arc<dyn ExecutionContext>>,
}

impl ObjectBuilder {
    /// Start building an object with a free-form description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            next_id: USER_ID_BASE,
            methods: BTreeMap::new(),
            signals: BTreeMap::new(),
            signal_meta: BTreeMap::new(),
            properties: BTreeMap::new(),
            property_meta: BTreeMap::new(),
            default_model: ThreadingModel::Auto,
            context: None,
        }
    }

    /// Object-level default threading model (lowest precedence).
    pub fn with_threading(mut self, model: ThreadingModel) -> Self {
        self.default_model = model;
        self
    }

    /// Execution context receiving this object's Queued calls.
    pub fn with_context(mut self, context: Arc<dyn ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Serialize everything through one owned worker thread: all Queued
    /// calls and signal delivery happen one at a time.
    pub fn single_threaded(mut self) -> Self {
        self.default_model = ThreadingModel::Queued;
        self.context = Some(Arc::new(SerialContext::new()));
        self
    }

    /// Register a typed closure; both signatures derive from its types.
    pub fn method<Args, F>(&mut self, name: &str, f: F) -> Result<u32, ObjectError>
    where
        F: IntoMethod<Args>,
    {
        self.method_with_model(name, f, ThreadingModel::Auto)
    }

    /// Typed registration with an explicit threading model.
    pub fn method_with_model<Args, F>(
        &mut self,
        name: &str,
        f: F,
        model: ThreadingModel,
    ) -> Result<u32, ObjectError>
    where
        F: IntoMethod<Args>,
    {
        self.advertise_method(
            name,
            F::parameter_signature(),
            F::return_signature(),
            f.into_thunk(),
            model,
        )
    }

    /// Register an erased thunk under explicit signatures.
    ///
    /// The same name may be registered again with a different parameter
    /// signature (an overload); the same name+parameters combination is
    /// `DuplicateName`.
    pub fn advertise_method(
        &mut self,
        name: &str,
        parameters: Signature,
        returns: Signature,
        thunk: MethodThunk,
        model: ThreadingModel,
    ) -> Result<u32, ObjectError> {
        if self
            .methods
            .values()
            .any(|m| m.meta.name == name && m.meta.parameters.as_str() == parameters.as_str())
        {
            return Err(ObjectError::DuplicateName {
                name: name.to_string(),
                parameters: parameters.to_string(),
            });
        }
        let id = self.alloc_id();
        self.insert_method(id, name, parameters, returns, thunk, model);
        Ok(id)
    }

    /// Erased registration under a caller-chosen id. Skips the duplicate
    /// name check; only the id itself must be free and non-reserved.
    pub fn advertise_method_with_id(
        &mut self,
        id: u32,
        name: &str,
        parameters: Signature,
        returns: Signature,
        thunk: MethodThunk,
        model: ThreadingModel,
    ) -> Result<u32, ObjectError> {
        if id < USER_ID_BASE {
            return Err(ObjectError::ReservedId(id));
        }
        if self.methods.contains_key(&id) {
            return Err(ObjectError::IdInUse(id));
        }
        self.next_id = self.next_id.max(id + 1);
        self.insert_method(id, name, parameters, returns, thunk, model);
        Ok(id)
    }

    /// Register from a full method signature string such as
    /// `"add::i(ii)"` (legacy `"add::i:ii"` accepted).
    pub fn advertise_method_parsed(
        &mut self,
        full: &str,
        thunk: MethodThunk,
        model: ThreadingModel,
    ) -> Result<u32, crate::error::Error> {
        let parsed = MethodSignature::parse(full)?;
        let id = self.advertise_method(
            parsed.name(),
            parsed.parameters().clone(),
            parsed.returns().clone(),
            thunk,
            model,
        )?;
        Ok(id)
    }

    /// Register a signal delivering `arguments` to subscribers.
    pub fn signal(&mut self, name: &str, arguments: Signature) -> Result<u32, ObjectError> {
        if self.signal_meta.values().any(|s| s.name == name) {
            return Err(ObjectError::DuplicateName {
                name: name.to_string(),
                parameters: arguments.to_string(),
            });
        }
        let id = self.alloc_id();
        self.insert_signal(id, name, arguments);
        Ok(id)
    }

    /// Register a typed property with its initial value.
    pub fn property<T: Reflect>(&mut self, name: &str, initial: T) -> Result<u32, ObjectError> {
        let signature = TypeRegistry::global().type_of::<T>().signature();
        self.property_with_signature(name, signature, initial.into_value())
    }

    /// Register a property under an explicit single-token signature.
    ///
    /// Synthesizes a getter and a setter (an overload pair sharing the
    /// property's name, distinguished by parameter signature) and a change
    /// signal emitted on every successful write.
    pub fn property_with_signature(
        &mut self,
        name: &str,
        signature: Signature,
        initial: Value,
    ) -> Result<u32, ObjectError> {
        if signature.len() != 1 {
            return Err(ObjectError::IncompatibleArguments {
                expected: "single-token signature".to_string(),
                got: signature.to_string(),
            });
        }
        if self.property_meta.values().any(|p| p.name == name) {
            return Err(ObjectError::DuplicateName {
                name: name.to_string(),
                parameters: signature.to_string(),
            });
        }
        let target = TypeInfo::from_token(signature.first().expect("single token"));
        let (stored, _) = initial.convert_to(&target, NumericMode::Lenient).map_err(|e| {
            ObjectError::IncompatibleArguments {
                expected: signature.to_string(),
                got: e.to_string(),
            }
        })?;

        let state = Arc::new(PropertyState::new(signature.clone(), stored));

        let id = self.alloc_id();
        let getter = self.alloc_id();
        let setter = self.alloc_id();
        let signal = self.alloc_id();

        let getter_state = state.clone();
        let getter_thunk: MethodThunk = Box::new(move |_context, args| {
            if !args.is_empty() {
                return Err(CallError::invalid_argument("getter takes no arguments"));
            }
            Ok(getter_state.get())
        });
        self.insert_method(
            getter,
            name,
            Signature::parse("()").expect("static signature"),
            signature.clone(),
            getter_thunk,
            ThreadingModel::Auto,
        );

        let signal_state = Arc::new(SignalState::new(signature.clone()));
        let setter_state = state.clone();
        let setter_signal = signal_state.clone();
        let setter_thunk: MethodThunk = Box::new(move |_context, mut args| {
            if args.len() != 1 {
                return Err(CallError::invalid_argument("setter takes one argument"));
            }
            let stored = setter_state
                .store(args.remove(0))
                .map_err(|e| CallError::invalid_argument(e.to_string()))?;
            setter_signal.emit(&[stored]);
            Ok(Value::Void)
        });
        let setter_params =
            Signature::parse(&format!("({})", signature.as_str())).expect("valid token");
        self.insert_method(
            setter,
            name,
            setter_params,
            Signature::parse("v").expect("static signature"),
            setter_thunk,
            ThreadingModel::Auto,
        );

        self.signals.insert(signal, signal_state);
        self.signal_meta.insert(
            signal,
            MetaSignal {
                id: signal,
                name: name.to_string(),
                arguments: signature.clone(),
            },
        );

        self.properties.insert(id, PropertyEntry { state, signal });
        self.property_meta.insert(
            id,
            MetaProperty {
                id,
                name: name.to_string(),
                signature,
                getter,
                setter,
                signal,
            },
        );
        log::debug!("object builder: property '{}' registered as id {}", name, id);
        Ok(id)
    }

    /// Close the registration phase and produce the immutable object.
    pub fn build(self) -> AnyObject {
        let method_meta: BTreeMap<u32, MetaMethod> = self
            .methods
            .iter()
            .map(|(id, m)| (*id, m.meta.clone()))
            .collect();
        let meta = MetaObject::new(
            self.description,
            method_meta,
            self.signal_meta,
            self.property_meta,
        );
        Arc::new(GenericObject::assemble(
            Arc::new(meta),
            self.methods.into_iter().collect(),
            self.signals.into_iter().collect(),
            self.properties.into_iter().collect(),
            self.default_model,
            self.context,
        ))
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_method(
        &mut self,
        id: u32,
        name: &str,
        parameters: Signature,
        returns: Signature,
        thunk: MethodThunk,
        model: ThreadingModel,
    ) {
        log::debug!(
            "object builder: method '{}::{}{}' registered as id {}",
            name,
            returns,
            parameters,
            id
        );
        self.methods.insert(
            id,
            Arc::new(Method {
                meta: MetaMethod {
                    id,
                    name: name.to_string(),
                    parameters,
                    returns,
                },
                model,
                thunk,
            }),
        );
    }

    fn insert_signal(&mut self, id: u32, name: &str, arguments: Signature) {
        log::debug!("object builder: signal '{}' registered as id {}", name, id);
        self.signals.insert(id, Arc::new(SignalState::new(arguments.clone())));
        self.signal_meta.insert(
            id,
            MetaSignal {
                id,
                name: name.to_string(),
                arguments,
            },
        );
    }
}
