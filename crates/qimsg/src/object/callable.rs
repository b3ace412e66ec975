// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Erased invocation thunks and typed-closure adapters.
//!
//! `advertise_method` registers a raw [`MethodThunk`]; the [`IntoMethod`]
//! adapters lift plain `Fn(A, B, ..) -> R` closures into thunks and derive
//! both signatures from the `Reflect` descriptions of the argument and
//! return types, so typed registration needs no signature strings at all.

use crate::error::CallError;
use crate::exec::ThreadingModel;
use crate::object::MetaMethod;
use crate::signature::Signature;
use crate::types::{Reflect, TypeInfo, TypeRegistry};
use crate::value::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-call context handed to every thunk.
///
/// Cancellation is cooperative: long-running thunks poll
/// [`CallContext::canceled`] and bail out with [`CallError::canceled`].
pub struct CallContext {
    cancel: Arc<AtomicBool>,
}

impl CallContext {
    pub(crate) fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    /// True once the caller requested cancellation.
    pub fn canceled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

/// Erased invocation unit stored in an object's dispatch table.
pub type MethodThunk =
    Box<dyn Fn(&CallContext, Vec<Value>) -> Result<Value, CallError> + Send + Sync>;

/// One registered method: introspection data, threading model, thunk.
pub(crate) struct Method {
    pub(crate) meta: MetaMethod,
    pub(crate) model: ThreadingModel,
    pub(crate) thunk: MethodThunk,
}

/// Adapter lifting a typed closure into an erased method.
pub trait IntoMethod<Args> {
    /// Parameter signature derived from the argument types.
    fn parameter_signature() -> Signature;

    /// Return signature derived from the result type.
    fn return_signature() -> Signature;

    /// Build the erased thunk.
    fn into_thunk(self) -> MethodThunk;
}

macro_rules! impl_into_method {
    ($count:expr => $($ty:ident),*) => {
        impl<F, R, $($ty),*> IntoMethod<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: Reflect,
            $($ty: Reflect,)*
        {
            fn parameter_signature() -> Signature {
                let members: Vec<Arc<TypeInfo>> =
                    vec![$(TypeRegistry::global().type_of::<$ty>()),*];
                TypeInfo::tuple_of(members).signature()
            }

            fn return_signature() -> Signature {
                TypeRegistry::global().type_of::<R>().signature()
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> MethodThunk {
                Box::new(move |_context, args| {
                    if args.len() != $count {
                        return Err(CallError::invalid_argument(format!(
                            "expected {} arguments, got {}",
                            $count,
                            args.len()
                        )));
                    }
                    let mut iter = args.into_iter();
                    $(
                        let $ty = $ty::from_value(iter.next().expect("arity checked"))
                            .map_err(|e| CallError::invalid_argument(e.to_string()))?;
                    )*
                    Ok((self)($($ty),*).into_value())
                })
            }
        }
    };
}

impl_into_method!(0 =>);
impl_into_method!(1 => A);
impl_into_method!(2 => A, B);
impl_into_method!(3 => A, B, C);
impl_into_method!(4 => A, B, C, D);
impl_into_method!(5 => A, B, C, D, E);
impl_into_method!(6 => A, B, C, D, E, F2);
