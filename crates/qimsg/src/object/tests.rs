// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests for the object model.

use super::*;
use crate::codec::{decode, encode, Buffer};
use crate::error::{CallError, CallErrorKind};
use crate::exec::ThreadingModel;
use crate::future::FutureState;
use crate::signature::Signature;
use crate::value::Value;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn typed_call_full_workflow() {
    let mut builder = ObjectBuilder::new("calculator");
    let add = builder.method("add", |a: i32, b: i32| a + b).expect("add");
    builder
        .method("concat", |a: String, b: String| format!("{}{}", a, b))
        .expect("concat");
    let object = builder.build();

    let result = object
        .call(add, vec![Value::Int32(3), Value::Int32(4)])
        .result(WAIT)
        .expect("add result");
    assert_eq!(result, Value::Int32(7));

    let result = object
        .call_method("concat", vec![Value::from("foo"), Value::from("bar")])
        .result(WAIT)
        .expect("concat result");
    assert_eq!(result, Value::from("foobar"));
}

#[test]
fn encoded_call_roundtrip() {
    // The add::i(ii) end-to-end scenario over the wire boundary.
    let mut builder = ObjectBuilder::new("calculator");
    let add = builder.method("add", |a: i32, b: i32| a + b).expect("add");
    let object = builder.build();

    let params_sig = Signature::parse("(ii)").expect("sig");
    let mut params = Buffer::new();
    encode(
        &mut params,
        &Value::Tuple(vec![Value::Int32(3), Value::Int32(4)]),
        &params_sig,
    )
    .expect("encode params");

    let reply = object
        .call_encoded(add, params.as_slice())
        .result(WAIT)
        .expect("encoded call");

    let ret_sig = Signature::parse("i").expect("sig");
    let mut reader = crate::codec::BufReader::new(&reply);
    let decoded = decode(&mut reader, &ret_sig).expect("decode result");
    assert_eq!(decoded, Value::Int32(7));
}

#[test]
fn unknown_method_fails_synchronously() {
    let object = ObjectBuilder::new("empty").build();
    let future = object.call(999, vec![]);
    assert_eq!(future.state(), FutureState::Failed);
    let err = future.error().expect("failed");
    assert_eq!(err.kind(), CallErrorKind::NoSuchMethod);

    let future = object.call_method("nothing", vec![]);
    assert_eq!(future.state(), FutureState::Failed);
}

#[test]
fn arguments_convert_to_declared_shapes() {
    let mut builder = ObjectBuilder::new("calculator");
    let add = builder.method("add", |a: i32, b: i32| a + b).expect("add");
    let object = builder.build();

    // Int16 arguments widen into the declared i32 parameters.
    let result = object
        .call(add, vec![Value::Int16(3), Value::Int16(4)])
        .result(WAIT)
        .expect("widened call");
    assert_eq!(result, Value::Int32(7));

    // Strings do not.
    let future = object.call(add, vec![Value::from("x"), Value::from("y")]);
    assert_eq!(future.state(), FutureState::Failed);
    assert_eq!(
        future.error().expect("failed").kind(),
        CallErrorKind::InvalidArgument
    );
}

#[test]
fn overloads_resolve_by_signature() {
    let mut builder = ObjectBuilder::new("overloads");
    builder
        .method("describe", |v: i32| format!("int:{}", v))
        .expect("int overload");
    builder
        .method("describe", |v: String| format!("str:{}", v))
        .expect("string overload");
    let object = builder.build();

    let result = object
        .call_method("describe", vec![Value::Int32(1)])
        .result(WAIT)
        .expect("int call");
    assert_eq!(result, Value::from("int:1"));

    let result = object
        .call_method("describe", vec![Value::from("x")])
        .result(WAIT)
        .expect("string call");
    assert_eq!(result, Value::from("str:x"));
}

#[test]
fn method_model_beats_caller_override() {
    // A Direct method called with a Queued override still executes inline
    // on the calling thread.
    let executed_on = Arc::new(Mutex::new(None));
    let recorder = executed_on.clone();

    let mut builder = ObjectBuilder::new("threading").single_threaded();
    let direct = builder
        .method_with_model(
            "inline",
            move || {
                *recorder.lock() = Some(thread::current().id());
            },
            ThreadingModel::Direct,
        )
        .expect("direct method");
    let object = builder.build();

    let future = object.call_with(
        direct,
        vec![],
        CallOptions {
            model: ThreadingModel::Queued,
        },
    );
    assert!(future.wait(WAIT));
    assert_eq!(*executed_on.lock(), Some(thread::current().id()));
}

#[test]
fn queued_calls_run_on_the_object_context() {
    let executed_on = Arc::new(Mutex::new(None));
    let recorder = executed_on.clone();

    let mut builder = ObjectBuilder::new("threading").single_threaded();
    let queued = builder
        .method("deferred", move || {
            *recorder.lock() = Some(thread::current().id());
        })
        .expect("queued method");
    let object = builder.build();

    let future = object.call(queued, vec![]);
    assert!(future.wait(WAIT));
    let recorded = executed_on.lock().clone().expect("executed");
    assert_ne!(recorded, thread::current().id());
}

#[test]
fn single_threaded_object_serializes_calls() {
    let mut builder = ObjectBuilder::new("serialized").single_threaded();
    let active = Arc::new(AtomicUsize::new(0));
    let overlap = Arc::new(AtomicUsize::new(0));
    let active_in = active.clone();
    let overlap_in = overlap.clone();
    let id = builder
        .method("step", move || {
            if active_in.fetch_add(1, Ordering::SeqCst) > 0 {
                overlap_in.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(5));
            active_in.fetch_sub(1, Ordering::SeqCst);
        })
        .expect("method");
    let object = builder.build();

    let futures: Vec<_> = (0..8).map(|_| object.call(id, vec![])).collect();
    for future in &futures {
        assert!(future.wait(WAIT));
    }
    assert_eq!(overlap.load(Ordering::SeqCst), 0);
}

#[test]
fn cooperative_cancellation() {
    let mut builder = ObjectBuilder::new("cancelable").single_threaded();
    let thunk: MethodThunk = Box::new(|context, _args| {
        for _ in 0..1000 {
            if context.canceled() {
                return Err(CallError::canceled());
            }
            thread::sleep(Duration::from_millis(2));
        }
        Ok(Value::Void)
    });
    let id = builder
        .advertise_method(
            "spin",
            Signature::parse("()").expect("sig"),
            Signature::parse("v").expect("sig"),
            thunk,
            ThreadingModel::Queued,
        )
        .expect("register");
    let object = builder.build();

    let future = object.call(id, vec![]);
    future.cancel();
    assert!(future.wait(WAIT));
    assert_eq!(future.state(), FutureState::Canceled);
}

#[test]
fn property_workflow_with_notification() {
    // volume::i starts at 5; the synthesized getter/setter work through
    // the overload pair; a subscriber sees exactly one notification.
    let mut builder = ObjectBuilder::new("mixer");
    let volume = builder.property("volume", 5i32).expect("property");
    let object = builder.build();
    let meta = object.meta_object();
    let prop = meta.property(volume).expect("meta").clone();

    let got = object
        .call(prop.getter, vec![])
        .result(WAIT)
        .expect("getter");
    assert_eq!(got, Value::Int32(5));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    object
        .connect(prop.signal, move |args| {
            sink.lock().push(args.to_vec());
        })
        .expect("connect");

    object
        .call(prop.setter, vec![Value::Int32(9)])
        .result(WAIT)
        .expect("setter");

    let got = object
        .call(prop.getter, vec![])
        .result(WAIT)
        .expect("getter again");
    assert_eq!(got, Value::Int32(9));

    let notifications = seen.lock();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0], vec![Value::Int32(9)]);
}

#[test]
fn property_direct_accessors() {
    let mut builder = ObjectBuilder::new("mixer");
    let volume = builder.property("volume", 5i32).expect("property");
    let object = builder.build();

    assert_eq!(object.property(volume).expect("read"), Value::Int32(5));
    object
        .set_property(volume, Value::Int64(9))
        .expect("write converts");
    assert_eq!(object.property(volume).expect("read"), Value::Int32(9));

    assert!(matches!(
        object.property(9999),
        Err(ObjectError::NoSuchProperty(9999))
    ));
    assert!(matches!(
        object.set_property(volume, Value::from("loud")),
        Err(ObjectError::IncompatibleArguments { .. })
    ));
}

#[test]
fn signal_pubsub_through_the_object() {
    let mut builder = ObjectBuilder::new("emitter");
    let changed = builder
        .signal("changed", Signature::parse("is").expect("sig"))
        .expect("signal");
    let object = builder.build();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let link = object
        .connect(changed, move |args| sink.lock().push(args.to_vec()))
        .expect("connect");

    object
        .post(changed, vec![Value::Int32(1), Value::from("one")])
        .expect("post");
    assert_eq!(seen.lock().len(), 1);

    assert!(object.disconnect(link));
    assert!(!object.disconnect(link));

    object
        .post(changed, vec![Value::Int32(2), Value::from("two")])
        .expect("post after disconnect");
    assert_eq!(seen.lock().len(), 1);

    assert!(matches!(
        object.post(changed, vec![Value::from("wrong")]),
        Err(ObjectError::IncompatibleArguments { .. })
    ));
    assert!(matches!(
        object.connect(9999, |_args| {}),
        Err(ObjectError::NoSuchSignal(9999))
    ));
}

#[test]
fn meta_object_matches_dispatch_tables() {
    let mut builder = ObjectBuilder::new("consistency");
    let add = builder.method("add", |a: i32, b: i32| a + b).expect("add");
    let ping = builder.method("ping", || ()).expect("ping");
    let tick = builder
        .signal("tick", Signature::parse("L").expect("sig"))
        .expect("tick");
    let level = builder.property("level", 0.5f64).expect("level");
    let object = builder.build();
    let meta = object.meta_object();

    assert_eq!(meta.method_id("add"), Some(add));
    assert_eq!(meta.method_id("ping"), Some(ping));
    assert_eq!(meta.signal_id("tick"), Some(tick));
    assert_eq!(meta.property_id("level"), Some(level));

    let add_meta = meta.method(add).expect("add meta");
    assert_eq!(add_meta.parameters.as_str(), "(ii)");
    assert_eq!(add_meta.returns.as_str(), "i");

    // Every property companion the snapshot names exists in the tables.
    let prop = meta.property(level).expect("prop meta");
    assert!(meta.method(prop.getter).is_some());
    assert!(meta.method(prop.setter).is_some());
    assert!(meta.signal(prop.signal).is_some());
}
