// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `Reflect` trait: compile-time self-description of native types.
//!
//! Types implementing `Reflect` can cross the type-erasure boundary in both
//! directions: they describe their shape as a `TypeInfo` and convert to and
//! from the erased `Value`. Scalars, `String`, `Vec<T>`, `BTreeMap<K, V>`
//! and tuples up to arity 6 are covered out of the box.

use crate::types::TypeInfo;
use crate::value::{Value, ValueError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Self-describing native type, usable through the erased value model.
pub trait Reflect: Sized + 'static {
    /// Descriptor of this type's shape.
    fn type_info() -> Arc<TypeInfo>;

    /// Erase into a `Value`.
    fn into_value(self) -> Value;

    /// Recover from a `Value`; fails with `TypeMismatch` when the erased
    /// kind does not match.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_reflect_scalar {
    ($ty:ty, $ctor:ident, $variant:ident, $name:expr) => {
        impl Reflect for $ty {
            fn type_info() -> Arc<TypeInfo> {
                TypeInfo::$ctor()
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(ValueError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_reflect_scalar!(bool, boolean, Bool, "bool");
impl_reflect_scalar!(i8, int8, Int8, "int8");
impl_reflect_scalar!(u8, uint8, UInt8, "uint8");
impl_reflect_scalar!(i16, int16, Int16, "int16");
impl_reflect_scalar!(u16, uint16, UInt16, "uint16");
impl_reflect_scalar!(i32, int32, Int32, "int32");
impl_reflect_scalar!(u32, uint32, UInt32, "uint32");
impl_reflect_scalar!(i64, int64, Int64, "int64");
impl_reflect_scalar!(u64, uint64, UInt64, "uint64");
impl_reflect_scalar!(f32, float32, Float32, "float32");
impl_reflect_scalar!(f64, float64, Float64, "float64");
impl_reflect_scalar!(String, string, String, "string");

impl Reflect for () {
    fn type_info() -> Arc<TypeInfo> {
        TypeInfo::void()
    }

    fn into_value(self) -> Value {
        Value::Void
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Void => Ok(()),
            other => Err(ValueError::TypeMismatch {
                expected: "void".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

impl Reflect for Value {
    fn type_info() -> Arc<TypeInfo> {
        TypeInfo::dynamic()
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> Arc<TypeInfo> {
        TypeInfo::list_of(T::type_info())
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Reflect::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::TypeMismatch {
                expected: "list".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> Arc<TypeInfo> {
        TypeInfo::map_of(K::type_info(), V::type_info())
    }

    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(ValueError::TypeMismatch {
                expected: "map".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

macro_rules! impl_reflect_tuple {
    ($count:expr => $($ty:ident : $idx:tt),+) => {
        impl<$($ty: Reflect),+> Reflect for ($($ty,)+) {
            fn type_info() -> Arc<TypeInfo> {
                TypeInfo::tuple_of(vec![$($ty::type_info()),+])
            }

            fn into_value(self) -> Value {
                Value::Tuple(vec![$(self.$idx.into_value()),+])
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Tuple(items) if items.len() == $count => {
                        let mut items = items.into_iter();
                        Ok(($($ty::from_value(
                            items.next().expect("arity checked above"),
                        )?,)+))
                    }
                    Value::Tuple(items) => Err(ValueError::Arity {
                        expected: $count,
                        got: items.len(),
                    }),
                    other => Err(ValueError::TypeMismatch {
                        expected: "tuple".to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_reflect_tuple!(1 => A:0);
impl_reflect_tuple!(2 => A:0, B:1);
impl_reflect_tuple!(3 => A:0, B:1, C:2);
impl_reflect_tuple!(4 => A:0, B:1, C:2, D:3);
impl_reflect_tuple!(5 => A:0, B:1, C:2, D:3, E:4);
impl_reflect_tuple!(6 => A:0, B:1, C:2, D:3, E:4, F:5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_reflection() {
        assert_eq!(i32::type_info().signature().as_str(), "i");
        assert_eq!(42i32.into_value(), Value::Int32(42));
        assert_eq!(i32::from_value(Value::Int32(7)).unwrap(), 7);
        assert!(i32::from_value(Value::String("no".into())).is_err());
    }

    #[test]
    fn container_reflection() {
        assert_eq!(Vec::<String>::type_info().signature().as_str(), "[s]");
        assert_eq!(
            BTreeMap::<String, i32>::type_info().signature().as_str(),
            "{si}"
        );
        assert_eq!(<(i32, String)>::type_info().signature().as_str(), "(is)");
    }

    #[test]
    fn vec_roundtrip() {
        let v = vec![1u8, 2, 3];
        let value = v.clone().into_value();
        assert_eq!(Vec::<u8>::from_value(value).unwrap(), v);
    }

    #[test]
    fn map_preserves_key_order() {
        let mut m = BTreeMap::new();
        m.insert("b".to_string(), 2i32);
        m.insert("a".to_string(), 1i32);
        let value = m.clone().into_value();
        match &value {
            Value::Map(pairs) => {
                assert_eq!(pairs[0].0, Value::String("a".into()));
                assert_eq!(pairs[1].0, Value::String("b".into()));
            }
            other => panic!("expected map, got {:?}", other),
        }
        assert_eq!(BTreeMap::<String, i32>::from_value(value).unwrap(), m);
    }

    #[test]
    fn tuple_arity_mismatch() {
        let err = <(i32, i32)>::from_value(Value::Tuple(vec![Value::Int32(1)])).unwrap_err();
        assert!(matches!(err, ValueError::Arity { expected: 2, got: 1 }));
    }
}
