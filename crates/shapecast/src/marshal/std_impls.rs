// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Marshal`] for standard library types.

use super::{unexpected, Marshal};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, FieldPath, PathSegment, Result};
use crate::instance::Instance;
use crate::value::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

impl Marshal for () {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::null())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Null => Ok(()),
            other => Err(unexpected("null", &other)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Null)
    }
}

impl Marshal for bool {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::bool())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Bool(v) => Ok(v),
            other => Err(unexpected("bool", &other)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Bool(*self))
    }
}

macro_rules! impl_marshal_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Marshal for $t {
                fn descriptor() -> Arc<TypeDescriptor> {
                    Arc::new(TypeDescriptor::int())
                }

                fn from_instance(instance: Instance) -> Result<Self> {
                    match instance {
                        Instance::Int(v) => <$t>::try_from(v).map_err(|_| {
                            Error::type_mismatch(stringify!($t), format!("int {} out of range", v))
                        }),
                        other => Err(unexpected(stringify!($t), &other)),
                    }
                }

                fn to_instance(&self) -> Result<Instance> {
                    i64::try_from(*self).map(Instance::Int).map_err(|_| {
                        Error::type_mismatch("int", format!("{} {} out of range", stringify!($t), self))
                    })
                }
            }
        )*
    };
}

impl_marshal_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Marshal for f64 {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::float())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Float(v) => Ok(v),
            other => Err(unexpected("float", &other)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Float(*self))
    }
}

impl Marshal for f32 {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::float())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_instance(instance: Instance) -> Result<Self> {
        f64::from_instance(instance).map(|v| v as f32)
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Float(f64::from(*self)))
    }
}

impl Marshal for String {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::string())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::String(v) => Ok(v),
            other => Err(unexpected("str", &other)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::String(self.clone()))
    }
}

impl Marshal for char {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::string())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        let text = String::from_instance(instance)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::type_mismatch("single character", format!("str {:?}", text))),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::String(self.to_string()))
    }
}

impl<T: Marshal> Marshal for Option<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::optional(T::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Null => Ok(None),
            other => T::from_instance(other).map(Some),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        match self {
            Some(v) => v.to_instance(),
            None => Ok(Instance::Null),
        }
    }
}

impl<T: Marshal> Marshal for Box<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        T::descriptor()
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        T::from_instance(instance).map(Box::new)
    }

    fn to_instance(&self) -> Result<Instance> {
        (**self).to_instance()
    }
}

fn at_index(index: usize) -> FieldPath {
    let mut path = FieldPath::root();
    path.push(PathSegment::Index(index));
    path
}

/// Elements of a list or tuple instance, converted in order.
fn elements<T: Marshal>(instance: Instance, expected: &str) -> Result<impl Iterator<Item = Result<T>>> {
    match instance {
        Instance::List(items) | Instance::Tuple(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, item)| T::from_instance(item).map_err(|e| e.within(&at_index(i))))),
        other => Err(unexpected(expected, &other)),
    }
}

fn to_list<'a, T: Marshal + 'a>(items: impl IntoIterator<Item = &'a T>) -> Result<Instance> {
    items
        .into_iter()
        .map(Marshal::to_instance)
        .collect::<Result<Vec<_>>>()
        .map(Instance::List)
}

impl<T: Marshal> Marshal for Vec<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::list_of(T::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        elements(instance, "list")?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_list(self)
    }
}

impl<T: Marshal> Marshal for VecDeque<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::list_of(T::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        elements(instance, "list")?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_list(self)
    }
}

impl<T: Marshal + Eq + Hash> Marshal for HashSet<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::set_of(T::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        elements(instance, "set")?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_list(self)
    }
}

impl<T: Marshal + Ord> Marshal for BTreeSet<T> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::set_of(T::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        elements(instance, "set")?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_list(self)
    }
}

/// Entries of a map instance, converted in order.
fn entries<K: Marshal, V: Marshal>(
    instance: Instance,
) -> Result<impl Iterator<Item = Result<(K, V)>>> {
    match instance {
        Instance::Map(pairs) => Ok(pairs.into_iter().map(|(k, v)| -> Result<(K, V)> {
            let mut path = FieldPath::root();
            path.push(PathSegment::Key(key_label(&k)));
            let key = K::from_instance(k).map_err(|e| e.within(&path))?;
            let value = V::from_instance(v).map_err(|e| e.within(&path))?;
            Ok((key, value))
        })),
        other => Err(unexpected("dict", &other)),
    }
}

fn key_label(key: &Instance) -> String {
    match key {
        Instance::String(s) => s.clone(),
        Instance::Enum(e) => e.raw().key_text().unwrap_or_else(|| e.variant().to_string()),
        other => other.describe(),
    }
}

fn to_map<'a, K: Marshal + 'a, V: Marshal + 'a>(
    pairs: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> Result<Instance> {
    pairs
        .into_iter()
        .map(|(k, v)| -> Result<(Instance, Instance)> { Ok((k.to_instance()?, v.to_instance()?)) })
        .collect::<Result<Vec<_>>>()
        .map(Instance::Map)
}

impl<K: Marshal + Eq + Hash, V: Marshal> Marshal for HashMap<K, V> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::mapping(K::descriptor(), V::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        entries(instance)?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_map(self)
    }
}

impl<K: Marshal + Ord, V: Marshal> Marshal for BTreeMap<K, V> {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::mapping(K::descriptor(), V::descriptor()))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        entries(instance)?.collect()
    }

    fn to_instance(&self) -> Result<Instance> {
        to_map(self)
    }
}

macro_rules! impl_marshal_tuple {
    ($len:literal => $($name:ident : $idx:tt),+) => {
        impl<$($name: Marshal),+> Marshal for ($($name,)+) {
            fn descriptor() -> Arc<TypeDescriptor> {
                Arc::new(TypeDescriptor::tuple(vec![$($name::descriptor()),+]))
            }

            fn from_instance(instance: Instance) -> Result<Self> {
                let items = match instance {
                    Instance::Tuple(items) | Instance::List(items) if items.len() == $len => items,
                    other => return Err(unexpected(concat!("tuple of ", $len, " elements"), &other)),
                };
                let mut items = items.into_iter();
                Ok(($(
                    match items.next() {
                        Some(item) => $name::from_instance(item).map_err(|e| e.within(&at_index($idx)))?,
                        None => return Err(Error::type_mismatch(concat!("tuple of ", $len, " elements"), "shorter tuple")),
                    },
                )+))
            }

            fn to_instance(&self) -> Result<Instance> {
                Ok(Instance::Tuple(vec![$(self.$idx.to_instance()?),+]))
            }
        }
    };
}

impl_marshal_tuple!(1 => A: 0);
impl_marshal_tuple!(2 => A: 0, B: 1);
impl_marshal_tuple!(3 => A: 0, B: 1, C: 2);
impl_marshal_tuple!(4 => A: 0, B: 1, C: 2, D: 3);

/// Untyped passthrough: any value decodes, and encodes back verbatim.
impl Marshal for Value {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::any())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        instance_to_value(instance)
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::from_value(self))
    }
}

/// The instance itself, untouched.
impl Marshal for Instance {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::any())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        Ok(instance)
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(self.clone())
    }
}

fn instance_to_value(instance: Instance) -> Result<Value> {
    Ok(match instance {
        Instance::Null => Value::Null,
        Instance::Bool(v) => Value::Bool(v),
        Instance::Int(v) => Value::Int(v),
        Instance::Float(v) => Value::Float(v),
        Instance::String(v) => Value::String(v),
        Instance::List(items) => Value::Seq(
            items.into_iter().map(instance_to_value).collect::<Result<_>>()?,
        ),
        Instance::Tuple(items) => Value::Tuple(
            items.into_iter().map(instance_to_value).collect::<Result<_>>()?,
        ),
        Instance::Map(pairs) => {
            let mut map = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                let key = instance_to_value(k)?;
                let Some(text) = key.key_text() else {
                    return Err(Error::type_mismatch("scalar mapping key", key.describe()));
                };
                map.insert(text, instance_to_value(v)?);
            }
            Value::Map(map)
        }
        Instance::Record(record) => {
            let mut map = Map::with_capacity(record.len());
            for (name, v) in record.fields() {
                map.insert(name.to_string(), instance_to_value(v.clone())?);
            }
            Value::Map(map)
        }
        Instance::Enum(member) => member.raw().clone(),
        Instance::Opaque(opaque) => match opaque.serialize() {
            Some(result) => result?,
            None => return Err(Error::unsupported(opaque.type_key())),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_int_range_checks() {
        assert_eq!(u8::from_instance(Instance::Int(255)).unwrap(), 255);
        let err = u8::from_instance(Instance::Int(256)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(u64::MAX.to_instance().is_err());
        assert_eq!(u64::from(u32::MAX).to_instance().unwrap(), Instance::Int(4_294_967_295));
    }

    #[test]
    fn test_no_numeric_coercion() {
        assert!(i64::from_instance(Instance::Float(2.0)).is_err());
        assert!(f64::from_instance(Instance::Int(2)).is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(char::from_instance(Instance::from("x")).unwrap(), 'x');
        assert!(char::from_instance(Instance::from("xy")).is_err());
        assert!(char::from_instance(Instance::from("")).is_err());
    }

    #[test]
    fn test_option() {
        assert_eq!(Option::<i64>::from_instance(Instance::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_instance(Instance::Int(3)).unwrap(), Some(3));
        assert_eq!(Option::<i64>::descriptor().name, "Optional[int]");
    }

    #[test]
    fn test_vec_error_path() {
        let list = Instance::List(vec![Instance::Int(1), Instance::from("two")]);
        let err = Vec::<i64>::from_instance(list).unwrap_err();
        assert_eq!(err.path().to_string(), "$[1]");
    }

    #[test]
    fn test_maps() {
        let mut scores = BTreeMap::new();
        scores.insert("ada".to_string(), 3_i64);
        scores.insert("bob".to_string(), 5_i64);
        let instance = scores.to_instance().unwrap();
        assert_eq!(BTreeMap::<String, i64>::from_instance(instance).unwrap(), scores);
        assert_eq!(BTreeMap::<String, i64>::descriptor().name, "dict[str, int]");
    }

    #[test]
    fn test_tuples() {
        let pair = (1_i64, "a".to_string());
        let instance = pair.to_instance().unwrap();
        assert_eq!(instance, Instance::Tuple(vec![Instance::Int(1), Instance::from("a")]));
        assert_eq!(<(i64, String)>::from_instance(instance).unwrap(), pair);
        assert!(<(i64, String)>::from_instance(Instance::Tuple(vec![Instance::Int(1)])).is_err());
        assert_eq!(<(i64, String, bool)>::descriptor().name, "tuple[int, str, bool]");
    }

    #[test]
    fn test_value_passthrough() {
        let value: Value = [("a", Value::from(vec![1, 2]))].into_iter().collect();
        let instance = value.to_instance().unwrap();
        assert_eq!(Value::from_instance(instance).unwrap(), value);
    }

    #[test]
    fn test_sets() {
        let set: BTreeSet<i64> = [3, 1, 2].into_iter().collect();
        let instance = set.to_instance().unwrap();
        assert_eq!(
            instance,
            Instance::List(vec![Instance::Int(1), Instance::Int(2), Instance::Int(3)])
        );
        assert_eq!(HashSet::<i64>::descriptor().name, "set[int]");
    }
}
