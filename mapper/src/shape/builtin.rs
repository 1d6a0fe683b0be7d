//! [`Shape`], [`IntoValue`] and [`FromValue`] for std types

use std::any::type_name;
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::ptr::NonNull;
use std::sync::Arc;

use super::{CapabilityKind, ContainerKind, PrimitiveKind, Shape, TypeShape};
use crate::reflect::{FromValue, IntoValue};
use crate::value::{Primitive, Value, ValueError};

macro_rules! primitive_shapes {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Shape for $ty {
            fn describe() -> TypeShape { TypeShape::primitive::<Self>(PrimitiveKind::$kind) }
        }

        impl IntoValue for $ty {
            fn to_value(&self) -> Value { Value::Primitive(Primitive::$kind(*self)) }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value.into_primitive()? {
                    Primitive::$kind(inner) => Ok(inner),
                    other => Err(ValueError::TypeMismatch {
                        expected: PrimitiveKind::$kind.name(),
                        found:    other.kind().name(),
                    }),
                }
            }
        }
    )*};
}

primitive_shapes! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl Shape for String {
    fn describe() -> TypeShape { TypeShape::string::<Self>() }
}

impl IntoValue for String {
    fn to_value(&self) -> Value { Value::String(self.clone()) }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> { value.into_string() }
}

fn collect_elements<T: FromValue, C: FromIterator<T>>(value: Value) -> Result<C, ValueError> {
    value
        .into_elements()?
        .into_iter()
        .map(T::from_value)
        .collect()
}

impl<T: Shape, const N: usize> Shape for [T; N] {
    fn describe() -> TypeShape { TypeShape::array::<Self, T>(Some(N)) }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn to_value(&self) -> Value { Value::Array(self.iter().map(IntoValue::to_value).collect()) }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        let elements: Vec<T> = collect_elements(value)?;
        let found = elements.len();
        elements
            .try_into()
            .map_err(|_| ValueError::LengthMismatch { expected: N, found })
    }
}

impl<T: Shape> Shape for Box<[T]> {
    fn describe() -> TypeShape { TypeShape::array::<Self, T>(None) }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn to_value(&self) -> Value { Value::Array(self.iter().map(IntoValue::to_value).collect()) }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        collect_elements::<T, Vec<T>>(value).map(Vec::into_boxed_slice)
    }
}

macro_rules! collection_shapes {
    ($($container:ident => $kind:ident [$($bound:tt)*]),* $(,)?) => {$(
        impl<T: Shape> Shape for $container<T> {
            fn describe() -> TypeShape {
                TypeShape::collection::<Self, T>(ContainerKind::$kind)
            }
        }

        impl<T: IntoValue> IntoValue for $container<T> {
            fn to_value(&self) -> Value {
                Value::Collection(self.iter().map(IntoValue::to_value).collect())
            }
        }

        impl<T: FromValue $($bound)*> FromValue for $container<T> {
            fn from_value(value: Value) -> Result<Self, ValueError> { collect_elements(value) }
        }
    )*};
}

collection_shapes! {
    Vec => Vec [],
    VecDeque => VecDeque [],
    LinkedList => LinkedList [],
    BTreeSet => BTreeSet [+ Ord],
    HashSet => HashSet [+ Eq + Hash],
}

impl<T: Shape> Shape for Option<T> {
    fn describe() -> TypeShape { TypeShape::optional::<Self, T>() }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn to_value(&self) -> Value {
        Value::Optional(self.as_ref().map(|inner| Box::new(inner.to_value())))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        value.into_optional()?.map(T::from_value).transpose()
    }
}

macro_rules! indirect_shapes {
    ($($pointer:ident),* $(,)?) => {$(
        impl<T: Shape> Shape for $pointer<T> {
            fn describe() -> TypeShape { TypeShape::indirect::<Self, T>() }
        }

        impl<T: IntoValue> IntoValue for $pointer<T> {
            fn to_value(&self) -> Value { T::to_value(self) }
        }

        impl<T: FromValue> FromValue for $pointer<T> {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                T::from_value(value).map($pointer::new)
            }
        }
    )*};
}

indirect_shapes!(Box, Arc);

macro_rules! resource_shapes {
    ($($ty:ty => $capability:ident),* $(,)?) => {$(
        impl Shape for $ty {
            fn describe() -> TypeShape {
                TypeShape::resource::<Self>(CapabilityKind::$capability)
            }
        }

        impl IntoValue for $ty {
            fn to_value(&self) -> Value { Value::Resource(type_name::<Self>()) }
        }

        impl FromValue for $ty {
            fn from_value(_value: Value) -> Result<Self, ValueError> {
                Err(ValueError::Resource(type_name::<Self>()))
            }
        }
    )*};
}

resource_shapes! {
    std::io::Stdin => IoStream,
    std::io::Stdout => IoStream,
    std::io::Stderr => IoStream,
    std::process::Child => IoStream,
    std::process::ChildStdin => IoStream,
    std::process::ChildStdout => IoStream,
    std::process::ChildStderr => IoStream,
    std::net::TcpStream => NetworkSocket,
    std::net::TcpListener => NetworkSocket,
    std::net::UdpSocket => NetworkSocket,
    std::fs::File => FileSystem,
    std::fs::ReadDir => FileSystem,
    std::fs::DirEntry => FileSystem,
}

#[cfg(unix)]
resource_shapes! {
    std::os::unix::net::UnixStream => NetworkSocket,
    std::os::unix::net::UnixListener => NetworkSocket,
    std::os::unix::net::UnixDatagram => NetworkSocket,
}

macro_rules! foreign_pointer_shapes {
    ($($pointer:ty),* $(,)?) => {$(
        impl<T: ?Sized + 'static> Shape for $pointer {
            fn describe() -> TypeShape {
                TypeShape::resource::<Self>(CapabilityKind::ForeignObject)
            }
        }

        impl<T: ?Sized + 'static> IntoValue for $pointer {
            fn to_value(&self) -> Value { Value::Resource(type_name::<Self>()) }
        }

        impl<T: ?Sized + 'static> FromValue for $pointer {
            fn from_value(_value: Value) -> Result<Self, ValueError> {
                Err(ValueError::Resource(type_name::<Self>()))
            }
        }
    )*};
}

foreign_pointer_shapes!(*const T, *mut T, NonNull<T>);
