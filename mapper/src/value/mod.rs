//! Dynamic values that flow through an executing mapping plan

mod primitive;

use std::any::type_name;
use std::fmt;

use itertools::Itertools;
pub use primitive::Primitive;
use strum::IntoStaticStr;
use thiserror::Error;

use crate::reflect::Reflect;
use crate::shape::{PrimitiveKind, short_type_name};

/// The value of one enum variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    variant:      &'static str,
    discriminant: i128,
}

impl EnumValue {
    /// Create an enum value
    pub const fn new(variant: &'static str, discriminant: i128) -> Self {
        Self {
            variant,
            discriminant,
        }
    }

    /// Variant name
    pub const fn variant(&self) -> &'static str { self.variant }

    /// Numeric discriminant
    pub const fn discriminant(&self) -> i128 { self.discriminant }
}

/// A property value read from, or written to, a [`Reflect`] object
#[derive(IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Value {
    /// Scalar
    Primitive(Primitive),
    /// Owned string
    String(String),
    /// Unit enum variant
    Enum(EnumValue),
    /// Elements of an array or boxed slice
    Array(Vec<Self>),
    /// Elements of a growable container
    Collection(Vec<Self>),
    /// Contents of an `Option`
    Optional(Option<Box<Self>>),
    /// A complex object
    Complex(Box<dyn Reflect>),
    /// An opaque external resource, identified by type name
    Resource(&'static str),
}

impl Value {
    /// Lower-case variant name, used in error messages
    pub fn category(&self) -> &'static str { self.into() }

    /// Unwrap a primitive
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_primitive(self) -> Result<Primitive, ValueError> {
        match self {
            Self::Primitive(primitive) => Ok(primitive),
            other => Err(other.mismatch("primitive")),
        }
    }

    /// Unwrap a string
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_string(self) -> Result<String, ValueError> {
        match self {
            Self::String(string) => Ok(string),
            other => Err(other.mismatch("string")),
        }
    }

    /// Unwrap an enum value
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_enum(self) -> Result<EnumValue, ValueError> {
        match self {
            Self::Enum(value) => Ok(value),
            other => Err(other.mismatch("enum")),
        }
    }

    /// Unwrap the elements of an array or collection
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_elements(self) -> Result<Vec<Self>, ValueError> {
        match self {
            Self::Array(elements) | Self::Collection(elements) => Ok(elements),
            other => Err(other.mismatch("array or collection")),
        }
    }

    /// Unwrap an optional value
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_optional(self) -> Result<Option<Self>, ValueError> {
        match self {
            Self::Optional(inner) => Ok(inner.map(|boxed| *boxed)),
            other => Err(other.mismatch("optional")),
        }
    }

    /// Unwrap a complex object
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] for any other kind of value.
    pub fn into_complex(self) -> Result<Box<dyn Reflect>, ValueError> {
        match self {
            Self::Complex(object) => Ok(object),
            other => Err(other.mismatch("complex")),
        }
    }

    /// Unwrap a complex object of concrete type `T`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::WrongType`] when the object is some other type.
    pub fn downcast<T: Reflect>(self) -> Result<T, ValueError> {
        let object = self.into_complex()?;
        let found = object.type_name();
        object
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ValueError::WrongType {
                expected: type_name::<T>(),
                found,
            })
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.category(),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Primitive(primitive) => Self::Primitive(*primitive),
            Self::String(string) => Self::String(string.clone()),
            Self::Enum(value) => Self::Enum(*value),
            Self::Array(elements) => Self::Array(elements.clone()),
            Self::Collection(elements) => Self::Collection(elements.clone()),
            Self::Optional(inner) => Self::Optional(inner.clone()),
            Self::Complex(object) => Self::Complex(object.clone_boxed()),
            Self::Resource(name) => Self::Resource(*name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.debug_tuple("Primitive").field(primitive).finish(),
            Self::String(string) => f.debug_tuple("String").field(string).finish(),
            Self::Enum(value) => f.debug_tuple("Enum").field(value).finish(),
            Self::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
            Self::Collection(elements) => f.debug_tuple("Collection").field(elements).finish(),
            Self::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Self::Complex(object) => f.debug_tuple("Complex").field(&object.type_name()).finish(),
            Self::Resource(name) => f.debug_tuple("Resource").field(name).finish(),
        }
    }
}

/// Textual form used when a property is coerced to `String`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => fmt::Display::fmt(primitive, f),
            Self::String(string) => f.write_str(string),
            Self::Enum(value) => f.write_str(value.variant),
            Self::Array(elements) | Self::Collection(elements) => {
                write!(f, "[{}]", elements.iter().join(", "))
            },
            Self::Optional(Some(inner)) => fmt::Display::fmt(inner, f),
            Self::Optional(None) => Ok(()),
            Self::Complex(object) => f.write_str(&short_type_name(object.type_name())),
            Self::Resource(name) => f.write_str(&short_type_name(name)),
        }
    }
}

/// Failure while reading, writing, or converting a [`Value`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value is of another kind than the operation needs
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        /// Kind the operation needs
        expected: &'static str,
        /// Kind of the value received
        found:    &'static str,
    },

    /// A complex value holds another concrete type
    #[error("expected an object of type `{expected}`, found `{found}`")]
    WrongType {
        /// Type the operation needs
        expected: &'static str,
        /// Type of the object received
        found:    &'static str,
    },

    /// Read or write of a property the object does not have
    #[error("`{type_name}` has no property named `{property}`")]
    UnknownProperty {
        /// Object type
        type_name: &'static str,
        /// Requested property
        property:  String,
    },

    /// Elements do not fit a fixed-length array
    #[error("expected {expected} elements, found {found}")]
    LengthMismatch {
        /// Length of the destination array
        expected: usize,
        /// Number of elements received
        found:    usize,
    },

    /// No variant carries the discriminant
    #[error("`{type_name}` has no variant with discriminant {discriminant}")]
    UnknownDiscriminant {
        /// Enum type
        type_name:    &'static str,
        /// Discriminant that matched nothing
        discriminant: i128,
    },

    /// No variant has the name
    #[error("`{type_name}` has no variant named `{variant}`")]
    UnknownVariant {
        /// Enum type
        type_name: &'static str,
        /// Text that matched no variant name
        variant:   String,
    },

    /// A primitive cast outside the `as` rules
    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast {
        /// Source primitive
        from: PrimitiveKind,
        /// Requested primitive
        to:   PrimitiveKind,
    },

    /// Resource handles cannot be rebuilt from mapped values
    #[error("`{0}` wraps an external resource and cannot be built from a mapped value")]
    Resource(&'static str),

    /// A plan refers to a pair plan it does not contain
    #[error("mapping plan has no entry {0}")]
    MissingPlan(usize),
}

impl ValueError {
    /// Create an `UnknownProperty` error, used by derived [`Reflect`] implementations
    pub fn unknown_property(type_name: &'static str, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name,
            property: property.into(),
        }
    }
}
