//! Category of type for quick identification and processing
//!
//! [`ShapeKind`] is the structural description produced by introspection, while
//! [`Classification`] is the coarse tag the plan builder dispatches on.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::{PropertyDescriptor, TypeRef};
use crate::reflect::Reflect;

/// Built-in scalar types, named as Rust spells them
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl PrimitiveKind {
    /// The Rust spelling of this kind, e.g. `"i32"`
    pub fn name(self) -> &'static str { self.into() }

    /// Signed and unsigned integers of every width
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::I128
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::U128
                | Self::Usize
        )
    }

    /// `f32` and `f64`
    pub const fn is_float(self) -> bool { matches!(self, Self::F32 | Self::F64) }

    /// Integers and floats
    pub const fn is_numeric(self) -> bool { self.is_integer() || self.is_float() }

    /// Whether a value of this kind converts to `target` with an `as` cast
    ///
    /// Numeric kinds convert to each other, `bool` and `char` convert to integers,
    /// and only `u8` converts to `char`.
    pub const fn is_castable_to(self, target: Self) -> bool {
        if self as u8 == target as u8 {
            return true;
        }
        match target {
            Self::Bool => false,
            Self::Char => matches!(self, Self::U8),
            Self::F32 | Self::F64 => self.is_numeric(),
            _ => self.is_numeric() || matches!(self, Self::Bool | Self::Char),
        }
    }
}

/// Coarse classification used to pick a plan-building strategy for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
pub enum Classification {
    /// Numbers, `bool`, `char`
    Primitive,
    /// `String`
    String,
    /// Unit-only enums with a numeric discriminant
    Enum,
    /// Fixed or boxed slices
    Array,
    /// Growable containers: `Vec`, `VecDeque`, sets
    Collection,
    /// `Option<T>`
    Optional,
    /// Structs with named properties, and opaque resource handles
    Complex,
}

/// External resources that must never be copied between mapped objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Raw pointers and other foreign/native object handles
    #[strum(to_string = "foreign object handle", serialize = "foreign")]
    ForeignObject,
    /// Byte streams such as standard input or a child process pipe
    #[strum(to_string = "I/O stream", serialize = "stream")]
    IoStream,
    /// Connected or listening sockets
    #[strum(to_string = "network socket", serialize = "socket")]
    NetworkSocket,
    /// Database connections
    #[strum(to_string = "database connection", serialize = "database")]
    DatabaseConnection,
    /// Open files and directory handles
    #[strum(to_string = "filesystem handle", serialize = "filesystem")]
    FileSystem,
}

/// One variant of a unit-only enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
    name:         &'static str,
    discriminant: i128,
}

impl EnumVariant {
    /// Create a variant description
    pub const fn new(name: &'static str, discriminant: i128) -> Self { Self { name, discriminant } }

    /// Variant name, used as the enum's textual representation
    pub const fn name(&self) -> &'static str { self.name }

    /// Numeric discriminant
    pub const fn discriminant(&self) -> i128 { self.discriminant }
}

/// Shape of a unit-only enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumShape {
    /// Underlying representation (from `#[repr(..)]`, `isize` otherwise)
    pub underlying: PrimitiveKind,
    /// Variants in declaration order
    pub variants:   Vec<EnumVariant>,
}

impl EnumShape {
    /// Find the variant carrying `discriminant`
    pub fn variant_for(&self, discriminant: i128) -> Option<&EnumVariant> {
        self.variants
            .iter()
            .find(|variant| variant.discriminant == discriminant)
    }
}

/// Shape of `[T; N]` or `Box<[T]>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayShape {
    /// Element type
    pub element: TypeRef,
    /// Fixed length, `None` for boxed slices
    pub length:  Option<usize>,
}

/// Concrete growable container behind a [`CollectionShape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum ContainerKind {
    /// `Vec<T>`
    Vec,
    /// `VecDeque<T>`
    VecDeque,
    /// `LinkedList<T>`
    LinkedList,
    /// `BTreeSet<T>`
    BTreeSet,
    /// `HashSet<T>`
    HashSet,
}

/// Shape of a growable container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionShape {
    /// Element type
    pub element:   TypeRef,
    /// Which container
    pub container: ContainerKind,
}

/// Shape of a struct with named properties
#[derive(Debug, Clone)]
pub struct ComplexShape {
    /// Properties in declaration order
    pub properties: Vec<PropertyDescriptor>,
    /// Builds a default-initialized instance, used for nested destinations
    pub construct:  fn() -> Box<dyn Reflect>,
}

/// Structural description of a type
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// Numbers, `bool`, `char`
    Primitive(PrimitiveKind),
    /// `String`
    String,
    /// Unit-only enum
    Enum(EnumShape),
    /// Fixed array or boxed slice
    Array(ArrayShape),
    /// Growable container
    Collection(CollectionShape),
    /// `Option<T>`
    Optional(TypeRef),
    /// `Box<T>` / `Arc<T>`: transparent for mapping purposes
    Indirect(TypeRef),
    /// Struct with named properties
    Complex(ComplexShape),
    /// Handle to an external resource
    Resource(CapabilityKind),
}

impl ShapeKind {
    /// The coarse classification of this kind
    ///
    /// `Indirect` shapes report `Complex`; resolve them through
    /// [`ShapeRegistry::effective`](super::ShapeRegistry::effective) first to classify
    /// the pointee.
    pub const fn classification(&self) -> Classification {
        match self {
            Self::Primitive(_) => Classification::Primitive,
            Self::String => Classification::String,
            Self::Enum(_) => Classification::Enum,
            Self::Array(_) => Classification::Array,
            Self::Collection(_) => Classification::Collection,
            Self::Optional(_) => Classification::Optional,
            Self::Indirect(_) | Self::Complex(_) | Self::Resource(_) => Classification::Complex,
        }
    }

    /// Element type of an array or collection
    pub const fn element(&self) -> Option<TypeRef> {
        match self {
            Self::Array(array) => Some(array.element),
            Self::Collection(collection) => Some(collection.element),
            _ => None,
        }
    }
}
