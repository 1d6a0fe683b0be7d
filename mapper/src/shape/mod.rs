//! Type introspection: what properties a type has and what kind of value each one holds
//!
//! Every mappable type implements [`Shape`], normally through `#[derive(Mappable)]`.
//! Built-in implementations cover primitives, `String`, arrays, the std collections,
//! `Option`, `Box`/`Arc`, and the std types that wrap external resources.

mod builtin;
mod registry;
mod type_kind;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

pub use registry::ShapeRegistry;
use serde::{Serialize, Serializer};
pub use type_kind::{
    ArrayShape, CapabilityKind, Classification, CollectionShape, ComplexShape, ContainerKind,
    EnumShape, EnumVariant, PrimitiveKind, ShapeKind,
};

use crate::reflect::{Mappable, Reflect};

/// A type whose structure can be described at runtime
pub trait Shape: 'static {
    /// Produce the structural description of `Self`
    fn describe() -> TypeShape;
}

/// Cheap, copyable handle to a type that implements [`Shape`]
///
/// Equality and hashing use the [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id:       TypeId,
    name:     &'static str,
    describe: fn() -> TypeShape,
}

impl TypeRef {
    /// Handle for `T`
    pub fn of<T: Shape>() -> Self {
        Self {
            id:       TypeId::of::<T>(),
            name:     std::any::type_name::<T>(),
            describe: T::describe,
        }
    }

    /// Runtime type identity
    pub const fn id(&self) -> TypeId { self.id }

    /// Fully qualified type name
    pub const fn name(&self) -> &'static str { self.name }

    /// Type name with module paths removed, e.g. `Vec<Child>`
    pub fn short_name(&self) -> String { short_type_name(self.name) }

    /// Run introspection for this type
    pub fn describe(&self) -> TypeShape { (self.describe)() }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.short_name()) }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Strip module paths from every path segment of a type name
///
/// `alloc::vec::Vec<my_app::Child>` becomes `Vec<Child>`.
pub fn short_type_name(name: &str) -> String {
    fn last_segment(path: &str) -> &str { path.rsplit("::").next().unwrap_or(path) }

    let mut short = String::with_capacity(name.len());
    let mut path = String::new();
    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            short.push_str(last_segment(&path));
            path.clear();
            short.push(ch);
        }
    }
    short.push_str(last_segment(&path));
    short
}

/// One named, typed property of a complex type
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name:       &'static str,
    type_ref:   TypeRef,
    /// Forbidden capability found beneath this property, computed on first check
    capability: OnceLock<Option<CapabilityKind>>,
}

impl PropertyDescriptor {
    /// Describe a property named `name` holding a `T`
    pub fn new<T: Shape>(name: &'static str) -> Self {
        Self {
            name,
            type_ref: TypeRef::of::<T>(),
            capability: OnceLock::new(),
        }
    }

    /// Property name as used for matching
    pub const fn name(&self) -> &'static str { self.name }

    /// Declared type of the property
    pub const fn type_ref(&self) -> TypeRef { self.type_ref }

    /// Memoized result of the capability check for this property
    pub(crate) fn capability_with(
        &self,
        check: impl FnOnce(&TypeRef) -> Option<CapabilityKind>,
    ) -> Option<CapabilityKind> {
        *self.capability.get_or_init(|| check(&self.type_ref))
    }
}

/// The full structural description of one type
#[derive(Debug, Clone)]
pub struct TypeShape {
    type_ref: TypeRef,
    kind:     ShapeKind,
}

impl TypeShape {
    /// Describe `T` with an explicit kind
    pub fn new<T: Shape>(kind: ShapeKind) -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            kind,
        }
    }

    /// A built-in scalar
    pub fn primitive<T: Shape>(kind: PrimitiveKind) -> Self {
        Self::new::<T>(ShapeKind::Primitive(kind))
    }

    /// A string type
    pub fn string<T: Shape>() -> Self { Self::new::<T>(ShapeKind::String) }

    /// A unit-only enum
    pub fn enumeration<T: Shape>(underlying: PrimitiveKind, variants: Vec<EnumVariant>) -> Self {
        Self::new::<T>(ShapeKind::Enum(EnumShape {
            underlying,
            variants,
        }))
    }

    /// An array of `E`, fixed when `length` is set
    pub fn array<T: Shape, E: Shape>(length: Option<usize>) -> Self {
        Self::new::<T>(ShapeKind::Array(ArrayShape {
            element: TypeRef::of::<E>(),
            length,
        }))
    }

    /// A growable container of `E`
    pub fn collection<T: Shape, E: Shape>(container: ContainerKind) -> Self {
        Self::new::<T>(ShapeKind::Collection(CollectionShape {
            element: TypeRef::of::<E>(),
            container,
        }))
    }

    /// An optional `E`
    pub fn optional<T: Shape, E: Shape>() -> Self {
        Self::new::<T>(ShapeKind::Optional(TypeRef::of::<E>()))
    }

    /// A smart pointer to `E`
    pub fn indirect<T: Shape, E: Shape>() -> Self {
        Self::new::<T>(ShapeKind::Indirect(TypeRef::of::<E>()))
    }

    /// A struct with named properties that can be default-constructed
    pub fn complex<T: Mappable>(properties: Vec<PropertyDescriptor>) -> Self {
        Self::new::<T>(ShapeKind::Complex(ComplexShape {
            properties,
            construct: construct_default::<T>,
        }))
    }

    /// A handle to an external resource
    pub fn resource<T: Shape>(capability: CapabilityKind) -> Self {
        Self::new::<T>(ShapeKind::Resource(capability))
    }

    /// The described type
    pub const fn type_ref(&self) -> TypeRef { self.type_ref }

    /// Fully qualified name of the described type
    pub const fn name(&self) -> &'static str { self.type_ref.name }

    /// Structural kind
    pub const fn kind(&self) -> &ShapeKind { &self.kind }

    /// Coarse classification, see [`ShapeKind::classification`]
    pub const fn classification(&self) -> Classification { self.kind.classification() }

    /// Properties of a complex type, empty for every other kind
    pub fn properties(&self) -> &[PropertyDescriptor] {
        match &self.kind {
            ShapeKind::Complex(complex) => &complex.properties,
            _ => &[],
        }
    }

    /// Look up a property by exact name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties()
            .iter()
            .find(|property| property.name == name)
    }

    /// Default constructor of a complex type
    pub const fn constructor(&self) -> Option<fn() -> Box<dyn Reflect>> {
        match &self.kind {
            ShapeKind::Complex(complex) => Some(complex.construct),
            _ => None,
        }
    }

    /// The pointee of an `Indirect` shape
    pub const fn pointee(&self) -> Option<TypeRef> {
        match &self.kind {
            ShapeKind::Indirect(inner) => Some(*inner),
            _ => None,
        }
    }
}

fn construct_default<T: Mappable>() -> Box<dyn Reflect> { Box::new(T::default()) }
