//! Runtime property access for complex objects
//!
//! [`Reflect`] is the dynamic half of a mappable type: the executor reads source
//! properties and writes destination properties through it without knowing the
//! concrete types. [`IntoValue`] and [`FromValue`] convert individual property
//! values to and from [`Value`].

use std::any::Any;

use crate::shape::Shape;
use crate::value::{Value, ValueError};

/// Named property access on a complex object
pub trait Reflect: Any {
    /// Fully qualified name of the concrete type
    fn type_name(&self) -> &'static str;

    /// Read a property, `None` when no property has that name
    fn read_property(&self, name: &str) -> Option<Value>;

    /// Overwrite a property
    ///
    /// # Errors
    ///
    /// Fails when no property has that name or the value does not convert to its type.
    fn write_property(&mut self, name: &str, value: Value) -> Result<(), ValueError>;

    /// Deep copy behind a fresh box
    fn clone_boxed(&self) -> Box<dyn Reflect>;

    /// Borrow as [`Any`] for type checks
    fn as_any(&self) -> &dyn Any;

    /// Convert into [`Any`] for downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A type that can serve as the input or output of a mapper
///
/// Implemented automatically for every `Shape + Reflect + Default` type, which
/// `#[derive(Mappable)]` provides for structs with named fields.
pub trait Mappable: Shape + Reflect + Default {}

impl<T: Shape + Reflect + Default> Mappable for T {}

/// Conversion of a property value into a [`Value`]
pub trait IntoValue {
    /// Copy `self` into a dynamic value
    fn to_value(&self) -> Value;
}

/// Conversion of a [`Value`] back into a concrete property value
pub trait FromValue: Sized {
    /// Rebuild `Self` from a dynamic value
    ///
    /// # Errors
    ///
    /// Fails when the value has the wrong kind or does not fit `Self`.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}
