use std::any::TypeId;
use std::collections::HashSet;

use error_stack::Report;
use tracing::debug;

use crate::error::{Error, Result};
use crate::shape::{CapabilityKind, PropertyDescriptor, ShapeKind, ShapeRegistry, TypeRef};

/// Rejects properties whose type is, or wraps, a handle to an external resource
pub struct CapabilityGuard<'a> {
    registry: &'a ShapeRegistry,
}

impl<'a> CapabilityGuard<'a> {
    /// Guard resolving shapes through `registry`
    pub const fn new(registry: &'a ShapeRegistry) -> Self { Self { registry } }

    /// The forbidden capability of `type_ref`, looking through `Option`, `Box`/`Arc`,
    /// arrays, collections and the properties of nested structs
    pub fn capability_of(&self, type_ref: &TypeRef) -> Option<CapabilityKind> {
        self.find_capability(type_ref, &mut HashSet::new())
    }

    fn find_capability(
        &self,
        type_ref: &TypeRef,
        visited: &mut HashSet<TypeId>,
    ) -> Option<CapabilityKind> {
        if !visited.insert(type_ref.id()) {
            return None;
        }
        let shape = self.registry.resolve(type_ref);
        match shape.kind() {
            ShapeKind::Resource(capability) => Some(*capability),
            ShapeKind::Optional(inner) | ShapeKind::Indirect(inner) => {
                self.find_capability(inner, visited)
            },
            ShapeKind::Array(array) => self.find_capability(&array.element, visited),
            ShapeKind::Collection(collection) => {
                self.find_capability(&collection.element, visited)
            },
            ShapeKind::Complex(complex) => complex
                .properties
                .iter()
                .find_map(|property| self.find_capability(&property.type_ref(), visited)),
            ShapeKind::Primitive(_) | ShapeKind::String | ShapeKind::Enum(_) => None,
        }
    }

    /// Fail with [`Error::ForbiddenCapability`] when `property` of `owner` is forbidden
    ///
    /// The result is memoized on the property descriptor.
    pub fn check_property(&self, owner: &TypeRef, property: &PropertyDescriptor) -> Result<()> {
        let Some(capability) =
            property.capability_with(|type_ref| self.capability_of(type_ref))
        else {
            return Ok(());
        };

        debug!(
            "Rejecting property '{}' of {}: {capability}",
            property.name(),
            owner.short_name()
        );
        Err(Report::new(Error::ForbiddenCapability {
            property: property.name().to_string(),
            type_name: property.type_ref().name().to_string(),
            capability,
        })
        .attach(format!("declared on `{}`", owner.name())))
    }
}
