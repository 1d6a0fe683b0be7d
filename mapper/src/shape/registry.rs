//! Thread-safe cache of introspected type shapes

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use super::{TypeRef, TypeShape};

/// Caches [`TypeShape`]s by [`TypeId`] so each type is introspected once
///
/// Shapes are shared, so memoized per-property results (such as the capability check)
/// survive across plan builds that use the same registry.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: DashMap<TypeId, Arc<TypeShape>>,
}

impl ShapeRegistry {
    /// Create an empty registry
    pub fn new() -> Self { Self::default() }

    /// Shape of `type_ref`, introspecting it on first request
    pub fn resolve(&self, type_ref: &TypeRef) -> Arc<TypeShape> {
        if let Some(shape) = self.shapes.get(&type_ref.id()) {
            return Arc::clone(shape.value());
        }

        trace!("Introspecting shape of {}", type_ref.name());
        let shape = Arc::new(type_ref.describe());
        Arc::clone(self.shapes.entry(type_ref.id()).or_insert(shape).value())
    }

    /// Shape of `type_ref` with `Box`/`Arc` layers resolved to their pointee
    pub fn effective(&self, type_ref: &TypeRef) -> Arc<TypeShape> {
        let mut shape = self.resolve(type_ref);
        while let Some(pointee) = shape.pointee() {
            shape = self.resolve(&pointee);
        }
        shape
    }

    /// Number of cached shapes
    pub fn len(&self) -> usize { self.shapes.len() }

    /// Whether no shape has been introspected yet
    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }
}
