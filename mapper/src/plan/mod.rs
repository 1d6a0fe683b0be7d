//! Mapping plans: which operation copies each property of a type pair
//!
//! A [`MappingPlan`] is an arena of [`PairPlan`]s. The root entry maps the requested
//! type pair; nested complex properties refer to other entries by [`PlanIndex`], so a
//! type that contains itself (through a collection, an `Option<Box<..>>`, ...) plans to
//! a finite, cyclic structure.

mod builder;
mod classifier;
mod executor;
mod guard;

#[cfg(test)]
mod tests;

use std::fmt;

pub use builder::PlanBuilder;
pub use classifier::is_symmetric;
pub use guard::CapabilityGuard;
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::reflect::Reflect;
use crate::shape::{EnumVariant, PrimitiveKind, TypeRef};

/// How the operations of a pair plan were selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
pub enum Strategy {
    /// Every input property exists on the output with an identical type
    Symmetric,
    /// Properties are matched by name and coerced per pair of types
    Asymmetric,
}

/// Position of a [`PairPlan`] inside its [`MappingPlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlanIndex(usize);

impl PlanIndex {
    /// Index into [`MappingPlan::plans`]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for PlanIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// What to do with one source property value to obtain the destination value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationKind {
    /// Copy the value unchanged
    DirectAssign,
    /// Replace the value with its textual representation
    StringCoerce,
    /// `as` cast between primitives
    NumericCast {
        /// Destination primitive
        target: PrimitiveKind,
    },
    /// Enum discriminant to a primitive
    EnumUnderlyingCast {
        /// Representation of the source enum
        underlying: PrimitiveKind,
        /// Destination primitive
        target:     PrimitiveKind,
    },
    /// Enum to enum, matching variants by discriminant
    EnumCast {
        /// Destination enum
        target:   TypeRef,
        /// Destination variants
        variants: Vec<EnumVariant>,
    },
    /// Primitive to the enum variant with that discriminant
    EnumFromPrimitive {
        /// Destination enum
        target:     TypeRef,
        /// Representation of the destination enum
        underlying: PrimitiveKind,
        /// Destination variants
        variants:   Vec<EnumVariant>,
    },
    /// Variant name to the enum variant
    EnumParse {
        /// Destination enum
        target:   TypeRef,
        /// Destination variants
        variants: Vec<EnumVariant>,
    },
    /// Map a complex value through another pair plan into a fresh destination object
    NestedComplex {
        /// Entry of the nested pair
        plan: PlanIndex,
    },
    /// Map every element into a fresh array of the source's length
    ArrayCopy {
        /// Per-element operation
        element: Box<Self>,
    },
    /// Map every element into a fresh collection
    CollectionCopy {
        /// Per-element operation
        element: Box<Self>,
    },
    /// `Option<A>` to `Option<B>`, `None` stays `None`
    OptionMap {
        /// Operation on the contained value
        inner: Box<Self>,
    },
    /// `A` to `Option<B>`, always `Some`
    WrapSome {
        /// Operation on the value before wrapping
        inner: Box<Self>,
    },
}

/// One step of a pair plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyOperation {
    /// Property read from the source object
    pub source:      &'static str,
    /// Property written on the destination object
    pub destination: &'static str,
    /// Conversion between the two
    pub kind:        OperationKind,
}

impl PropertyOperation {
    /// Operation between two properties with the same name
    pub const fn same_name(name: &'static str, kind: OperationKind) -> Self {
        Self {
            source: name,
            destination: name,
            kind,
        }
    }

    /// The operation for mapping in the opposite direction
    ///
    /// Only meaningful for `DirectAssign` and identical-container copies, which is all
    /// a symmetric plan contains.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            source:      self.destination,
            destination: self.source,
            kind:        self.kind.clone(),
        }
    }
}

/// The ordered operations that map one input type to one output type
#[derive(Debug, Clone, Serialize)]
pub struct PairPlan {
    /// Source type
    pub input:      TypeRef,
    /// Destination type
    pub output:     TypeRef,
    /// How the operations were selected
    pub strategy:   Strategy,
    /// Property operations, applied in order
    pub operations: Vec<PropertyOperation>,
    /// Builds a default destination when this pair is reached as a nested property
    #[serde(skip)]
    pub construct:  fn() -> Box<dyn Reflect>,
}

/// Complete plan for one direction of a mapper
#[derive(Debug, Clone, Serialize)]
pub struct MappingPlan {
    root:  PlanIndex,
    plans: Vec<PairPlan>,
}

impl MappingPlan {
    /// The pair plan for the requested type pair
    pub fn root(&self) -> &PairPlan { &self.plans[self.root.0] }

    /// Index of the root pair plan
    pub const fn root_index(&self) -> PlanIndex { self.root }

    /// Pair plan at `index`
    pub fn plan(&self, index: PlanIndex) -> Option<&PairPlan> { self.plans.get(index.0) }

    /// All pair plans, root included
    pub fn plans(&self) -> &[PairPlan] { &self.plans }

    /// Strategy of the root pair
    pub fn strategy(&self) -> Strategy { self.root().strategy }

    /// The symmetric plan for the opposite direction
    ///
    /// Swaps the root pair's types and property roles; nested pairs of a symmetric plan
    /// map a type onto itself and are shared unchanged. `construct` builds the new
    /// root's destination, which is the forward input type.
    #[must_use]
    pub fn reversed(&self, construct: fn() -> Box<dyn Reflect>) -> Self {
        let mut plans = self.plans.clone();
        let forward = self.root();
        plans[self.root.0] = PairPlan {
            input: forward.output,
            output: forward.input,
            strategy: forward.strategy,
            operations: forward
                .operations
                .iter()
                .map(PropertyOperation::swapped)
                .collect(),
            construct,
        };
        Self {
            root: self.root,
            plans,
        }
    }
}
