//! Builds [`MappingPlan`]s by recursing through the property shapes of a type pair
//!
//! Each distinct type pair is planned once per build: a pair already in progress (a
//! cycle) or already finished is referenced by its [`PlanIndex`].

use std::collections::HashMap;
use std::sync::Arc;

use error_stack::{Report, ResultExt};
use tracing::{debug, trace};

use super::classifier::is_symmetric;
use super::guard::CapabilityGuard;
use super::{MappingPlan, OperationKind, PairPlan, PlanIndex, PropertyOperation, Strategy};
use crate::config::MapperConfig;
use crate::constants::RecursionDepth;
use crate::error::{Error, Result};
use crate::key::TypePairKey;
use crate::shape::{
    Classification, PropertyDescriptor, ShapeKind, ShapeRegistry, TypeRef, TypeShape,
};

/// Where an operation is being selected: directly for a property, or for the elements
/// of a container property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Property,
    Element,
}

/// The property currently being planned, for error messages
struct PropertySite<'s> {
    property:  &'static str,
    enclosing: &'s TypeShape,
}

/// Plans one direction of a mapper
pub struct PlanBuilder<'a> {
    registry:  &'a ShapeRegistry,
    max_depth: usize,
    plans:     Vec<Option<PairPlan>>,
    planned:   HashMap<TypePairKey, PlanIndex>,
}

impl<'a> PlanBuilder<'a> {
    /// Builder resolving shapes through `registry`
    pub fn new(registry: &'a ShapeRegistry, config: &MapperConfig) -> Self {
        Self {
            registry,
            max_depth: config.max_depth,
            plans: Vec::new(),
            planned: HashMap::new(),
        }
    }

    /// Plan mapping `input` into `output`
    ///
    /// The root strategy is classified unless `strategy` forces one; nested pairs are
    /// always classified.
    ///
    /// # Errors
    ///
    /// Fails when any property considered for mapping is forbidden, has no conversion,
    /// or nests deeper than the configured limit.
    pub fn build(
        mut self,
        input: TypeRef,
        output: TypeRef,
        strategy: Option<Strategy>,
    ) -> Result<MappingPlan> {
        let root = self.plan_pair(input, output, strategy, RecursionDepth::ZERO)?;
        let plans = self
            .plans
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                Report::new(Error::InvalidState(format!(
                    "plan for {} -> {} left a pair unfinished",
                    input.short_name(),
                    output.short_name()
                )))
            })?;
        Ok(MappingPlan { root, plans })
    }

    fn plan_pair(
        &mut self,
        input: TypeRef,
        output: TypeRef,
        strategy: Option<Strategy>,
        depth: RecursionDepth,
    ) -> Result<PlanIndex> {
        let key = TypePairKey::new(input, output);
        if let Some(index) = self.planned.get(&key) {
            trace!("Reusing plan {index} for {key}");
            return Ok(*index);
        }
        if depth.exceeds_limit(self.max_depth) {
            return Err(Report::new(Error::RecursionLimitExceeded {
                input:  input.short_name(),
                output: output.short_name(),
                limit:  self.max_depth,
            }));
        }

        let input_shape = self.registry.effective(&input);
        let output_shape = self.registry.effective(&output);
        let (ShapeKind::Complex(_), ShapeKind::Complex(output_complex)) =
            (input_shape.kind(), output_shape.kind())
        else {
            return Err(Report::new(Error::unconvertible(
                input.short_name(),
                output.short_name(),
            )))
            .attach("both sides of a mapped type pair must be structs with named properties");
        };
        let construct = output_complex.construct;

        let index = PlanIndex(self.plans.len());
        self.plans.push(None);
        self.planned.insert(key, index);

        let strategy = strategy.unwrap_or_else(|| {
            if is_symmetric(&input_shape, &output_shape) {
                Strategy::Symmetric
            } else {
                Strategy::Asymmetric
            }
        });
        debug!("Planning {key} as {strategy} at depth {}", *depth);

        let operations = match strategy {
            Strategy::Symmetric => self.symmetric_operations(&input_shape, &output_shape, depth)?,
            Strategy::Asymmetric => {
                self.asymmetric_operations(&input_shape, &output_shape, depth)?
            },
        };

        if let Some(slot) = self.plans.get_mut(index.0) {
            *slot = Some(PairPlan {
                input,
                output,
                strategy,
                operations,
                construct,
            });
        }
        Ok(index)
    }

    /// Every input property in declaration order: a direct copy, or the container rules
    /// for arrays and collections
    fn symmetric_operations(
        &mut self,
        input: &TypeShape,
        output: &TypeShape,
        depth: RecursionDepth,
    ) -> Result<Vec<PropertyOperation>> {
        let guard = CapabilityGuard::new(self.registry);
        let mut operations = Vec::with_capacity(input.properties().len());

        for property in input.properties() {
            let kind = guard
                .check_property(&input.type_ref(), property)
                .and_then(|()| {
                    let declared = self.registry.effective(&property.type_ref());
                    match declared.classification() {
                        Classification::Array | Classification::Collection => {
                            let site = PropertySite {
                                property:  property.name(),
                                enclosing: input,
                            };
                            self.select_operation(
                                &site,
                                property.type_ref(),
                                property.type_ref(),
                                Position::Property,
                                depth,
                            )
                        },
                        _ => Ok(OperationKind::DirectAssign),
                    }
                })
                .change_context_lazy(|| {
                    Error::plan_generation(input.name(), output.name(), property.name())
                })?;
            operations.push(PropertyOperation::same_name(property.name(), kind));
        }
        Ok(operations)
    }

    /// Every output property in declaration order that has a same-named input property
    fn asymmetric_operations(
        &mut self,
        input: &TypeShape,
        output: &TypeShape,
        depth: RecursionDepth,
    ) -> Result<Vec<PropertyOperation>> {
        let mut operations = Vec::with_capacity(output.properties().len());

        for destination in output.properties() {
            let Some(source) = input.property(destination.name()) else {
                trace!(
                    "Skipping {}.{}: no source property",
                    output.type_ref().short_name(),
                    destination.name()
                );
                continue;
            };
            let kind = self
                .property_operation(input, output, source, destination, depth)
                .change_context_lazy(|| {
                    Error::plan_generation(input.name(), output.name(), destination.name())
                })?;
            operations.push(PropertyOperation {
                source: source.name(),
                destination: destination.name(),
                kind,
            });
        }
        Ok(operations)
    }

    fn property_operation(
        &mut self,
        input: &TypeShape,
        output: &TypeShape,
        source: &PropertyDescriptor,
        destination: &PropertyDescriptor,
        depth: RecursionDepth,
    ) -> Result<OperationKind> {
        let guard = CapabilityGuard::new(self.registry);
        guard.check_property(&input.type_ref(), source)?;
        guard.check_property(&output.type_ref(), destination)?;

        let site = PropertySite {
            property:  source.name(),
            enclosing: input,
        };
        self.select_operation(
            &site,
            source.type_ref(),
            destination.type_ref(),
            Position::Property,
            depth,
        )
    }

    /// Pick the conversion from `source` to `destination`, first matching rule wins
    fn select_operation(
        &mut self,
        site: &PropertySite<'_>,
        source: TypeRef,
        destination: TypeRef,
        position: Position,
        depth: RecursionDepth,
    ) -> Result<OperationKind> {
        let source_shape = self.registry.effective(&source);
        let destination_shape = self.registry.effective(&destination);

        if source_shape.type_ref() == destination_shape.type_ref() {
            match source_shape.classification() {
                Classification::Array | Classification::Collection => {},
                Classification::Complex if position == Position::Element => {},
                _ => return Ok(OperationKind::DirectAssign),
            }
        }

        match (source_shape.kind(), destination_shape.kind()) {
            (ShapeKind::Array(from), ShapeKind::Array(to)) => {
                if let (Some(from_length), Some(to_length)) = (from.length, to.length)
                    && from_length != to_length
                {
                    return Err(structural_mismatch(site, &source_shape, &destination_shape))
                        .attach(format!(
                            "fixed lengths differ: {from_length} and {to_length}"
                        ));
                }
                let element =
                    self.select_operation(site, from.element, to.element, Position::Element, depth)?;
                Ok(OperationKind::ArrayCopy {
                    element: Box::new(element),
                })
            },
            (ShapeKind::Collection(from), ShapeKind::Collection(to)) => {
                let element =
                    self.select_operation(site, from.element, to.element, Position::Element, depth)?;
                Ok(OperationKind::CollectionCopy {
                    element: Box::new(element),
                })
            },
            (ShapeKind::Array(_) | ShapeKind::Collection(_), _)
            | (_, ShapeKind::Array(_) | ShapeKind::Collection(_)) => {
                Err(structural_mismatch(site, &source_shape, &destination_shape))
            },
            (ShapeKind::Optional(from), ShapeKind::Optional(to)) => {
                let inner = self.select_operation(site, *from, *to, position, depth)?;
                Ok(OperationKind::OptionMap {
                    inner: Box::new(inner),
                })
            },
            (_, ShapeKind::Optional(to)) => {
                let inner = self.select_operation(site, source, *to, position, depth)?;
                Ok(OperationKind::WrapSome {
                    inner: Box::new(inner),
                })
            },
            (_, ShapeKind::String) => Ok(OperationKind::StringCoerce),
            (ShapeKind::Primitive(from), ShapeKind::Primitive(to)) if from.is_castable_to(*to) => {
                Ok(OperationKind::NumericCast { target: *to })
            },
            (ShapeKind::Enum(from), ShapeKind::Primitive(to))
                if from.underlying.is_castable_to(*to) =>
            {
                Ok(OperationKind::EnumUnderlyingCast {
                    underlying: from.underlying,
                    target:     *to,
                })
            },
            (ShapeKind::Enum(from), ShapeKind::Enum(to)) => {
                if let Some(missing) = from
                    .variants
                    .iter()
                    .find(|variant| to.variant_for(variant.discriminant()).is_none())
                {
                    return Err(unconvertible(&source_shape, &destination_shape)).attach(format!(
                        "variant `{}` has no counterpart with discriminant {}",
                        missing.name(),
                        missing.discriminant()
                    ));
                }
                Ok(OperationKind::EnumCast {
                    target:   destination_shape.type_ref(),
                    variants: to.variants.clone(),
                })
            },
            (ShapeKind::Primitive(from), ShapeKind::Enum(to))
                if from.is_castable_to(to.underlying) =>
            {
                Ok(OperationKind::EnumFromPrimitive {
                    target:     destination_shape.type_ref(),
                    underlying: to.underlying,
                    variants:   to.variants.clone(),
                })
            },
            (ShapeKind::String, ShapeKind::Enum(to)) => Ok(OperationKind::EnumParse {
                target:   destination_shape.type_ref(),
                variants: to.variants.clone(),
            }),
            (ShapeKind::Complex(_), ShapeKind::Complex(_)) => {
                let plan = self.plan_pair(
                    source_shape.type_ref(),
                    destination_shape.type_ref(),
                    None,
                    depth.increment(),
                )?;
                Ok(OperationKind::NestedComplex { plan })
            },
            _ => Err(unconvertible(&source_shape, &destination_shape)),
        }
    }
}

fn unconvertible(source: &Arc<TypeShape>, destination: &Arc<TypeShape>) -> Report<Error> {
    Report::new(Error::unconvertible(
        source.type_ref().short_name(),
        destination.type_ref().short_name(),
    ))
}

/// Names the element types when both sides are containers, the container types otherwise
fn structural_mismatch(
    site: &PropertySite<'_>,
    source: &Arc<TypeShape>,
    destination: &Arc<TypeShape>,
) -> Report<Error> {
    let element_name = |shape: &TypeShape| {
        shape
            .kind()
            .element()
            .unwrap_or_else(|| shape.type_ref())
            .short_name()
    };
    Report::new(Error::StructuralMismatch {
        source_element:      element_name(source),
        destination_element: element_name(destination),
        property:            site.property.to_string(),
        enclosing_type:      site.enclosing.type_ref().short_name(),
    })
}
