//! Built mappers: the untyped [`CompiledMapper`] stored in the cache and the typed
//! [`Mapper`] handle handed to callers

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use error_stack::{Report, ResultExt};
use serde_json::json;
use tracing::debug;

use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::key::TypePairKey;
use crate::plan::{MappingPlan, PlanBuilder, Strategy};
use crate::reflect::{Mappable, Reflect};
use crate::shape::{ShapeRegistry, TypeRef};

/// Forward and reverse plans for one type pair
///
/// Both directions must plan for the mapper to be built.
#[derive(Debug)]
pub struct CompiledMapper {
    key:     TypePairKey,
    name:    String,
    forward: MappingPlan,
    reverse: MappingPlan,
}

impl CompiledMapper {
    /// Plan both directions of `key`
    ///
    /// A symmetric forward plan is reversed by swapping property roles; otherwise the
    /// output-to-input direction gets its own asymmetric plan.
    pub(crate) fn compile(
        key: TypePairKey,
        registry: &ShapeRegistry,
        config: &MapperConfig,
    ) -> Result<Self> {
        let forward = PlanBuilder::new(registry, config).build(key.input(), key.output(), None)?;

        let reverse = match forward.strategy() {
            Strategy::Symmetric => {
                let construct = registry
                    .effective(&key.input())
                    .constructor()
                    .ok_or_else(|| {
                        Report::new(Error::Instantiation {
                            input:  key.input().short_name(),
                            output: key.output().short_name(),
                        })
                    })
                    .attach("input type has no default constructor")?;
                forward.reversed(construct)
            },
            Strategy::Asymmetric => PlanBuilder::new(registry, config)
                .build(key.output(), key.input(), Some(Strategy::Asymmetric))
                .attach("while planning the reverse direction")?,
        };

        Ok(Self {
            key,
            name: key.mapper_name(),
            forward,
            reverse,
        })
    }

    /// The type pair this mapper converts
    pub const fn key(&self) -> TypePairKey { self.key }

    /// Mapper name, `{Input}To{Output}`
    pub fn name(&self) -> &str { &self.name }

    /// Strategy of the forward direction
    pub fn strategy(&self) -> Strategy { self.forward.strategy() }

    /// Input-to-output plan
    pub const fn forward_plan(&self) -> &MappingPlan { &self.forward }

    /// Output-to-input plan
    pub const fn reverse_plan(&self) -> &MappingPlan { &self.reverse }

    /// Copy the mapped properties of an input object onto an output object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when the objects are not this mapper's types or a
    /// value fails to convert.
    pub fn map_into(&self, source: &dyn Reflect, destination: &mut dyn Reflect) -> Result<()> {
        self.run(&self.forward, self.key, source, destination)
    }

    /// Copy the mapped properties of an output object back onto an input object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when the objects are not this mapper's types or a
    /// value fails to convert.
    pub fn reverse_map_into(
        &self,
        source: &dyn Reflect,
        destination: &mut dyn Reflect,
    ) -> Result<()> {
        self.run(&self.reverse, self.key.reversed(), source, destination)
    }

    fn run(
        &self,
        plan: &MappingPlan,
        direction: TypePairKey,
        source: &dyn Reflect,
        destination: &mut dyn Reflect,
    ) -> Result<()> {
        let conversion = || Error::Conversion {
            mapper: self.name.clone(),
        };
        check_type(direction.input(), source).change_context_lazy(conversion)?;
        check_type(direction.output(), &*destination).change_context_lazy(conversion)?;

        plan.execute(source, destination)
            .change_context_lazy(conversion)
    }

    /// Both plans as JSON, for debugging
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if a plan fails to serialize.
    pub fn describe(&self) -> Result<serde_json::Value> {
        let serialize = |plan: &MappingPlan| {
            serde_json::to_value(plan)
                .map_err(|error| Report::new(Error::InvalidState(error.to_string())))
        };
        Ok(json!({
            "name": self.name,
            "input": self.key.input(),
            "output": self.key.output(),
            "strategy": self.strategy(),
            "forward": serialize(&self.forward)?,
            "reverse": serialize(&self.reverse)?,
        }))
    }
}

fn check_type(expected: TypeRef, object: &dyn Reflect) -> Result<()> {
    if object.as_any().type_id() == expected.id() {
        return Ok(());
    }
    debug!(
        "Rejecting {} where {} was expected",
        object.type_name(),
        expected.name()
    );
    Err(Report::new(Error::InvalidState(format!(
        "expected an object of type `{}`, found `{}`",
        expected.name(),
        object.type_name()
    ))))
}

/// Typed handle to a cached mapper from `I` to `O`
///
/// Cheap to clone; every clone shares the same compiled plans.
pub struct Mapper<I, O> {
    compiled: Arc<CompiledMapper>,
    types:    PhantomData<fn(&I) -> O>,
}

impl<I: Mappable, O: Mappable> Mapper<I, O> {
    /// Bind a compiled mapper to its static types
    ///
    /// # Errors
    ///
    /// Returns [`Error::Instantiation`] when `compiled` was built for another pair.
    pub fn bind(compiled: Arc<CompiledMapper>) -> Result<Self> {
        let requested = TypePairKey::of::<I, O>();
        if compiled.key() != requested {
            return Err(Report::new(Error::Instantiation {
                input:  requested.input().short_name(),
                output: requested.output().short_name(),
            }))
            .attach(format!("the stored mapper converts {}", compiled.key()));
        }
        Ok(Self {
            compiled,
            types: PhantomData,
        })
    }

    /// Map an input object to a new, default-initialized output object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when a property value fails to convert.
    pub fn map(&self, input: &I) -> Result<O> {
        let mut output = O::default();
        self.compiled.map_into(input, &mut output)?;
        Ok(output)
    }

    /// Map an output object back to a new, default-initialized input object
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when a property value fails to convert.
    pub fn reverse_map(&self, output: &O) -> Result<I> {
        let mut input = I::default();
        self.compiled.reverse_map_into(output, &mut input)?;
        Ok(input)
    }

    /// The shared compiled mapper
    pub const fn compiled(&self) -> &Arc<CompiledMapper> { &self.compiled }
}

impl<I, O> Clone for Mapper<I, O> {
    fn clone(&self) -> Self {
        Self {
            compiled: Arc::clone(&self.compiled),
            types:    PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Mapper<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("name", &self.compiled.name())
            .finish_non_exhaustive()
    }
}
