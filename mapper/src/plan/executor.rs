//! Interprets a [`MappingPlan`] against concrete objects

use error_stack::Report;

use super::{MappingPlan, OperationKind, PlanIndex};
use crate::reflect::Reflect;
use crate::value::{EnumValue, Primitive, Value, ValueError};

type ExecutionResult<T> = std::result::Result<T, Report<ValueError>>;

impl MappingPlan {
    /// Copy every planned property of `source` onto `destination`
    ///
    /// Destination properties without an operation keep their current value.
    ///
    /// # Errors
    ///
    /// Fails when a value cannot be converted at runtime, for example a dynamic array
    /// that does not fit a fixed-length destination.
    pub fn execute(
        &self,
        source: &dyn Reflect,
        destination: &mut dyn Reflect,
    ) -> ExecutionResult<()> {
        self.execute_pair(self.root, source, destination)
    }

    fn execute_pair(
        &self,
        index: PlanIndex,
        source: &dyn Reflect,
        destination: &mut dyn Reflect,
    ) -> ExecutionResult<()> {
        let plan = self
            .plan(index)
            .ok_or(ValueError::MissingPlan(index.get()))?;

        for operation in &plan.operations {
            let value = source.read_property(operation.source).ok_or_else(|| {
                ValueError::unknown_property(source.type_name(), operation.source)
            })?;
            self.apply(&operation.kind, value)
                .and_then(|mapped| {
                    destination
                        .write_property(operation.destination, mapped)
                        .map_err(Report::new)
                })
                .map_err(|report| {
                    report.attach(format!(
                        "while mapping `{}` onto `{}`",
                        operation.source, operation.destination
                    ))
                })?;
        }
        Ok(())
    }

    fn apply(&self, kind: &OperationKind, value: Value) -> ExecutionResult<Value> {
        match kind {
            OperationKind::DirectAssign => Ok(value),
            OperationKind::StringCoerce => Ok(Value::String(value.to_string())),
            OperationKind::NumericCast { target } => {
                let primitive = value.into_primitive()?;
                let cast = primitive.cast(*target).ok_or(ValueError::InvalidCast {
                    from: primitive.kind(),
                    to:   *target,
                })?;
                Ok(Value::Primitive(cast))
            },
            OperationKind::EnumUnderlyingCast { underlying, target } => {
                let discriminant = value.into_enum()?.discriminant();
                let cast = Primitive::from_discriminant(*underlying, discriminant)
                    .and_then(|raw| raw.cast(*target))
                    .ok_or(ValueError::InvalidCast {
                        from: *underlying,
                        to:   *target,
                    })?;
                Ok(Value::Primitive(cast))
            },
            OperationKind::EnumCast { target, variants } => {
                let discriminant = value.into_enum()?.discriminant();
                let variant = variants
                    .iter()
                    .find(|variant| variant.discriminant() == discriminant)
                    .ok_or(ValueError::UnknownDiscriminant {
                        type_name: target.name(),
                        discriminant,
                    })?;
                Ok(Value::Enum(EnumValue::new(
                    variant.name(),
                    variant.discriminant(),
                )))
            },
            OperationKind::EnumFromPrimitive {
                target,
                underlying,
                variants,
            } => {
                let primitive = value.into_primitive()?;
                let discriminant = primitive
                    .cast(*underlying)
                    .and_then(Primitive::to_discriminant)
                    .ok_or(ValueError::InvalidCast {
                        from: primitive.kind(),
                        to:   *underlying,
                    })?;
                let variant = variants
                    .iter()
                    .find(|variant| variant.discriminant() == discriminant)
                    .ok_or(ValueError::UnknownDiscriminant {
                        type_name: target.name(),
                        discriminant,
                    })?;
                Ok(Value::Enum(EnumValue::new(
                    variant.name(),
                    variant.discriminant(),
                )))
            },
            OperationKind::EnumParse { target, variants } => {
                let name = value.into_string()?;
                let variant = variants
                    .iter()
                    .find(|variant| variant.name() == name)
                    .ok_or_else(|| ValueError::UnknownVariant {
                        type_name: target.name(),
                        variant:   name,
                    })?;
                Ok(Value::Enum(EnumValue::new(
                    variant.name(),
                    variant.discriminant(),
                )))
            },
            OperationKind::NestedComplex { plan } => {
                let source = value.into_complex()?;
                let nested = self
                    .plan(*plan)
                    .ok_or(ValueError::MissingPlan(plan.get()))?;
                let mut destination = (nested.construct)();
                self.execute_pair(*plan, source.as_ref(), destination.as_mut())?;
                Ok(Value::Complex(destination))
            },
            OperationKind::ArrayCopy { element } => {
                Ok(Value::Array(self.apply_elements(element, value)?))
            },
            OperationKind::CollectionCopy { element } => {
                Ok(Value::Collection(self.apply_elements(element, value)?))
            },
            OperationKind::OptionMap { inner } => match value.into_optional()? {
                Some(contained) => Ok(Value::Optional(Some(Box::new(
                    self.apply(inner, contained)?,
                )))),
                None => Ok(Value::Optional(None)),
            },
            OperationKind::WrapSome { inner } => {
                Ok(Value::Optional(Some(Box::new(self.apply(inner, value)?))))
            },
        }
    }

    fn apply_elements(&self, element: &OperationKind, value: Value) -> ExecutionResult<Vec<Value>> {
        value
            .into_elements()?
            .into_iter()
            .map(|item| self.apply(element, item))
            .collect()
    }
}
