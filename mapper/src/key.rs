use std::fmt;

use serde::Serialize;

use crate::constants::MAPPER_NAME_SEPARATOR;
use crate::shape::{Shape, TypeRef};

/// Identity of a mapper: the ordered pair of input and output types
///
/// `(A, B)` and `(B, A)` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypePairKey {
    input:  TypeRef,
    output: TypeRef,
}

impl TypePairKey {
    /// Key for mapping `I` into `O`
    pub fn of<I: Shape, O: Shape>() -> Self { Self::new(TypeRef::of::<I>(), TypeRef::of::<O>()) }

    /// Key from two type handles
    pub const fn new(input: TypeRef, output: TypeRef) -> Self { Self { input, output } }

    /// Source type
    pub const fn input(&self) -> TypeRef { self.input }

    /// Destination type
    pub const fn output(&self) -> TypeRef { self.output }

    /// The key of the opposite direction
    #[must_use]
    pub const fn reversed(&self) -> Self { Self::new(self.output, self.input) }

    /// Name of the mapper for this pair, e.g. `OriginToDestination`
    pub fn mapper_name(&self) -> String {
        format!(
            "{}{MAPPER_NAME_SEPARATOR}{}",
            self.input.short_name(),
            self.output.short_name()
        )
    }
}

impl fmt::Display for TypePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}
