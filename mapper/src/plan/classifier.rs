use crate::shape::TypeShape;

/// Whether every input property exists on the output with exactly the same declared type
///
/// Extra output properties do not matter. Types are compared by identity, so `i32` and
/// `i64` differ, as do `Vec<i32>` and `VecDeque<i32>`.
pub fn is_symmetric(input: &TypeShape, output: &TypeShape) -> bool {
    input.properties().iter().all(|property| {
        output
            .property(property.name())
            .is_some_and(|counterpart| counterpart.type_ref() == property.type_ref())
    })
}
