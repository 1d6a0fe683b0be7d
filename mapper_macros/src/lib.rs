//! Procedural macros for shape_mapper

mod attributes;
mod enumeration;
mod record;

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, parse_macro_input};

/// Derives the introspection and property-access traits a type needs to be mapped.
///
/// # Structs
///
/// Structs with named fields become complex shapes. The type must also implement
/// `Clone` and `Default`.
///
/// ```ignore
/// #[derive(Mappable, Clone, Default)]
/// #[mapper(rename_all = "PascalCase")]
/// struct Origin {
///     name:   String,
///     #[mapper(rename = "Child")]
///     nested: Child,
///     #[mapper(skip)]
///     cache:  Vec<u8>,
/// }
/// ```
///
/// This will generate `Shape`, `Reflect`, `IntoValue` and `FromValue` implementations
/// with the properties `Name` and `Child`.
///
/// # Enums
///
/// Unit-only enums become enum shapes whose underlying representation is taken from
/// `#[repr(..)]`, `isize` otherwise.
///
/// ```ignore
/// #[derive(Mappable, Clone, Copy)]
/// #[repr(u8)]
/// enum Kind { First = 1, Second = 2 }
/// ```
///
/// # Resource handles
///
/// `#[mapper(capability = "database")]` marks a type as a handle to an external
/// resource. Mappers refuse any property holding it. Accepted values: `stream`,
/// `socket`, `database`, `filesystem`, `foreign`.
#[proc_macro_derive(Mappable, attributes(mapper))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match &input.data {
        Data::Struct(data) => record::expand(&input, data),
        Data::Enum(data) => enumeration::expand(&input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Mappable cannot be derived for unions",
        )),
    };

    expanded
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
