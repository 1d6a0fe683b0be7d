//! `#[derive(Mappable)]` for unit-only enums

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, Ident};

use crate::attributes::{ContainerAttributes, MemberAttributes, reject_generics, resource_impls};

const INTEGER_REPRS: &[(&str, &str)] = &[
    ("i8", "I8"),
    ("i16", "I16"),
    ("i32", "I32"),
    ("i64", "I64"),
    ("i128", "I128"),
    ("isize", "Isize"),
    ("u8", "U8"),
    ("u16", "U16"),
    ("u32", "U32"),
    ("u64", "U64"),
    ("u128", "U128"),
    ("usize", "Usize"),
];

pub fn expand(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    reject_generics(input)?;
    let container = ContainerAttributes::parse(input)?;
    let ident = &input.ident;

    if let Some(capability) = &container.capability {
        return Ok(resource_impls(ident, capability));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            ident,
            "Mappable cannot be derived for enums without variants",
        ));
    }

    let mut variants = Vec::new();
    let mut names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Mappable can only be derived for enums whose variants have no fields",
            ));
        }
        let member = MemberAttributes::parse(&variant.attrs)?;
        if member.skip {
            return Err(syn::Error::new_spanned(
                variant,
                "`skip` is not supported on enum variants",
            ));
        }
        names.push(container.property_name(&variant.ident, &member));
        variants.push(&variant.ident);
    }

    let underlying = underlying_kind(input)?;

    Ok(quote! {
        impl ::shape_mapper::Shape for #ident {
            fn describe() -> ::shape_mapper::TypeShape {
                ::shape_mapper::TypeShape::enumeration::<Self>(
                    ::shape_mapper::PrimitiveKind::#underlying,
                    ::std::vec![
                        #(::shape_mapper::EnumVariant::new(#names, Self::#variants as i128)),*
                    ],
                )
            }
        }

        impl ::shape_mapper::IntoValue for #ident {
            fn to_value(&self) -> ::shape_mapper::Value {
                let (variant, discriminant) = match self {
                    #(Self::#variants => (#names, Self::#variants as i128),)*
                };
                ::shape_mapper::Value::Enum(::shape_mapper::EnumValue::new(variant, discriminant))
            }
        }

        impl ::shape_mapper::FromValue for #ident {
            fn from_value(
                value: ::shape_mapper::Value,
            ) -> ::std::result::Result<Self, ::shape_mapper::ValueError> {
                let discriminant = value.into_enum()?.discriminant();
                #(
                    if discriminant == Self::#variants as i128 {
                        return ::std::result::Result::Ok(Self::#variants);
                    }
                )*
                ::std::result::Result::Err(::shape_mapper::ValueError::UnknownDiscriminant {
                    type_name: ::std::any::type_name::<Self>(),
                    discriminant,
                })
            }
        }
    })
}

/// `PrimitiveKind` variant named by `#[repr(..)]`, `Isize` when there is none
fn underlying_kind(input: &DeriveInput) -> syn::Result<Ident> {
    let mut kind = "Isize";
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if let Some((_, variant)) = INTEGER_REPRS
                .iter()
                .find(|(repr, _)| meta.path.is_ident(repr))
            {
                kind = *variant;
            }
            Ok(())
        })?;
    }
    Ok(Ident::new(kind, Span::call_site()))
}
