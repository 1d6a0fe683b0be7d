//! `#[derive(Mappable)]` for structs with named fields

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields};

use crate::attributes::{ContainerAttributes, MemberAttributes, reject_generics, resource_impls};

pub fn expand(input: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    reject_generics(input)?;
    let container = ContainerAttributes::parse(input)?;
    let ident = &input.ident;

    if let Some(capability) = &container.capability {
        return Ok(resource_impls(ident, capability));
    }

    let declared = match &data.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Mappable can only be derived for structs with named fields",
            ));
        },
    };

    let mut fields = Vec::new();
    let mut names = Vec::new();
    let mut types = Vec::new();
    for field in declared {
        let member = MemberAttributes::parse(&field.attrs)?;
        if member.skip {
            continue;
        }
        let Some(field_ident) = &field.ident else {
            continue;
        };
        names.push(container.property_name(field_ident, &member));
        fields.push(field_ident);
        types.push(&field.ty);
    }

    if let Some(duplicate) = names
        .iter()
        .enumerate()
        .find_map(|(index, name)| names[..index].contains(name).then_some(name))
    {
        return Err(syn::Error::new_spanned(
            ident,
            format!("two fields are mapped under the property name `{duplicate}`"),
        ));
    }

    Ok(quote! {
        impl ::shape_mapper::Shape for #ident {
            fn describe() -> ::shape_mapper::TypeShape {
                ::shape_mapper::TypeShape::complex::<Self>(::std::vec![
                    #(::shape_mapper::PropertyDescriptor::new::<#types>(#names)),*
                ])
            }
        }

        impl ::shape_mapper::Reflect for #ident {
            fn type_name(&self) -> &'static str { ::std::any::type_name::<Self>() }

            fn read_property(&self, name: &str) -> ::std::option::Option<::shape_mapper::Value> {
                match name {
                    #(#names => ::std::option::Option::Some(
                        ::shape_mapper::IntoValue::to_value(&self.#fields),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables, reason = "types without properties ignore the value")]
            fn write_property(
                &mut self,
                name: &str,
                value: ::shape_mapper::Value,
            ) -> ::std::result::Result<(), ::shape_mapper::ValueError> {
                match name {
                    #(#names => {
                        self.#fields = ::shape_mapper::FromValue::from_value(value)?;
                        ::std::result::Result::Ok(())
                    },)*
                    _ => ::std::result::Result::Err(::shape_mapper::ValueError::unknown_property(
                        ::std::any::type_name::<Self>(),
                        name,
                    )),
                }
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn ::shape_mapper::Reflect> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any { self }

            fn into_any(
                self: ::std::boxed::Box<Self>,
            ) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl ::shape_mapper::IntoValue for #ident {
            fn to_value(&self) -> ::shape_mapper::Value {
                ::shape_mapper::Value::Complex(::std::boxed::Box::new(
                    ::std::clone::Clone::clone(self),
                ))
            }
        }

        impl ::shape_mapper::FromValue for #ident {
            fn from_value(
                value: ::shape_mapper::Value,
            ) -> ::std::result::Result<Self, ::shape_mapper::ValueError> {
                value.downcast::<Self>()
            }
        }
    })
}
