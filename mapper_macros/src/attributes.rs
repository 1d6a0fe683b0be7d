//! Parsing of `#[mapper(...)]` attributes

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, DeriveInput, Ident, LitStr};

/// Case conversion applied to every property or variant name of a type
#[derive(Clone, Copy)]
pub enum RenameRule {
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
}

impl RenameRule {
    fn parse(literal: &LitStr) -> syn::Result<Self> {
        match literal.value().as_str() {
            "PascalCase" => Ok(Self::PascalCase),
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnakeCase),
            "kebab-case" => Ok(Self::KebabCase),
            other => Err(syn::Error::new(
                literal.span(),
                format!(
                    "unknown rename_all rule `{other}`, expected one of: PascalCase, camelCase, \
                     snake_case, SCREAMING_SNAKE_CASE, kebab-case"
                ),
            )),
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            Self::PascalCase => name.to_upper_camel_case(),
            Self::CamelCase => name.to_lower_camel_case(),
            Self::SnakeCase => name.to_snake_case(),
            Self::ScreamingSnakeCase => name.to_shouty_snake_case(),
            Self::KebabCase => name.to_kebab_case(),
        }
    }
}

/// Type-level `#[mapper(...)]` options
#[derive(Default)]
pub struct ContainerAttributes {
    pub rename_all: Option<RenameRule>,
    /// Path to the `CapabilityKind` variant when the type is a resource handle
    pub capability: Option<TokenStream>,
}

impl ContainerAttributes {
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in mapper_attributes(&input.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let literal: LitStr = meta.value()?.parse()?;
                    parsed.rename_all = Some(RenameRule::parse(&literal)?);
                    Ok(())
                } else if meta.path.is_ident("capability") {
                    let literal: LitStr = meta.value()?.parse()?;
                    parsed.capability = Some(capability_path(&literal)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported mapper attribute, expected `rename_all` or `capability`"))
                }
            })?;
        }
        Ok(parsed)
    }

    /// The name a field or variant is mapped under
    pub fn property_name(&self, ident: &Ident, member: &MemberAttributes) -> String {
        if let Some(rename) = &member.rename {
            return rename.clone();
        }
        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name);
        self.rename_all
            .map_or_else(|| name.to_string(), |rule| rule.apply(name))
    }
}

/// Field- or variant-level `#[mapper(...)]` options
#[derive(Default)]
pub struct MemberAttributes {
    pub rename: Option<String>,
    pub skip:   bool,
}

impl MemberAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in mapper_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let literal: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(literal.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported mapper attribute, expected `rename` or `skip`"))
                }
            })?;
        }
        Ok(parsed)
    }
}

fn mapper_attributes(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("mapper"))
}

fn capability_path(literal: &LitStr) -> syn::Result<TokenStream> {
    let variant = match literal.value().as_str() {
        "foreign" => "ForeignObject",
        "stream" => "IoStream",
        "socket" => "NetworkSocket",
        "database" => "DatabaseConnection",
        "filesystem" => "FileSystem",
        other => {
            return Err(syn::Error::new(
                literal.span(),
                format!(
                    "unknown capability `{other}`, expected one of: stream, socket, database, \
                     filesystem, foreign"
                ),
            ));
        },
    };
    let variant = Ident::new(variant, Span::call_site());
    Ok(quote!(::shape_mapper::CapabilityKind::#variant))
}

/// `Shape`, `IntoValue` and `FromValue` for a type marked as a resource handle
pub fn resource_impls(ident: &Ident, capability: &TokenStream) -> TokenStream {
    quote! {
        impl ::shape_mapper::Shape for #ident {
            fn describe() -> ::shape_mapper::TypeShape {
                ::shape_mapper::TypeShape::resource::<Self>(#capability)
            }
        }

        impl ::shape_mapper::IntoValue for #ident {
            fn to_value(&self) -> ::shape_mapper::Value {
                ::shape_mapper::Value::Resource(::std::any::type_name::<Self>())
            }
        }

        impl ::shape_mapper::FromValue for #ident {
            fn from_value(
                _value: ::shape_mapper::Value,
            ) -> ::std::result::Result<Self, ::shape_mapper::ValueError> {
                ::std::result::Result::Err(::shape_mapper::ValueError::Resource(
                    ::std::any::type_name::<Self>(),
                ))
            }
        }
    }
}

/// Generic types are not supported
pub fn reject_generics(input: &DeriveInput) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.generics,
            "Mappable cannot be derived for generic types",
        ))
    }
}
