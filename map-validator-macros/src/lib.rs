//! Shape derive macro (proc macro crate)
//!
//! Generates the `map_validator::Shape` property table for a struct with named
//! fields, so the validator can enumerate and inspect properties without runtime
//! reflection.

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, ExprPath, Field, Fields, LitStr, Visibility};

/// Derive `map_validator::Shape` for a struct with named fields.
///
/// Only `pub` fields become properties, in declaration order. Unit structs get an
/// empty table.
///
/// Usage:
/// ```rust,ignore
/// #[derive(Shape)]
/// #[shape(name = "PatientSummary")]
/// pub struct PatientSummaryDto {
///     pub id: Uuid,
///     #[shape(rename = "FullName")]
///     pub full_name: String,
///     #[shape(unset_with = "is_unknown_ward")]
///     pub ward: Ward,
///     #[shape(write_only)]
///     pub audit_sink: Option<AuditSink>,
///     #[shape(skip)]
///     pub cache: Cache,
///     internal: u32, // not public, not a property
/// }
/// ```
///
/// Struct attributes:
/// - `name = "..."`: value returned by `shape_name()` (defaults to the struct ident)
///
/// Field attributes:
/// - `rename = "..."`: property name when it differs from the field ident
/// - `skip`: leave the field out of the shape
/// - `write_only`: list the property but never read it
/// - `unset_with = "path"`: `fn(&FieldType) -> bool` used instead of default equality
#[proc_macro_derive(Shape, attributes(shape))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_shape(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_shape(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let shape_name = parse_struct_attrs(&input.attrs)?.unwrap_or_else(|| name.unraw().to_string());

    let fields: Vec<&Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Shape requires a struct with named fields or a unit struct",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Shape can only be derived for structs",
            ))
        }
    };

    let mut properties = Vec::new();
    let mut seen = HashSet::new();
    for field in fields {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip || !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let property_name = attrs.rename.unwrap_or_else(|| field_name.clone());
        if !seen.insert(property_name.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate property name `{property_name}`"),
            ));
        }

        let property = match (attrs.write_only, attrs.unset_with) {
            (true, Some(path)) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "`unset_with` has no effect on a `write_only` property",
                ))
            }
            (true, None) => quote! {
                ::map_validator::Property::write_only(#property_name, #field_name)
            },
            (false, Some(path)) => quote! {
                ::map_validator::Property::readable(#property_name, #field_name, |shape: &Self| {
                    #path(&shape.#ident)
                })
            },
            (false, None) => quote! {
                ::map_validator::Property::readable(#property_name, #field_name, |shape: &Self| {
                    ::map_validator::Unset::is_unset(&shape.#ident)
                })
            },
        };
        properties.push(property);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::map_validator::Shape for #name #ty_generics #where_clause {
            fn shape_name() -> &'static str {
                #shape_name
            }

            fn properties() -> ::std::vec::Vec<::map_validator::Property<Self>> {
                ::std::vec![#(#properties),*]
            }
        }
    })
}

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut shape_name = None;

    for attr in attrs {
        if attr.path().is_ident("shape") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    shape_name = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported shape attribute, expected `name`"))
                }
            })?;
        }
    }

    Ok(shape_name)
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    write_only: bool,
    unset_with: Option<ExprPath>,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("shape") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else if meta.path.is_ident("write_only") {
                    parsed.write_only = true;
                } else if meta.path.is_ident("unset_with") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.unset_with = Some(value.parse()?);
                } else {
                    return Err(meta.error(
                        "unsupported shape attribute, expected one of `rename`, `skip`, `write_only`, `unset_with`",
                    ));
                }
                Ok(())
            })?;
        }

        Ok(parsed)
    }
}
