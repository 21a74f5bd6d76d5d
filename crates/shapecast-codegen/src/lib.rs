// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

mod attrs;

use attrs::{container_attrs, field_attrs, variant_attrs, ContainerAttrs, DefaultAttr};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DataEnum, DeriveInput, Fields, FieldsNamed, Type};

/// `#[derive(Marshal)]` macro: generates the descriptor and instance
/// conversions of a type.
///
/// Supports:
/// - Named structs: records, one field per struct field
/// - Newtype structs: named alias of the inner type
/// - Enums of unit variants: enumeration
/// - Enums of newtype variants: union of the variant types, tried in order
///
/// Attributes:
/// - container: `rename = ".."`, `validate = "path"` (records only,
///   `fn(&Self) -> Result<(), impl ToString>`)
/// - field: `rename`, `default`, `default = "path"`, `skip`, `internal`,
///   `decode_with = "path"`, `encode_with = "path"`
/// - variant: `rename`, `value = <literal>`
///
/// Example:
/// ```ignore
/// use shapecast::Marshal;
///
/// #[derive(Marshal)]
/// enum Suit {
///     #[marshal(value = "h")]
///     Heart,
///     #[marshal(value = "s")]
///     Spade,
/// }
///
/// #[derive(Marshal)]
/// struct Card {
///     rank: u8,
///     suit: Suit,
///     #[marshal(default)]
///     note: Option<String>,
/// }
/// ```
#[proc_macro_derive(Marshal, attributes(marshal))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Marshal cannot be derived for generic types",
        ));
    }
    let container = container_attrs(&input.attrs)?;
    let type_name = container
        .rename
        .clone()
        .unwrap_or_else(|| input.ident.to_string());

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_record(input, &type_name, &container, fields),
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                reject_validate(&container)?;
                Ok(expand_alias(input, &type_name, &fields.unnamed[0].ty))
            }
            _ => Err(syn::Error::new_spanned(
                input,
                "Only named structs and newtype structs are supported",
            )),
        },
        Data::Enum(data) => {
            reject_validate(&container)?;
            expand_enum(input, &type_name, data)
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Marshal cannot be derived for unions",
        )),
    }
}

fn reject_validate(container: &ContainerAttrs) -> syn::Result<()> {
    match &container.validate {
        Some(path) => Err(syn::Error::new_spanned(
            path,
            "`validate` is only supported on named structs",
        )),
        None => Ok(()),
    }
}

/// Per-type descriptor cache: built on first call, shared afterwards.
fn cached_descriptor(build: &TokenStream2) -> TokenStream2 {
    quote! {
        fn descriptor() -> ::std::sync::Arc<::shapecast::TypeDescriptor> {
            static DESCRIPTOR: ::std::sync::OnceLock<::std::sync::Arc<::shapecast::TypeDescriptor>> =
                ::std::sync::OnceLock::new();
            ::std::sync::Arc::clone(DESCRIPTOR.get_or_init(|| ::std::sync::Arc::new(#build)))
        }
    }
}

fn expand_record(
    input: &DeriveInput,
    type_name: &str,
    container: &ContainerAttrs,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream2> {
    let ident = &input.ident;

    let mut descriptors = Vec::new();
    let mut inits = Vec::new();
    let mut pushes = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let ty = &field.ty;
        let attrs = field_attrs(&field.attrs)?;
        let name = attrs
            .rename
            .clone()
            .unwrap_or_else(|| field_ident.to_string());

        // Field types resolve lazily so recursive records can be described
        let mut descriptor = quote! {
            ::shapecast::FieldDescriptor::new(
                #name,
                ::std::sync::Arc::new(::shapecast::TypeDescriptor::deferred(
                    <#ty as ::shapecast::Marshal>::descriptor,
                )),
            )
        };

        let fallback = match &attrs.default {
            Some(DefaultAttr::Trait) => Some(quote! { <#ty as ::std::default::Default>::default }),
            Some(DefaultAttr::Function(path)) => Some(quote! { #path }),
            None if attrs.skip => Some(quote! { <#ty as ::std::default::Default>::default }),
            None => None,
        };
        if let Some(fallback) = &fallback {
            descriptor.extend(quote! {
                .with_default_factory(|| {
                    let value: #ty = #fallback();
                    <#ty as ::shapecast::Marshal>::to_instance(&value)
                })
            });
        }
        if attrs.skip {
            descriptor.extend(quote! { .excluded() });
        }
        if attrs.internal {
            descriptor.extend(quote! { .internal() });
        }
        if let Some(path) = &attrs.decode_with {
            descriptor.extend(quote! {
                .with_decoder(|value| {
                    let decoded: #ty = #path(value)?;
                    <#ty as ::shapecast::Marshal>::to_instance(&decoded)
                })
            });
        }
        if let Some(path) = &attrs.encode_with {
            descriptor.extend(quote! {
                .with_encoder(|instance| {
                    let value = <#ty as ::shapecast::Marshal>::from_instance(instance.clone())?;
                    #path(&value)
                })
            });
        }
        descriptors.push(descriptor);

        inits.push(match &fallback {
            Some(fallback) => quote! {
                #field_ident: record.take_or_else::<#ty>(#name, #fallback)?
            },
            None => quote! {
                #field_ident: record.take_as::<#ty>(#name)?
            },
        });
        pushes.push(quote! {
            record.push(#name, ::shapecast::Marshal::to_instance(&self.#field_ident)?);
        });
    }

    let validate = container.validate.as_ref().map(|path| {
        quote! {
            if let ::std::result::Result::Err(message) = #path(&value) {
                return ::std::result::Result::Err(::shapecast::Error::validation(message.to_string()));
            }
        }
    });

    // Checked at decode time as well as in from_instance.
    let validator = container.validate.as_ref().map(|_| {
        quote! {
            .with_validator(|record| {
                match <#ident as ::shapecast::Marshal>::from_instance(
                    ::shapecast::Instance::Record(record.clone()),
                ) {
                    ::std::result::Result::Ok(_) => ::std::result::Result::Ok(()),
                    ::std::result::Result::Err(::shapecast::Error::Validation { message, .. }) => {
                        ::std::result::Result::Err(message)
                    }
                    ::std::result::Result::Err(error) => ::std::result::Result::Err(error.to_string()),
                }
            })
        }
    });

    let descriptor_fn = cached_descriptor(&quote! {
        ::shapecast::TypeDescriptor::record(#type_name, ::std::vec![#(#descriptors),*])
            #validator
    });

    Ok(quote! {
        impl ::shapecast::Marshal for #ident {
            #descriptor_fn

            fn from_instance(instance: ::shapecast::Instance) -> ::shapecast::Result<Self> {
                #[allow(unused_mut, unused_variables)]
                let mut record = ::shapecast::marshal::expect_record(instance, #type_name)?;
                let value = Self {
                    #(#inits),*
                };
                #validate
                ::std::result::Result::Ok(value)
            }

            fn to_instance(&self) -> ::shapecast::Result<::shapecast::Instance> {
                #[allow(unused_mut)]
                let mut record = ::shapecast::RecordInstance::new(
                    <Self as ::shapecast::Marshal>::descriptor(),
                );
                #(#pushes)*
                ::std::result::Result::Ok(::shapecast::Instance::Record(record))
            }
        }
    })
}

fn expand_alias(input: &DeriveInput, type_name: &str, inner: &Type) -> TokenStream2 {
    let ident = &input.ident;
    let descriptor_fn = cached_descriptor(&quote! {
        ::shapecast::TypeDescriptor::alias(
            #type_name,
            ::std::sync::Arc::new(::shapecast::TypeDescriptor::deferred(
                <#inner as ::shapecast::Marshal>::descriptor,
            )),
        )
    });

    quote! {
        impl ::shapecast::Marshal for #ident {
            #descriptor_fn

            fn from_instance(instance: ::shapecast::Instance) -> ::shapecast::Result<Self> {
                <#inner as ::shapecast::Marshal>::from_instance(instance).map(Self)
            }

            fn to_instance(&self) -> ::shapecast::Result<::shapecast::Instance> {
                <#inner as ::shapecast::Marshal>::to_instance(&self.0)
            }
        }
    }
}

fn expand_enum(input: &DeriveInput, type_name: &str, data: &DataEnum) -> syn::Result<TokenStream2> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Marshal cannot be derived for empty enums",
        ));
    }
    let all_unit = data.variants.iter().all(|v| matches!(v.fields, Fields::Unit));
    let all_newtype = data
        .variants
        .iter()
        .all(|v| matches!(&v.fields, Fields::Unnamed(f) if f.unnamed.len() == 1));

    if all_unit {
        expand_enumeration(input, type_name, data)
    } else if all_newtype {
        expand_union(input, type_name, data)
    } else {
        Err(syn::Error::new_spanned(
            input,
            "Enums must have only unit variants (enumeration) or only newtype variants (union)",
        ))
    }
}

fn expand_enumeration(
    input: &DeriveInput,
    type_name: &str,
    data: &DataEnum,
) -> syn::Result<TokenStream2> {
    let ident = &input.ident;

    let mut variants = Vec::new();
    let mut from_arms = Vec::new();
    let mut to_arms = Vec::new();
    for variant in &data.variants {
        let attrs = variant_attrs(&variant.attrs)?;
        let variant_ident = &variant.ident;
        let name = attrs
            .rename
            .clone()
            .unwrap_or_else(|| variant_ident.to_string());
        let raw = match &attrs.value {
            Some(expr) => quote! { #expr },
            None => quote! { #name },
        };
        variants.push(quote! { ::shapecast::EnumVariant::new(#name, #raw) });
        from_arms.push(quote! { #name => ::std::result::Result::Ok(Self::#variant_ident), });
        to_arms.push(quote! { Self::#variant_ident => #name, });
    }

    let descriptor_fn = cached_descriptor(&quote! {
        ::shapecast::TypeDescriptor::enumeration(#type_name, ::std::vec![#(#variants),*])
    });

    Ok(quote! {
        impl ::shapecast::Marshal for #ident {
            #descriptor_fn

            fn from_instance(instance: ::shapecast::Instance) -> ::shapecast::Result<Self> {
                let variant = ::shapecast::marshal::expect_variant(&instance, #type_name)?;
                match variant.as_str() {
                    #(#from_arms)*
                    other => ::std::result::Result::Err(::shapecast::Error::validation(
                        ::std::format!("{} has no variant `{}`", #type_name, other),
                    )),
                }
            }

            fn to_instance(&self) -> ::shapecast::Result<::shapecast::Instance> {
                let name = match self {
                    #(#to_arms)*
                };
                ::shapecast::EnumInstance::by_name(<Self as ::shapecast::Marshal>::descriptor(), name)
                    .map(::shapecast::Instance::Enum)
                    .ok_or_else(|| ::shapecast::Error::unsupported(#type_name))
            }
        }
    })
}

fn expand_union(input: &DeriveInput, type_name: &str, data: &DataEnum) -> syn::Result<TokenStream2> {
    let ident = &input.ident;

    let mut members = Vec::new();
    let mut attempts = Vec::new();
    let mut to_arms = Vec::new();
    for variant in &data.variants {
        let attrs = variant_attrs(&variant.attrs)?;
        if let Some(expr) = &attrs.value {
            return Err(syn::Error::new_spanned(
                expr,
                "`value` is only supported on unit variants",
            ));
        }
        let variant_ident = &variant.ident;
        let Fields::Unnamed(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(variant, "Expected a newtype variant"));
        };
        let ty = &fields.unnamed[0].ty;

        members.push(quote! { <#ty as ::shapecast::Marshal>::descriptor() });
        attempts.push(quote! {
            match <#ty as ::shapecast::Marshal>::from_instance(instance.clone()) {
                ::std::result::Result::Ok(value) => {
                    return ::std::result::Result::Ok(Self::#variant_ident(value));
                }
                ::std::result::Result::Err(error) => attempts.push(::shapecast::UnionAttempt {
                    member: <#ty as ::shapecast::Marshal>::descriptor().name.clone(),
                    error,
                }),
            }
        });
        to_arms.push(quote! {
            Self::#variant_ident(value) => <#ty as ::shapecast::Marshal>::to_instance(value),
        });
    }

    let descriptor_fn = cached_descriptor(&quote! {
        ::shapecast::TypeDescriptor::alias(
            #type_name,
            ::std::sync::Arc::new(::shapecast::TypeDescriptor::union(::std::vec![#(#members),*])),
        )
    });

    Ok(quote! {
        impl ::shapecast::Marshal for #ident {
            #descriptor_fn

            fn from_instance(instance: ::shapecast::Instance) -> ::shapecast::Result<Self> {
                let mut attempts = ::std::vec::Vec::new();
                #(#attempts)*
                ::std::result::Result::Err(::shapecast::marshal::union_mismatch(#type_name, &instance, attempts))
            }

            fn to_instance(&self) -> ::shapecast::Result<::shapecast::Instance> {
                match self {
                    #(#to_arms)*
                }
            }
        }
    })
}
