// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `#[marshal(...)]` attribute parsing.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, LitStr, Path, Token};

/// Container attributes: `#[marshal(rename = "..", validate = "path")]`.
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub rename: Option<String>,
    pub validate: Option<Path>,
}

/// Field fallback when absent from the input.
pub(crate) enum DefaultAttr {
    /// `#[marshal(default)]`: `Default::default()`.
    Trait,
    /// `#[marshal(default = "path")]`.
    Function(Path),
}

/// Field attributes.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub default: Option<DefaultAttr>,
    pub skip: bool,
    pub internal: bool,
    pub decode_with: Option<Path>,
    pub encode_with: Option<Path>,
}

/// Variant attributes: `#[marshal(rename = "..", value = <expr>)]`.
#[derive(Default)]
pub(crate) struct VariantAttrs {
    pub rename: Option<String>,
    pub value: Option<Expr>,
}

pub(crate) fn container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in marshal_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("validate") {
                out.validate = Some(path_value(&meta)?);
            } else {
                return Err(meta.error("unknown container attribute, expected `rename` or `validate`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

pub(crate) fn field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in marshal_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("default") {
                out.default = Some(if meta.input.peek(Token![=]) {
                    DefaultAttr::Function(path_value(&meta)?)
                } else {
                    DefaultAttr::Trait
                });
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else if meta.path.is_ident("internal") {
                out.internal = true;
            } else if meta.path.is_ident("decode_with") {
                out.decode_with = Some(path_value(&meta)?);
            } else if meta.path.is_ident("encode_with") {
                out.encode_with = Some(path_value(&meta)?);
            } else {
                return Err(meta.error("unknown field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

pub(crate) fn variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut out = VariantAttrs::default();
    for attr in marshal_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("value") {
                out.value = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown variant attribute, expected `rename` or `value`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn marshal_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("marshal"))
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

// Function paths are given as strings, `"module::function"`
fn path_value(meta: &ParseNestedMeta) -> syn::Result<Path> {
    let lit: LitStr = meta.value()?.parse()?;
    lit.parse()
}
