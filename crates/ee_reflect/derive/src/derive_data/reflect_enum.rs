use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, DataEnum, Fields, Ident};

use super::ReflectMeta;
use super::attributes::reject_reflect_attributes;

/// Storage types a reflected enum may use, with their `CoreTypeID` variants.
const REPR_TYPES: [(&str, &str); 6] = [
    ("u8", "Uint8"),
    ("i8", "Int8"),
    ("u16", "Uint16"),
    ("i16", "Int16"),
    ("u32", "Uint32"),
    ("i32", "Int32"),
];

/// A unit variant of a reflected enum.
pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub docs: Option<String>,
}

/// A parsed field-less `enum T { ... }`.
pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    /// The `#[repr(..)]` integer type.
    pub repr: Ident,
    /// The matching `CoreTypeID` variant.
    pub core_type: Ident,
    pub variants: Vec<EnumVariant<'a>>,
}

fn find_repr(attrs: &[Attribute], span: Span) -> syn::Result<(Ident, Ident)> {
    let mut found = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            let storage = REPR_TYPES
                .iter()
                .find(|(repr, _)| meta.path.is_ident(repr));
            if let Some(&(repr, core)) = storage {
                found = Some((Ident::new(repr, span), Ident::new(core, span)));
            }
            Ok(())
        })?;
    }

    found.ok_or_else(|| {
        syn::Error::new(
            span,
            "reflected enums need an explicit `#[repr(u8 | i8 | u16 | i16 | u32 | i32)]`",
        )
    })
}

impl<'a> ReflectEnum<'a> {
    pub fn new(meta: ReflectMeta<'a>, attrs: &[Attribute], data: &'a DataEnum) -> syn::Result<Self> {
        let span = meta.type_ident().span();
        meta.attrs().only_id(span)?;

        let (repr, core_type) = find_repr(attrs, span)?;

        if data.variants.is_empty() {
            return Err(syn::Error::new(span, "reflected enums need at least one variant"));
        }

        let variants = data
            .variants
            .iter()
            .map(|variant| {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new(
                        variant.fields.span(),
                        "reflected enums cannot have variant fields",
                    ));
                }
                reject_reflect_attributes(&variant.attrs)?;

                Ok(EnumVariant {
                    ident: &variant.ident,
                    docs: crate::utils::collect_docs(&variant.attrs),
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            meta,
            repr,
            core_type,
            variants,
        })
    }
}
