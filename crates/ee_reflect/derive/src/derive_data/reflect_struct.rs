use syn::spanned::Spanned;
use syn::{DataStruct, Fields, Ident, LitStr, Type};

use super::{FieldAttributes, ReflectMeta};

/// A reflected field of a structure.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
    pub docs: Option<String>,
}

impl StructField<'_> {
    /// The property name.
    pub fn name(&self) -> LitStr {
        self.attrs
            .name
            .clone()
            .unwrap_or_else(|| LitStr::new(&self.ident.to_string(), self.ident.span()))
    }
}

/// A parsed `struct T { ... }`.
pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    /// The `#[reflect(base)]` field.
    pub base: Option<StructField<'a>>,
    /// Reflected fields in declaration order, excluding base and skipped ones.
    pub fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, data: &'a DataStruct) -> syn::Result<Self> {
        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new(
                data.fields.span(),
                "only structs with named fields can derive `Reflect`",
            ));
        };

        let mut base = None;
        let mut fields = Vec::with_capacity(named.named.len());

        for field in &named.named {
            let attrs = FieldAttributes::parse(&field.attrs)?;
            if attrs.skip {
                continue;
            }

            let Some(ident) = field.ident.as_ref() else {
                continue;
            };

            let field = StructField {
                ident,
                ty: &field.ty,
                attrs,
                docs: crate::utils::collect_docs(&field.attrs),
            };

            if field.attrs.is_base {
                if base.is_some() {
                    return Err(syn::Error::new(ident.span(), "only one field can be `base`"));
                }
                if !fields.is_empty() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "the `base` field must come before every other reflected field",
                    ));
                }
                base = Some(field);
            } else {
                fields.push(field);
            }
        }

        Ok(Self { meta, base, fields })
    }
}
