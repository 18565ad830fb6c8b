use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path};

use super::TypeAttributes;

/// Data shared by the struct and enum derivations.
pub(crate) struct ReflectMeta<'a> {
    ee_reflect_path: Path,
    attrs: TypeAttributes,
    type_ident: &'a Ident,
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, type_ident: &'a Ident) -> Self {
        Self {
            ee_reflect_path: crate::path::ee_reflect(),
            attrs,
            type_ident,
        }
    }

    #[inline]
    pub fn ee_reflect_path(&self) -> &Path {
        &self.ee_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn type_ident(&self) -> &Ident {
        self.type_ident
    }

    /// The expression of `TYPE_NAME`.
    ///
    /// Either the `#[reflect(id = "...")]` literal or
    /// `concat!(module_path!(), "::", "Ident")`.
    pub fn type_name_tokens(&self) -> TokenStream {
        match &self.attrs.id {
            Some(id) => quote! { #id },
            None => {
                let ident = self.type_ident.to_string();
                quote! { ::core::concat!(::core::module_path!(), "::", #ident) }
            }
        }
    }
}
