// -----------------------------------------------------------------------------
// Modules

mod enum_kind;
mod struct_kind;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

use crate::derive_data::{ReflectEnum, ReflectMeta, ReflectStruct, TypeAttributes};

use enum_kind::impl_enum;
use struct_kind::impl_struct;

/// Dispatch a derive input to the struct or enum implementation.
pub(crate) fn match_reflect_impls(ast: DeriveInput) -> syn::Result<TokenStream> {
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "generic types cannot derive `Reflect`",
        ));
    }

    let attrs = TypeAttributes::parse(&ast.attrs)?;
    let meta = ReflectMeta::new(attrs, &ast.ident);

    let impls = match &ast.data {
        Data::Struct(data) => impl_struct(&ReflectStruct::new(meta, data)?),
        Data::Enum(data) => impl_enum(&ReflectEnum::new(meta, &ast.attrs, data)?),
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "unions cannot derive `Reflect`",
            ));
        }
    };

    Ok(quote! {
        const _: () = {
            #impls
        };
    })
}
