use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectStruct, StructField};

/// `.with_metadata(..)` calls of one field, doc comment first.
fn metadata_tokens(field: &StructField) -> TokenStream {
    let docs = field
        .docs
        .as_deref()
        .filter(|_| cfg!(feature = "tools"))
        .map(|docs| quote! { .with_metadata("Description", #docs) });

    let entries = field.attrs.metadata.iter().map(|(key, value)| {
        quote! { .with_metadata(#key, #value) }
    });

    quote! {
        #docs
        #(#entries)*
    }
}

/// The builder chain producing the type's `TypeInfo`:
///
/// ```ignore
/// TypeInfo::builder::<Self>()
///     .with_parent::<Base>(offset_of!(Self, base), |s| &s.base, |s| &mut s.base)
///     .with_property(PropertyInfo::new::<Self, F>("f", offset_of!(Self, f), ...))
///     .with_abstract()
///     .build()
/// ```
fn type_info_tokens(info: &ReflectStruct) -> TokenStream {
    let ee_reflect_path = info.meta.ee_reflect_path();
    let type_info_ = crate::path::type_info_(ee_reflect_path);
    let property_info_ = crate::path::property_info_(ee_reflect_path);
    let offset_of_ = crate::path::offset_of_();

    let with_parent = info.base.as_ref().map(|base| {
        let ident = base.ident;
        let ty = base.ty;
        quote! {
            .with_parent::<#ty>(
                #offset_of_!(Self, #ident),
                |this| &this.#ident,
                |this| &mut this.#ident,
            )
        }
    });

    let with_properties = info.fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = field.name();
        let metadata = metadata_tokens(field);
        quote! {
            .with_property(
                #property_info_::new::<Self, #ty>(
                    #name,
                    #offset_of_!(Self, #ident),
                    |this| &this.#ident,
                    |this| &mut this.#ident,
                )
                #metadata
            )
        }
    });

    let attrs = info.meta.attrs();
    let with_abstract = attrs.is_abstract.then(|| quote! { .with_abstract() });
    let with_friendly_name = attrs
        .friendly_name
        .as_ref()
        .map(|name| quote! { .with_friendly_name(#name) });
    let with_category = attrs
        .category
        .as_ref()
        .map(|category| quote! { .with_category(#category) });

    quote! {
        #type_info_::builder::<Self>()
            #with_parent
            #(#with_properties)*
            #with_abstract
            #with_friendly_name
            #with_category
            .build()
    }
}

/// Implements `Typed`, `Reflect`, `ReflectedType` and `PropertyType`.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let ee_reflect_path = info.meta.ee_reflect_path();
    let real_ident = info.meta.type_ident();

    let typed_ = crate::path::typed_(ee_reflect_path);
    let type_info_ = crate::path::type_info_(ee_reflect_path);
    let type_info_cell_ = crate::path::type_info_cell_(ee_reflect_path);
    let reflect_ = crate::path::reflect_(ee_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(ee_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(ee_reflect_path);
    let reflected_type_ = crate::path::reflected_type_(ee_reflect_path);
    let property_type_ = crate::path::property_type_(ee_reflect_path);
    let property_type_desc_ = crate::path::property_type_desc_(ee_reflect_path);
    let option_ = crate::path::option_();

    let type_name = info.meta.type_name_tokens();
    let type_info_tokens = type_info_tokens(info);

    let post_deserialize = info.meta.attrs().post_deserialize.as_ref().map(|func| {
        quote! {
            #[inline]
            fn post_deserialize(&mut self) {
                #func(self)
            }
        }
    });

    quote! {
        impl #typed_ for #real_ident {
            const TYPE_NAME: &'static str = #type_name;

            fn type_info() -> &'static #type_info_ {
                static CELL: #type_info_cell_ = #type_info_cell_::new();
                CELL.get_or_init(|| {
                    #type_info_tokens
                })
            }
        }

        impl #reflect_ for #real_ident {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Structure(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Structure(self)
            }

            fn reflect_eq(&self, other: &dyn #reflect_) -> bool {
                match other.downcast_ref::<Self>() {
                    #option_::Some(other) => {
                        <Self as #typed_>::type_info().are_all_property_values_equal(self, other)
                    }
                    #option_::None => false,
                }
            }

            fn reflect_set(&mut self, other: &dyn #reflect_) -> bool {
                match other.downcast_ref::<Self>() {
                    #option_::Some(other) => {
                        <Self as #typed_>::type_info().copy_properties(self, other);
                        true
                    }
                    #option_::None => false,
                }
            }
        }

        impl #reflected_type_ for #real_ident {
            #[inline]
            fn reflect_type_info(&self) -> &'static #type_info_ {
                <Self as #typed_>::type_info()
            }

            #post_deserialize
        }

        impl #property_type_ for #real_ident {
            #[inline]
            fn property_type() -> #property_type_desc_ {
                #property_type_desc_::structure(<Self as #typed_>::reflect_type_id())
            }
        }
    }
}
