use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{EnumVariant, ReflectEnum};

/// Implements `Reflect`, `ReflectEnum`, `ReflectedEnum` and `PropertyType`.
///
/// Discriminants are never evaluated by the macro; every value is read back
/// with `Self::Variant as repr as i64`, so explicit and implicit
/// discriminants behave the same.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let ee_reflect_path = info.meta.ee_reflect_path();
    let real_ident = info.meta.type_ident();

    let type_id_ = crate::path::type_id_(ee_reflect_path);
    let reflect_ = crate::path::reflect_(ee_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(ee_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(ee_reflect_path);
    let reflect_enum_ = crate::path::reflect_enum_(ee_reflect_path);
    let reflected_enum_ = crate::path::reflected_enum_(ee_reflect_path);
    let enum_info_ = crate::path::enum_info_(ee_reflect_path);
    let core_type_id_ = crate::path::core_type_id_(ee_reflect_path);
    let property_type_ = crate::path::property_type_(ee_reflect_path);
    let property_type_desc_ = crate::path::property_type_desc_(ee_reflect_path);
    let option_ = crate::path::option_();

    let repr = &info.repr;
    let core_type = &info.core_type;
    let type_name = info.meta.type_name_tokens();

    let value_of = |variant: &EnumVariant| {
        let ident = variant.ident;
        quote! { (Self::#ident as #repr as i64) }
    };

    let value_arms = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        let value = value_of(variant);
        quote! { Self::#ident => #value, }
    });

    let from_value_checks = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        let value = value_of(variant);
        quote! {
            if value == #value {
                return #option_::Some(Self::#ident);
            }
        }
    });

    let constants = info.variants.iter().map(|variant| {
        let label = variant.ident.to_string();
        let value = value_of(variant);
        match variant.docs.as_deref().filter(|_| cfg!(feature = "tools")) {
            Some(docs) => quote! { .with_described_constant(#label, #value, #docs) },
            None => quote! { .with_constant(#label, #value) },
        }
    });

    quote! {
        impl #reflect_ for #real_ident {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Enum(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Enum(self)
            }

            fn reflect_eq(&self, other: &dyn #reflect_) -> bool {
                match other.downcast_ref::<Self>() {
                    #option_::Some(other) => {
                        #reflect_enum_::value(self) == #reflect_enum_::value(other)
                    }
                    #option_::None => false,
                }
            }

            fn reflect_set(&mut self, other: &dyn #reflect_) -> bool {
                match other.downcast_ref::<Self>() {
                    #option_::Some(other) => {
                        let value = #reflect_enum_::value(other);
                        #reflect_enum_::set_value(self, value)
                    }
                    #option_::None => false,
                }
            }
        }

        impl #reflect_enum_ for #real_ident {
            #[inline]
            fn enum_type_id(&self) -> #type_id_ {
                <Self as #reflected_enum_>::reflect_type_id()
            }

            fn value(&self) -> i64 {
                match self {
                    #(#value_arms)*
                }
            }

            fn set_value(&mut self, value: i64) -> bool {
                match <Self as #reflected_enum_>::from_value(value) {
                    #option_::Some(variant) => {
                        *self = variant;
                        true
                    }
                    #option_::None => false,
                }
            }
        }

        impl #reflected_enum_ for #real_ident {
            const TYPE_NAME: &'static str = #type_name;

            fn enum_info() -> #enum_info_ {
                #enum_info_::new(
                    <Self as #reflected_enum_>::reflect_type_id(),
                    #core_type_id_::#core_type,
                )
                #(#constants)*
            }

            fn from_value(value: i64) -> #option_<Self> {
                #(#from_value_checks)*
                #option_::None
            }

            #[inline]
            fn to_value(self) -> i64 {
                self as #repr as i64
            }
        }

        impl #property_type_ for #real_ident {
            #[inline]
            fn property_type() -> #property_type_desc_ {
                #property_type_desc_::enumeration(<Self as #reflected_enum_>::reflect_type_id())
            }
        }
    }
}
