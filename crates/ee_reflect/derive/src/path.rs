//! Paths of the `ee_reflect` items used by generated code.
//!
//! Kept in one place so a restructuring of `ee_reflect` only touches this file.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `ee_reflect` crate.
///
/// 1. For crates that depend on `ee_reflect`, `::ee_reflect` is returned.
/// 2. For crates that depend on `ee_core`, `::ee_core::reflect` is returned.
/// 3. Otherwise `::ee_reflect` is returned, which may be incorrect.
///
/// Reading the caller's manifest is comparatively expensive, so the path is
/// fetched once per derive and passed around.
pub(crate) fn ee_reflect() -> syn::Path {
    ee_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("ee_reflect"))
}

// -----------------------------------------------------------------------------
// Internal API

#[inline(always)]
pub(crate) fn type_id_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::TypeID }
}

#[inline(always)]
pub(crate) fn reflect_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::Reflect }
}

#[inline(always)]
pub(crate) fn reflect_ref_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::ReflectRef }
}

#[inline(always)]
pub(crate) fn reflect_mut_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::ReflectMut }
}

#[inline(always)]
pub(crate) fn reflected_type_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::ReflectedType }
}

#[inline(always)]
pub(crate) fn reflect_enum_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::ReflectEnum }
}

#[inline(always)]
pub(crate) fn reflected_enum_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::ReflectedEnum }
}

#[inline(always)]
pub(crate) fn property_type_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::PropertyType }
}

#[inline(always)]
pub(crate) fn property_type_desc_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::PropertyTypeDesc }
}

#[inline(always)]
pub(crate) fn typed_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn type_info_cell_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::info::TypeInfoCell }
}

#[inline(always)]
pub(crate) fn property_info_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::info::PropertyInfo }
}

#[inline(always)]
pub(crate) fn enum_info_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::info::EnumInfo }
}

#[inline(always)]
pub(crate) fn core_type_id_(ee_reflect_path: &syn::Path) -> TokenStream {
    quote! { #ee_reflect_path::core_types::CoreTypeID }
}

// -----------------------------------------------------------------------------
// Prelude

/// `::core::option::Option`
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}

/// `::core::mem::offset_of`
pub(crate) fn offset_of_() -> TokenStream {
    quote! { ::core::mem::offset_of }
}
