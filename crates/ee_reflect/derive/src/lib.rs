//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` works on structs with named fields and on field-less
/// enums.
///
/// ## Structures
///
/// For `struct T { ... }` the macro implements `Typed`, `Reflect`,
/// `ReflectedType` and `PropertyType`. Every field becomes a property, so
/// every field type must implement `PropertyType`. The type itself must
/// implement `Default`; the default instance is the reference values of
/// sparse descriptors.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Light {
///     intensity: f32,
///     colors: Vec<Color>,
/// }
/// ```
///
/// ### Type attributes
///
/// - `#[reflect(id = "game::Light")]`: the name the `TypeID` is created
///   from. Defaults to `module_path!()` joined with the type name.
/// - `#[reflect(abstract)]`: the type cannot be created from a descriptor.
/// - `#[reflect(friendly_name = "...")]`, `#[reflect(category = "...")]`:
///   editor data, dropped without the `tools` feature.
/// - `#[reflect(post_deserialize = path::to::func)]`: `func(&mut self)` runs
///   after a descriptor restored the properties.
///
/// ### Field attributes
///
/// - `#[reflect(base)]`: the field is the parent type. Its properties are
///   inherited and the type counts as derived from it. Must be the first
///   reflected field, at most one per type.
/// - `#[reflect(skip)]`: the field is not a property.
/// - `#[reflect(name = "...")]`: property name, defaults to the field name.
/// - `#[reflect(meta(Min = "0", ReadOnly))]`: editor metadata entries.
///
/// With the `tools` feature, field doc comments become the `Description`
/// metadata entry.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(id = "game::SpotLight", category = "Lights")]
/// struct SpotLight {
///     #[reflect(base)]
///     light: Light,
///     /// Cone angle.
///     #[reflect(meta(Min = "0", Max = "180"))]
///     angle: Degrees,
///     #[reflect(skip)]
///     cached: u32,
/// }
/// ```
///
/// ## Enums
///
/// Field-less enums with an explicit `#[repr(u8 | i8 | u16 | i16 | u32 | i32)]`
/// implement `Reflect`, `ReflectEnum`, `ReflectedEnum` and `PropertyType`.
/// Explicit and implicit discriminants are both supported; variant doc
/// comments become constant descriptions with the `tools` feature.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[repr(u8)]
/// enum Team {
///     #[default]
///     Red,
///     Blue = 4,
/// }
/// ```
///
/// Only `#[reflect(id = "...")]` is accepted on enums.
///
/// Generic types are not supported.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_reflect_impls(ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
