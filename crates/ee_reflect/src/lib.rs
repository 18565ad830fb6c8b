//! Runtime reflection for engine data types.
//!
//! Every reflected type gets a stable [`TypeID`], a [`TypeInfo`](info::TypeInfo)
//! describing its properties, and conversions of each property value between
//! the native form, a human-readable string form and a compact binary form.
//!
//! - [`info`]: [`TypeInfo`](info::TypeInfo), [`PropertyInfo`](info::PropertyInfo)
//!   and [`EnumInfo`](info::EnumInfo).
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry), which also owns
//!   the [`CoreTypeRegistry`](core_types::CoreTypeRegistry).
//! - [`core_types`]: the closed set of built-in value types.
//! - [`conversion`]: native / string / binary conversions.
//! - [`path`]: [`PropertyPath`](path::PropertyPath) addressing nested properties.
//! - [`descriptor`]: sparse, serializable [`TypeDescriptor`](descriptor::TypeDescriptor)s.
//! - [`resource`]: resource ids and handles referenced by reflected data.
//!
//! # Example
//!
//! ```
//! use ee_reflect::derive::Reflect;
//! use ee_reflect::registry::TypeRegistry;
//! use ee_reflect::descriptor::TypeDescriptor;
//!
//! #[derive(Reflect, Default)]
//! struct Widget {
//!     health: u32,
//!     speed: f32,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_type::<Widget>();
//!
//! let widget = Widget { health: 50, ..Default::default() };
//! let descriptor = TypeDescriptor::describe_type(&registry, &widget, false);
//! assert_eq!(descriptor.properties.len(), 1);
//!
//! let restored = descriptor.create_type(&registry).unwrap();
//! let restored = restored.downcast_ref::<Widget>().unwrap();
//! assert_eq!(restored.health, 50);
//!
//! registry.unregister_type(descriptor.type_id);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Extern Self

// The derive resolves this crate through the caller's Cargo.toml, which names
// `ee_reflect`; this alias lets the same path work inside the crate itself.
extern crate self as ee_reflect;

// -----------------------------------------------------------------------------
// Modules

mod reflection;
mod type_id;

pub mod conversion;
pub mod core_types;
pub mod descriptor;
pub mod info;
pub mod path;
pub mod registry;
pub mod resource;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use ee_reflect_derive as derive;
pub use reflection::{
    PropertyType, PropertyTypeDesc, Reflect, ReflectArray, ReflectBitFlags, ReflectEnum,
    ReflectInstance, ReflectMut, ReflectRef, ReflectedEnum, ReflectedType,
};
pub use type_id::TypeID;
