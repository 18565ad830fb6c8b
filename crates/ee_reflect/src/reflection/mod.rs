// -----------------------------------------------------------------------------
// Modules

mod impls;
mod kinds;
mod property_type;
mod reflect;

// -----------------------------------------------------------------------------
// Exports

pub use kinds::{ReflectArray, ReflectBitFlags, ReflectEnum, ReflectInstance, ReflectedEnum};
pub use property_type::{PropertyType, PropertyTypeDesc};
pub use reflect::{Reflect, ReflectMut, ReflectRef, ReflectedType};
