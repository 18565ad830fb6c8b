//! Static descriptions of reflected types, their properties and enums.

// -----------------------------------------------------------------------------
// Modules

mod enum_info;
#[cfg(feature = "tools")]
mod metadata;
mod property_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use enum_info::{EnumConstant, EnumInfo};
#[cfg(feature = "tools")]
pub use metadata::{MetadataKey, PropertyMetadata};
pub use property_info::{PropertyAccessor, PropertyFlags, PropertyInfo};
pub use type_info::{TypeInfo, TypeInfoBuilder};
pub use typed::{TypeInfoCell, Typed};
