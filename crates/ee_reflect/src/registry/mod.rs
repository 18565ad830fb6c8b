//! The catalog of registered types, enums and resource types.

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::TypeRegistry;
