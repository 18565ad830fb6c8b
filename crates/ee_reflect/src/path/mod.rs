//! Addresses of nested properties.

// -----------------------------------------------------------------------------
// Modules

mod property_path;

// -----------------------------------------------------------------------------
// Exports

pub use property_path::{PathElement, PathParseError, PropertyPath};
