//! Sparse, serializable snapshots of reflected instances.

// -----------------------------------------------------------------------------
// Modules

mod collection;
mod error;
mod type_descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use collection::{StaticTypeCollection, TypeDescriptorCollection};
pub use error::DescriptorError;
pub use type_descriptor::{PropertyDescriptor, TypeDescriptor};
