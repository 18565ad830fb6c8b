//! Resource identifiers and handles referenced by reflected data.
//!
//! Loading itself lives outside this crate; reflected types only walk their
//! handles and hand them to a [`ResourceRequester`].

// -----------------------------------------------------------------------------
// Modules

mod handle;
mod info;
mod resource_path;
mod resource_type_id;

// -----------------------------------------------------------------------------
// Exports

pub use handle::{
    LoadingStatus, Resource, ResourceHandle, ResourcePtr, ResourceRequester, TResourcePtr,
};
#[cfg(feature = "tools")]
pub use info::DataFileInfo;
pub use info::ResourceInfo;
pub use resource_path::{ResourceID, ResourcePath};
pub use resource_type_id::ResourceTypeID;
