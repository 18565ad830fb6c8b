//! Small shared building blocks: fixed-seed hashing, hash containers,
//! interned string identifiers and alignment arithmetic.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod align;
mod string_id;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use align::{align_up, padding_for};
pub use string_id::StringID;
