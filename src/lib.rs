//! Runtime type reflection for engine data.
//!
//! - [`utils`]: fixed-seed hashing and interned [`StringID`](utils::StringID)s.
//! - [`ptr`]: type-erased pointers used when placing reflected values in raw memory.
//! - [`reflect`]: type ids, type infos, the type registry, conversions and descriptors.
//! - [`serialize`]: the bit-packed [`BitArchive`](serialize::BitArchive).
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use ee_ptr as ptr;
pub use ee_reflect as reflect;
pub use ee_serialize as serialize;
pub use ee_utils as utils;
