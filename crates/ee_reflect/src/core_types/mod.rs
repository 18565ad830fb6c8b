//! The closed set of built-in value types and their registry.

// -----------------------------------------------------------------------------
// Modules

mod bit_flags;
mod color;
mod core_type_id;
mod float_curve;
mod range;
mod registry;
mod transform;
mod type_instance;
mod units;

// -----------------------------------------------------------------------------
// Exports

pub use bit_flags::{BitFlags, MAX_FLAGS, TBitFlags};
pub use color::Color;
pub use core_type_id::CoreTypeID;
pub use float_curve::{CurvePoint, FloatCurve};
pub use range::{FloatRange, IntRange};
pub use registry::{CoreTypeRecord, CoreTypeRegistry};
pub use transform::{EulerAngles, Transform};
pub use type_instance::{TTypeInstance, TypeInstance};
pub use units::{Degrees, Microseconds, Milliseconds, Percentage, Radians, Seconds};
