//! Conversions of property values between their native, string and binary
//! forms.
//!
//! Every conversion is dispatched on a property's type id and template
//! argument, as recorded in its [`PropertyInfo`](crate::info::PropertyInfo).
//! Core values, registered enums, bit flags, resource handles and type
//! instances are convertible; arrays are converted element by element by the
//! caller.

// -----------------------------------------------------------------------------
// Modules

mod bit_flags;
mod convert;
mod core_value;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub use bit_flags::{convert_bit_flags_to_string, convert_string_to_bit_flags};
pub use convert::{
    convert_binary_to_native, convert_binary_to_string, convert_native_to_binary,
    convert_native_to_string, convert_string_to_binary, convert_string_to_native,
    is_valid_string_value_for_type,
};
pub use core_value::CoreValue;
pub use error::ConversionError;
