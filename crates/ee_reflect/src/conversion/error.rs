use thiserror::Error;

use crate::TypeID;

/// Why a value could not be converted between its native, string and
/// binary forms.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("{0} is not a core type, a registered enum or a bit flag type")]
    UnknownType(TypeID),
    #[error("values of type {0} are not converted as a whole")]
    Unsupported(TypeID),
    #[error("expected a native {expected}, found {actual}")]
    TypeMismatch {
        expected: TypeID,
        actual: &'static str,
    },
    #[error("`{text}` is not a valid {type_id} value")]
    InvalidString { type_id: TypeID, text: String },
    #[error("enum {type_id} has no label `{label}`")]
    UnknownEnumLabel { type_id: TypeID, label: String },
    #[error("enum {type_id} has no constant with value {value}")]
    UnknownEnumValue { type_id: TypeID, value: i64 },
    #[error("instance of {instance} does not derive from {base}")]
    InstanceTypeRejected { instance: TypeID, base: TypeID },
    #[error("malformed binary value: {0}")]
    Binary(#[from] postcard::Error),
}

impl ConversionError {
    pub(crate) fn invalid_string(type_id: TypeID, text: &str) -> Self {
        Self::InvalidString {
            type_id,
            text: text.to_owned(),
        }
    }
}
