use thiserror::Error;

use crate::TypeID;

/// Why a [`TypeDescriptorCollection`](super::TypeDescriptorCollection) cannot
/// be laid out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("descriptor {index} names unregistered type {type_id}")]
    UnknownType { index: usize, type_id: TypeID },
    #[error("descriptor {index} names abstract type {type_id}")]
    AbstractType { index: usize, type_id: TypeID },
}
