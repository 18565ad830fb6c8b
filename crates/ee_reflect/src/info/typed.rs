use std::sync::OnceLock;

use crate::TypeID;
use crate::info::TypeInfo;
use crate::reflection::{PropertyType, ReflectedType};

/// A reflected structure with a static [`TypeInfo`].
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect).
pub trait Typed: ReflectedType + PropertyType {
    /// The name the type's [`TypeID`] is created from.
    const TYPE_NAME: &'static str;

    /// The type's [`TypeInfo`], built on first access.
    fn type_info() -> &'static TypeInfo;

    #[inline]
    fn reflect_type_id() -> TypeID {
        TypeID::new(Self::TYPE_NAME)
    }
}

/// Lazily built storage for a non-generic type's [`TypeInfo`].
///
/// ```ignore
/// fn type_info() -> &'static TypeInfo {
///     static CELL: TypeInfoCell = TypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::builder::<Self>().build())
/// }
/// ```
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// The stored info, built with `f` on first call.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}
