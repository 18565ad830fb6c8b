use crate::TypeID;
use crate::info::EnumInfo;
use crate::reflection::{PropertyType, Reflect, ReflectedType};

// -----------------------------------------------------------------------------
// ReflectArray

/// A reflected array: a fixed-size `[T; N]` or a dynamic `Vec<T>` /
/// `SmallVec<[T; N]>`.
///
/// Index-based operations return `false` or `None` instead of panicking when
/// the index is out of range. Operations that change the length always return
/// `false` on static arrays.
pub trait ReflectArray: Reflect {
    /// `true` if the length can change.
    fn is_dynamic(&self) -> bool;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect>;

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Size in bytes of one element.
    fn element_size(&self) -> usize;

    /// Resize, filling new slots with default elements.
    ///
    /// `false` if the length is fixed or the storage cannot grow to `len`.
    fn set_len(&mut self, len: usize) -> bool;

    /// Insert a default element before `index`; `index == len` appends.
    fn insert_default(&mut self, index: usize) -> bool;

    fn remove(&mut self, index: usize) -> bool;

    /// Move the element at `from` so that it ends up at index `to`.
    fn move_element(&mut self, from: usize, to: usize) -> bool;

    /// A freshly default-constructed element.
    fn new_default_element(&self) -> Box<dyn Reflect>;
}

// -----------------------------------------------------------------------------
// Enums

/// Object-safe access to a reflected enum value as its integer constant.
pub trait ReflectEnum: Reflect {
    fn enum_type_id(&self) -> TypeID;

    fn value(&self) -> i64;

    /// Returns `false` if `value` is not one of the enum's constants.
    fn set_value(&mut self, value: i64) -> bool;
}

/// Static side of a reflected enum.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) on field-less
/// enums with an explicit 8, 16 or 32-bit `#[repr]`.
pub trait ReflectedEnum: ReflectEnum + PropertyType {
    /// The name the enum's [`TypeID`] is created from.
    const TYPE_NAME: &'static str;

    /// Build the enum's [`EnumInfo`].
    fn enum_info() -> EnumInfo;

    fn from_value(value: i64) -> Option<Self>;

    fn to_value(self) -> i64;

    #[inline]
    fn reflect_type_id() -> TypeID {
        TypeID::new(Self::TYPE_NAME)
    }
}

// -----------------------------------------------------------------------------
// BitFlags

/// Object-safe access to a bit flag mask.
pub trait ReflectBitFlags: Reflect {
    fn bits(&self) -> u32;

    fn set_bits(&mut self, bits: u32);

    /// The enum labelling the bits, for typed flags.
    fn flags_enum_type(&self) -> Option<TypeID>;
}

// -----------------------------------------------------------------------------
// Instances

/// Object-safe access to an optional, owned instance of some reflected type.
pub trait ReflectInstance: Reflect {
    fn instance(&self) -> Option<&dyn ReflectedType>;

    fn instance_mut(&mut self) -> Option<&mut dyn ReflectedType>;

    /// Replace the held instance.
    ///
    /// Typed holders return `false`, keeping the old instance, when the new
    /// one does not derive from their base type.
    fn set_instance(&mut self, instance: Option<Box<dyn ReflectedType>>) -> bool;

    /// The type every held instance must derive from, if restricted.
    fn base_type_id(&self) -> Option<TypeID>;
}
