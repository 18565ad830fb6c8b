use core::fmt;
use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::TypeID;
use crate::core_types::CoreTypeID;
use crate::info::PropertyFlags;
use crate::reflection::{
    PropertyType, PropertyTypeDesc, Reflect, ReflectBitFlags, ReflectMut, ReflectRef,
    ReflectedEnum,
};

/// Largest bit index a flag may use.
pub const MAX_FLAGS: u32 = 32;

#[inline]
fn bit(index: u32) -> u32 {
    assert!(index < MAX_FLAGS, "bit flag index {index} out of range");
    1 << index
}

// -----------------------------------------------------------------------------
// BitFlags

/// An untyped 32-bit flag mask addressed by bit index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitFlags(pub u32);

impl BitFlags {
    #[inline]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_flag_set(&self, index: u32) -> bool {
        self.0 & bit(index) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, index: u32, value: bool) {
        if value {
            self.0 |= bit(index);
        } else {
            self.0 &= !bit(index);
        }
    }

    #[inline]
    pub fn flip_flag(&mut self, index: u32) {
        self.0 ^= bit(index);
    }

    #[inline]
    pub fn are_any_flags_set(&self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub fn clear_all_flags(&mut self) {
        self.0 = 0;
    }
}

impl Reflect for BitFlags {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::BitFlags(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::BitFlags(self)
    }

    #[inline]
    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
        match other.downcast_ref::<Self>() {
            Some(other) => {
                *self = *other;
                true
            }
            None => false,
        }
    }
}

impl ReflectBitFlags for BitFlags {
    #[inline]
    fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    fn set_bits(&mut self, bits: u32) {
        self.0 = bits;
    }

    #[inline]
    fn flags_enum_type(&self) -> Option<TypeID> {
        None
    }
}

impl PropertyType for BitFlags {
    fn property_type() -> PropertyTypeDesc {
        PropertyTypeDesc::new(CoreTypeID::BitFlags.type_id(), PropertyFlags::IS_BIT_FLAGS)
    }
}

// -----------------------------------------------------------------------------
// TBitFlags

/// A 32-bit flag mask whose bits are labelled by the constants of `E`.
///
/// The bit index of a flag is the enum constant's value, which must be in
/// `0..32`.
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::core_types::TBitFlags;
///
/// #[derive(Reflect, Copy, Clone, Default)]
/// #[repr(u8)]
/// enum Layer {
///     #[default]
///     Ground = 0,
///     Water = 1,
///     Air = 4,
/// }
///
/// let mut flags = TBitFlags::<Layer>::default();
/// flags.set_flag(Layer::Air, true);
/// flags.set_flag(Layer::Water, true);
///
/// assert!(flags.is_flag_set(Layer::Air));
/// assert!(!flags.is_flag_set(Layer::Ground));
/// assert_eq!(flags.bits(), 0b1_0010);
/// ```
pub struct TBitFlags<E> {
    bits: u32,
    _marker: PhantomData<fn() -> E>,
}

impl<E> TBitFlags<E> {
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits, _marker: PhantomData }
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn are_any_flags_set(&self) -> bool {
        self.bits != 0
    }

    #[inline]
    pub fn clear_all_flags(&mut self) {
        self.bits = 0;
    }
}

fn flag_index<E: ReflectedEnum>(flag: E) -> u32 {
    let value = flag.to_value();
    assert!(
        (0..MAX_FLAGS as i64).contains(&value),
        "enum value {value} of {} cannot label a bit flag",
        E::TYPE_NAME,
    );
    value as u32
}

impl<E: ReflectedEnum> TBitFlags<E> {
    #[inline]
    pub fn is_flag_set(&self, flag: E) -> bool {
        self.bits & bit(flag_index(flag)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: E, value: bool) {
        let mask = bit(flag_index(flag));
        if value {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// Build a mask with each of `flags` set.
    pub fn with_flags(flags: impl IntoIterator<Item = E>) -> Self {
        let mut result = Self::default();
        for flag in flags {
            result.set_flag(flag, true);
        }
        result
    }
}

impl<E> Default for TBitFlags<E> {
    #[inline]
    fn default() -> Self {
        Self::from_bits(0)
    }
}

impl<E> Clone for TBitFlags<E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for TBitFlags<E> {}

impl<E> PartialEq for TBitFlags<E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for TBitFlags<E> {}

impl<E> fmt::Debug for TBitFlags<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TBitFlags<{}>({:#x})", core::any::type_name::<E>(), self.bits)
    }
}

impl<E> From<TBitFlags<E>> for BitFlags {
    #[inline]
    fn from(value: TBitFlags<E>) -> Self {
        BitFlags(value.bits)
    }
}

impl<E: ReflectedEnum> Reflect for TBitFlags<E> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::BitFlags(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::BitFlags(self)
    }

    #[inline]
    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
        match other.downcast_ref::<Self>() {
            Some(other) => {
                *self = *other;
                true
            }
            None => false,
        }
    }
}

impl<E: ReflectedEnum> ReflectBitFlags for TBitFlags<E> {
    #[inline]
    fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    fn set_bits(&mut self, bits: u32) {
        self.bits = bits;
    }

    #[inline]
    fn flags_enum_type(&self) -> Option<TypeID> {
        Some(E::reflect_type_id())
    }
}

impl<E: ReflectedEnum> PropertyType for TBitFlags<E> {
    fn property_type() -> PropertyTypeDesc {
        PropertyTypeDesc::templated(
            CoreTypeID::TBitFlags,
            E::reflect_type_id(),
            PropertyFlags::IS_BIT_FLAGS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_flags() {
        let mut flags = BitFlags::default();
        flags.set_flag(3, true);
        flags.set_flag(31, true);
        assert!(flags.is_flag_set(3));
        assert_eq!(flags.bits(), (1 << 3) | (1 << 31));

        flags.flip_flag(3);
        flags.set_flag(31, false);
        assert!(!flags.are_any_flags_set());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn bit_index_is_checked() {
        BitFlags::default().set_flag(32, true);
    }

    #[test]
    fn reflected_as_bit_flags() {
        let mut flags = BitFlags::new(5);
        let ReflectMut::BitFlags(view) = flags.reflect_mut() else {
            panic!("expected bit flags");
        };
        assert_eq!(view.bits(), 5);
        view.set_bits(9);
        assert!(view.flags_enum_type().is_none());
        assert_eq!(flags, BitFlags::new(9));
    }
}
