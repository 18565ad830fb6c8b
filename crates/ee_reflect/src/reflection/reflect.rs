use core::any::Any;

use crate::info::TypeInfo;
use crate::reflection::{ReflectArray, ReflectBitFlags, ReflectEnum, ReflectInstance};
use crate::resource::ResourceHandle;

// -----------------------------------------------------------------------------
// Reflect

/// The base trait of every value the reflection system can see.
///
/// It answers two questions about a value behind a `dyn` reference: which
/// structural kind it is ([`reflect_ref`](Reflect::reflect_ref)), and how it
/// compares to or copies from another value of the same type.
///
/// Implemented for all core value types, `Vec<T>`, `[T; N]` and
/// `SmallVec<[T; N]>` of property types, and for user types through
/// [`#[derive(Reflect)]`](crate::derive::Reflect).
///
/// # Examples
///
/// ```
/// use ee_reflect::{Reflect, ReflectRef};
///
/// let value: &dyn Reflect = &7u32;
/// assert!(matches!(value.reflect_ref(), ReflectRef::Value));
/// assert!(value.reflect_eq(&7u32));
/// assert!(!value.reflect_eq(&7i32));
/// assert_eq!(value.downcast_ref::<u32>(), Some(&7));
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Borrow the value as its structural kind.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Mutably borrow the value as its structural kind.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// `true` if `other` has the same type and an equal value.
    fn reflect_eq(&self, other: &dyn Reflect) -> bool;

    /// Overwrite `self` with the value of `other`.
    ///
    /// Returns `false`, leaving `self` unchanged, if the types differ.
    fn reflect_set(&mut self, other: &dyn Reflect) -> bool;

    /// Returns the [type name] of the underlying type.
    ///
    /// [type name]: core::any::type_name
    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect<{}>", self.reflect_type_name())
    }
}

// -----------------------------------------------------------------------------
// ReflectedType

/// A user-defined structure with a [`TypeInfo`].
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) on structs.
pub trait ReflectedType: Reflect {
    /// The [`TypeInfo`] of the concrete type behind this value.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Called after a descriptor finished restoring properties onto this value.
    #[inline]
    fn post_deserialize(&mut self) {}
}

impl dyn ReflectedType {
    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }
}

impl core::fmt::Debug for dyn ReflectedType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn ReflectedType<{}>", self.reflect_type_info().id())
    }
}

// -----------------------------------------------------------------------------
// ReflectRef / ReflectMut

/// An immutable view of a reflected value, by structural kind.
pub enum ReflectRef<'a> {
    /// A leaf core value (numbers, strings, vectors, ranges, ...).
    Value,
    Enum(&'a dyn ReflectEnum),
    BitFlags(&'a dyn ReflectBitFlags),
    Resource(&'a dyn ResourceHandle),
    Instance(&'a dyn ReflectInstance),
    Structure(&'a dyn ReflectedType),
    Array(&'a dyn ReflectArray),
}

/// A mutable view of a reflected value, by structural kind.
pub enum ReflectMut<'a> {
    /// A leaf core value (numbers, strings, vectors, ranges, ...).
    Value,
    Enum(&'a mut dyn ReflectEnum),
    BitFlags(&'a mut dyn ReflectBitFlags),
    Resource(&'a mut dyn ResourceHandle),
    Instance(&'a mut dyn ReflectInstance),
    Structure(&'a mut dyn ReflectedType),
    Array(&'a mut dyn ReflectArray),
}

impl<'a> ReflectRef<'a> {
    #[inline]
    pub fn as_array(self) -> Option<&'a dyn ReflectArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub fn as_structure(self) -> Option<&'a dyn ReflectedType> {
        match self {
            Self::Structure(value) => Some(value),
            _ => None,
        }
    }
}

impl<'a> ReflectMut<'a> {
    #[inline]
    pub fn as_array(self) -> Option<&'a mut dyn ReflectArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub fn as_structure(self) -> Option<&'a mut dyn ReflectedType> {
        match self {
            Self::Structure(value) => Some(value),
            _ => None,
        }
    }
}
