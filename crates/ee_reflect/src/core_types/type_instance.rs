use core::marker::PhantomData;

use crate::TypeID;
use crate::core_types::CoreTypeID;
use crate::info::{PropertyFlags, TypeInfo, Typed};
use crate::reflection::{
    PropertyType, PropertyTypeDesc, Reflect, ReflectInstance, ReflectMut, ReflectRef,
    ReflectedType,
};

fn instances_eq(a: Option<&dyn ReflectedType>, b: Option<&dyn ReflectedType>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.reflect_eq(b),
        _ => false,
    }
}

fn clone_instance(instance: &dyn ReflectedType) -> Box<dyn ReflectedType> {
    let mut copy = instance.reflect_type_info().create_type();
    copy.reflect_set(instance);
    copy
}

// -----------------------------------------------------------------------------
// TypeInstance

/// An optional, owned instance of any reflected structure.
#[derive(Debug, Default)]
pub struct TypeInstance {
    instance: Option<Box<dyn ReflectedType>>,
}

impl TypeInstance {
    #[inline]
    pub fn new(instance: Box<dyn ReflectedType>) -> Self {
        Self { instance: Some(instance) }
    }

    /// Hold a default instance of `type_info`'s type.
    pub fn create_instance(&mut self, type_info: &TypeInfo) {
        self.instance = Some(type_info.create_type());
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.instance.is_some()
    }

    #[inline]
    pub fn instance_type_info(&self) -> Option<&'static TypeInfo> {
        self.instance.as_ref().map(|i| i.reflect_type_info())
    }

    #[inline]
    pub fn get<T: Reflect>(&self) -> Option<&T> {
        self.instance.as_deref()?.downcast_ref()
    }

    #[inline]
    pub fn get_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.instance.as_deref_mut()?.downcast_mut()
    }

    #[inline]
    pub fn take(&mut self) -> Option<Box<dyn ReflectedType>> {
        self.instance.take()
    }
}

impl Clone for TypeInstance {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.as_deref().map(clone_instance),
        }
    }
}

impl PartialEq for TypeInstance {
    fn eq(&self, other: &Self) -> bool {
        instances_eq(self.instance.as_deref(), other.instance.as_deref())
    }
}

impl Reflect for TypeInstance {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Instance(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Instance(self)
    }

    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
        match other.downcast_ref::<Self>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }
}

impl ReflectInstance for TypeInstance {
    #[inline]
    fn instance(&self) -> Option<&dyn ReflectedType> {
        self.instance.as_deref()
    }

    #[inline]
    fn instance_mut(&mut self) -> Option<&mut dyn ReflectedType> {
        self.instance.as_deref_mut()
    }

    #[inline]
    fn set_instance(&mut self, instance: Option<Box<dyn ReflectedType>>) -> bool {
        self.instance = instance;
        true
    }

    #[inline]
    fn base_type_id(&self) -> Option<TypeID> {
        None
    }
}

impl PropertyType for TypeInstance {
    fn property_type() -> PropertyTypeDesc {
        PropertyTypeDesc::core(CoreTypeID::TypeInstance)
    }
}

// -----------------------------------------------------------------------------
// TTypeInstance

/// An optional, owned instance of `T` or of a type derived from `T`.
pub struct TTypeInstance<T> {
    instance: Option<Box<dyn ReflectedType>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Typed> TTypeInstance<T> {
    /// Hold `instance` if its type derives from `T`.
    ///
    /// # Panics
    ///
    /// Panics if the instance's type does not derive from `T`.
    pub fn new(instance: Box<dyn ReflectedType>) -> Self {
        let mut result = Self::default();
        assert!(
            result.set_instance(Some(instance)),
            "instance does not derive from {}",
            T::TYPE_NAME,
        );
        result
    }

    /// Hold a default instance of `type_info`'s type, which must derive from `T`.
    pub fn create_instance(&mut self, type_info: &TypeInfo) -> bool {
        if !type_info.is_derived_from(T::reflect_type_id()) {
            return false;
        }
        self.instance = Some(type_info.create_type());
        true
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.instance.is_some()
    }

    /// The held instance through its base type, when it is exactly a `T`.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.instance.as_deref()?.downcast_ref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.instance.as_deref_mut()?.downcast_mut()
    }

    #[inline]
    pub fn get_as<U: Reflect>(&self) -> Option<&U> {
        self.instance.as_deref()?.downcast_ref()
    }
}

impl<T> Default for TTypeInstance<T> {
    #[inline]
    fn default() -> Self {
        Self { instance: None, _marker: PhantomData }
    }
}

impl<T> Clone for TTypeInstance<T> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.as_deref().map(clone_instance),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for TTypeInstance<T> {
    fn eq(&self, other: &Self) -> bool {
        instances_eq(self.instance.as_deref(), other.instance.as_deref())
    }
}

impl<T> core::fmt::Debug for TTypeInstance<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TTypeInstance")
            .field("base", &core::any::type_name::<T>())
            .field("instance", &self.instance)
            .finish()
    }
}

impl<T: Typed> Reflect for TTypeInstance<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Instance(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Instance(self)
    }

    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
        match other.downcast_ref::<Self>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }
}

impl<T: Typed> ReflectInstance for TTypeInstance<T> {
    #[inline]
    fn instance(&self) -> Option<&dyn ReflectedType> {
        self.instance.as_deref()
    }

    #[inline]
    fn instance_mut(&mut self) -> Option<&mut dyn ReflectedType> {
        self.instance.as_deref_mut()
    }

    fn set_instance(&mut self, instance: Option<Box<dyn ReflectedType>>) -> bool {
        if let Some(instance) = &instance
            && !instance.reflect_type_info().is_derived_from(T::reflect_type_id())
        {
            return false;
        }
        self.instance = instance;
        true
    }

    #[inline]
    fn base_type_id(&self) -> Option<TypeID> {
        Some(T::reflect_type_id())
    }
}

impl<T: Typed> PropertyType for TTypeInstance<T> {
    fn property_type() -> PropertyTypeDesc {
        PropertyTypeDesc::templated(
            CoreTypeID::TTypeInstance,
            TypeID::new(T::TYPE_NAME),
            PropertyFlags::empty(),
        )
    }
}
