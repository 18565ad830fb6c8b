use core::fmt;
use core::marker::PhantomData;

use crate::TypeID;
use crate::core_types::CoreTypeID;
use crate::info::PropertyFlags;
use crate::reflection::{PropertyType, PropertyTypeDesc, Reflect, ReflectMut, ReflectRef};
use crate::resource::{ResourceID, ResourceTypeID};

/// Where a resource handle is in its load cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Unloading,
    Failed,
}

/// A type of loadable resource, used as the argument of [`TResourcePtr`].
pub trait Resource: Send + Sync + 'static {
    const RESOURCE_TYPE: ResourceTypeID;

    /// The name of the type id used as a property's template argument.
    const TYPE_NAME: &'static str;
}

/// Object-safe access to a handle referencing a resource.
pub trait ResourceHandle: Reflect {
    fn resource_id(&self) -> &ResourceID;

    fn set_resource_id(&mut self, id: ResourceID);

    fn loading_status(&self) -> LoadingStatus;

    fn set_loading_status(&mut self, status: LoadingStatus);

    /// The resource type typed handles are limited to.
    fn required_resource_type(&self) -> Option<ResourceTypeID> {
        None
    }

    #[inline]
    fn is_set(&self) -> bool {
        self.resource_id().is_valid()
    }
}

/// Implemented by the resource system to service load and unload requests
/// issued while walking reflected data.
pub trait ResourceRequester {
    fn load_resource(&mut self, handle: &mut dyn ResourceHandle);

    fn unload_resource(&mut self, handle: &mut dyn ResourceHandle);
}

// -----------------------------------------------------------------------------
// ResourcePtr

/// An untyped handle to a resource.
///
/// Two handles are equal when they reference the same resource, whatever
/// their loading status.
#[derive(Clone, Debug, Default)]
pub struct ResourcePtr {
    id: ResourceID,
    status: LoadingStatus,
}

impl ResourcePtr {
    #[inline]
    pub fn new(id: impl Into<ResourceID>) -> Self {
        Self { id: id.into(), status: LoadingStatus::Unloaded }
    }

    #[inline]
    pub fn id(&self) -> &ResourceID {
        &self.id
    }

    #[inline]
    pub fn status(&self) -> LoadingStatus {
        self.status
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.status == LoadingStatus::Loaded
    }
}

impl PartialEq for ResourcePtr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResourcePtr {}

impl ResourceHandle for ResourcePtr {
    #[inline]
    fn resource_id(&self) -> &ResourceID {
        &self.id
    }

    #[inline]
    fn set_resource_id(&mut self, id: ResourceID) {
        self.id = id;
        self.status = LoadingStatus::Unloaded;
    }

    #[inline]
    fn loading_status(&self) -> LoadingStatus {
        self.status
    }

    #[inline]
    fn set_loading_status(&mut self, status: LoadingStatus) {
        self.status = status;
    }
}

// -----------------------------------------------------------------------------
// TResourcePtr

/// A handle to a resource of type `R`.
pub struct TResourcePtr<R> {
    inner: ResourcePtr,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> TResourcePtr<R> {
    /// # Panics
    ///
    /// Panics if `id` names a resource of another type.
    pub fn new(id: impl Into<ResourceID>) -> Self {
        let id = id.into();
        assert!(
            !id.is_valid() || id.resource_type_id() == R::RESOURCE_TYPE,
            "resource {id} is not of type {}",
            R::RESOURCE_TYPE,
        );
        Self { inner: ResourcePtr::new(id), _marker: PhantomData }
    }

    #[inline]
    pub fn id(&self) -> &ResourceID {
        &self.inner.id
    }

    #[inline]
    pub fn status(&self) -> LoadingStatus {
        self.inner.status
    }

    #[inline]
    pub fn as_untyped(&self) -> &ResourcePtr {
        &self.inner
    }
}

impl<R> Default for TResourcePtr<R> {
    #[inline]
    fn default() -> Self {
        Self { inner: ResourcePtr::default(), _marker: PhantomData }
    }
}

impl<R> Clone for TResourcePtr<R> {
    #[inline]
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), _marker: PhantomData }
    }
}

impl<R> PartialEq for TResourcePtr<R> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<R> fmt::Debug for TResourcePtr<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TResourcePtr").field(&self.inner).finish()
    }
}

impl<R: Resource> ResourceHandle for TResourcePtr<R> {
    #[inline]
    fn resource_id(&self) -> &ResourceID {
        &self.inner.id
    }

    #[inline]
    fn set_resource_id(&mut self, id: ResourceID) {
        self.inner.set_resource_id(id);
    }

    #[inline]
    fn loading_status(&self) -> LoadingStatus {
        self.inner.status
    }

    #[inline]
    fn set_loading_status(&mut self, status: LoadingStatus) {
        self.inner.status = status;
    }

    #[inline]
    fn required_resource_type(&self) -> Option<ResourceTypeID> {
        Some(R::RESOURCE_TYPE)
    }
}

// -----------------------------------------------------------------------------
// Reflection

macro_rules! impl_reflect_handle {
    (impl[$($generics:tt)*] for $ty:ty => $desc:expr) => {
        impl<$($generics)*> Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Resource(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Resource(self)
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn Reflect) -> bool {
                other.downcast_ref::<Self>().is_some_and(|other| self == other)
            }

            fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
                match other.downcast_ref::<Self>() {
                    Some(other) => {
                        self.clone_from(other);
                        true
                    }
                    None => false,
                }
            }
        }

        impl<$($generics)*> PropertyType for $ty {
            #[inline]
            fn property_type() -> PropertyTypeDesc {
                $desc
            }
        }
    };
}

impl_reflect_handle!(impl[] for ResourcePtr => PropertyTypeDesc::core(CoreTypeID::ResourcePtr));
impl_reflect_handle!(impl[R: Resource] for TResourcePtr<R> => PropertyTypeDesc::templated(
    CoreTypeID::TResourcePtr,
    TypeID::new(R::TYPE_NAME),
    PropertyFlags::empty(),
));

#[cfg(test)]
mod tests {
    use super::*;

    struct Mesh;

    impl Resource for Mesh {
        const RESOURCE_TYPE: ResourceTypeID = ResourceTypeID::new("msh");
        const TYPE_NAME: &'static str = "render::Mesh";
    }

    #[test]
    fn equality_ignores_status() {
        let mut a = ResourcePtr::new("data://a.msh");
        let b = ResourcePtr::new("data://a.msh");
        a.set_loading_status(LoadingStatus::Loaded);
        assert_eq!(a, b);
        assert!(a.reflect_eq(&b));
    }

    #[test]
    fn setting_id_resets_status() {
        let mut handle = ResourcePtr::new("data://a.msh");
        handle.set_loading_status(LoadingStatus::Loaded);
        handle.set_resource_id(ResourceID::new("data://b.msh"));
        assert_eq!(handle.loading_status(), LoadingStatus::Unloaded);
    }

    #[test]
    fn typed_handle() {
        let handle = TResourcePtr::<Mesh>::new("data://crate.msh");
        assert_eq!(handle.required_resource_type(), Some(ResourceTypeID::new("msh")));

        let desc = TResourcePtr::<Mesh>::property_type();
        assert_eq!(desc.type_id, CoreTypeID::TResourcePtr.type_id());
        assert_eq!(desc.template_argument_type_id, TypeID::new("render::Mesh"));
    }

    #[test]
    #[should_panic(expected = "is not of type")]
    fn typed_handle_checks_type() {
        let _ = TResourcePtr::<Mesh>::new("data://stone.tex");
    }
}
