#![expect(unsafe_code, reason = "in-place construction of reflected types")]

use core::fmt;
use core::marker::PhantomData;

use ee_ptr::{OwningPtr, Ptr, PtrMut};
use ee_utils::StringID;
use ee_utils::hash::HashMap;

use crate::TypeID;
use crate::info::{PropertyAccessor, PropertyInfo, Typed};
use crate::reflection::{Reflect, ReflectArray, ReflectMut, ReflectRef, ReflectedType};
use crate::resource::{LoadingStatus, ResourceHandle, ResourceID, ResourceRequester};

// -----------------------------------------------------------------------------
// VTable

#[derive(Copy, Clone)]
struct TypeVTable {
    create: fn() -> Box<dyn ReflectedType>,
    create_in_place: for<'a> unsafe fn(PtrMut<'a>) -> OwningPtr<'a>,
    drop_in_place: for<'a> unsafe fn(OwningPtr<'a>),
    deref: for<'a> unsafe fn(Ptr<'a>) -> &'a dyn ReflectedType,
    deref_mut: for<'a> unsafe fn(PtrMut<'a>) -> &'a mut dyn ReflectedType,
}

fn create<T: Typed>() -> Box<dyn ReflectedType> {
    Box::new(T::default())
}

unsafe fn create_in_place<T: Typed>(ptr: PtrMut<'_>) -> OwningPtr<'_> {
    // SAFETY: The caller provides a slot sized and aligned for `T`.
    unsafe { ptr.write(T::default()) }
}

unsafe fn drop_in_place<T: Typed>(ptr: OwningPtr<'_>) {
    // SAFETY: The caller guarantees the pointee is a `T`.
    unsafe { ptr.drop_as::<T>() }
}

unsafe fn deref<T: Typed>(ptr: Ptr<'_>) -> &dyn ReflectedType {
    // SAFETY: The caller guarantees the pointee is a `T`.
    unsafe { ptr.as_ref::<T>() }
}

unsafe fn deref_mut<T: Typed>(ptr: PtrMut<'_>) -> &mut dyn ReflectedType {
    // SAFETY: The caller guarantees the pointee is a `T`.
    unsafe { ptr.as_mut::<T>() }
}

impl TypeVTable {
    fn of<T: Typed>() -> Self {
        Self {
            create: create::<T>,
            create_in_place: create_in_place::<T>,
            drop_in_place: drop_in_place::<T>,
            deref: deref::<T>,
            deref_mut: deref_mut::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// Resource walking

fn visit_handles(value: &dyn Reflect, f: &mut dyn FnMut(&dyn ResourceHandle)) {
    match value.reflect_ref() {
        ReflectRef::Resource(handle) => f(handle),
        ReflectRef::Structure(structure) => {
            for property in structure.reflect_type_info().properties() {
                if let Some(value) = property.get(structure) {
                    visit_handles(value, f);
                }
            }
        }
        ReflectRef::Array(array) => {
            for index in 0..array.len() {
                if let Some(element) = array.element(index) {
                    visit_handles(element, f);
                }
            }
        }
        ReflectRef::Instance(holder) => {
            if let Some(instance) = holder.instance() {
                visit_handles(instance, f);
            }
        }
        ReflectRef::Value | ReflectRef::Enum(_) | ReflectRef::BitFlags(_) => {}
    }
}

fn visit_handles_mut(value: &mut dyn Reflect, f: &mut dyn FnMut(&mut dyn ResourceHandle)) {
    match value.reflect_mut() {
        ReflectMut::Resource(handle) => f(handle),
        ReflectMut::Structure(structure) => {
            let info = structure.reflect_type_info();
            for property in info.properties() {
                if let Some(value) = property.get_mut(&mut *structure) {
                    visit_handles_mut(value, f);
                }
            }
        }
        ReflectMut::Array(array) => {
            for index in 0..array.len() {
                if let Some(element) = array.element_mut(index) {
                    visit_handles_mut(element, f);
                }
            }
        }
        ReflectMut::Instance(holder) => {
            if let Some(instance) = holder.instance_mut() {
                visit_handles_mut(instance, f);
            }
        }
        ReflectMut::Value | ReflectMut::Enum(_) | ReflectMut::BitFlags(_) => {}
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static description of a reflected structure.
///
/// Holds the type's identity, its flattened property list (parent
/// properties first), a default instance used as the baseline of every
/// default comparison, and the operations that construct, copy and compare
/// instances of the type.
///
/// Operations taking an instance expect an instance of exactly this type;
/// lookups on instances of other types find no properties.
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::info::Typed;
/// use ee_utils::StringID;
///
/// #[derive(Reflect)]
/// struct Light {
///     intensity: f32,
///     colors: Vec<u32>,
/// }
///
/// impl Default for Light {
///     fn default() -> Self {
///         Self { intensity: 1.0, colors: vec![0xFFFFFFFF] }
///     }
/// }
///
/// let info = Light::type_info();
/// let intensity = StringID::new("intensity");
/// let colors = StringID::new("colors");
///
/// let mut light = Light::default();
/// assert!(info.is_property_value_set_to_default(&light, intensity, None));
///
/// light.intensity = 2.0;
/// assert!(!info.is_property_value_set_to_default(&light, intensity, None));
///
/// assert!(info.add_array_element(&mut light, colors));
/// assert_eq!(info.get_array_size(&light, colors), 2);
/// assert!(info.is_property_value_set_to_default(&light, colors, Some(1)));
///
/// info.reset_to_default(&mut light, intensity);
/// assert_eq!(light.intensity, 1.0);
/// ```
pub struct TypeInfo {
    id: TypeID,
    size: usize,
    alignment: usize,
    is_abstract: bool,
    parent: Option<&'static TypeInfo>,
    properties: Vec<PropertyInfo>,
    property_map: HashMap<StringID, usize>,
    default_instance: Box<dyn ReflectedType>,
    vtable: TypeVTable,
    #[cfg(feature = "tools")]
    friendly_name: String,
    #[cfg(feature = "tools")]
    category: String,
}

impl TypeInfo {
    /// Start describing `T`.
    pub fn builder<T: Typed>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder::new()
    }

    #[inline]
    pub fn id(&self) -> TypeID {
        self.id
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent
    }

    #[inline]
    pub fn parent_type_id(&self) -> TypeID {
        self.parent.map_or(TypeID::INVALID, |parent| parent.id)
    }

    #[cfg(feature = "tools")]
    #[inline]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    #[cfg(feature = "tools")]
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// `true` if `parent` is this type or one of its ancestors.
    pub fn is_derived_from(&self, parent: TypeID) -> bool {
        let mut current = Some(self);
        while let Some(info) = current {
            if info.id == parent {
                return true;
            }
            current = info.parent;
        }
        false
    }

    // -------------------------------------------------------------------------
    // Properties

    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    pub fn get_property_info(&self, property_id: StringID) -> Option<&PropertyInfo> {
        self.property_map
            .get(&property_id)
            .map(|&index| &self.properties[index])
    }

    /// The canonical default instance.
    #[inline]
    pub fn default_instance(&self) -> &dyn ReflectedType {
        &*self.default_instance
    }

    /// The property's value in the default instance.
    #[inline]
    pub fn get_default_value(&self, property: &PropertyInfo) -> Option<&dyn Reflect> {
        property.get(self.default_instance())
    }

    pub fn get_property_value<'a>(
        &self,
        instance: &'a dyn ReflectedType,
        property_id: StringID,
    ) -> Option<&'a dyn Reflect> {
        self.get_property_info(property_id)?.get(instance)
    }

    pub fn get_property_value_mut<'a>(
        &self,
        instance: &'a mut dyn ReflectedType,
        property_id: StringID,
    ) -> Option<&'a mut dyn Reflect> {
        self.get_property_info(property_id)?.get_mut(instance)
    }

    // -------------------------------------------------------------------------
    // Arrays

    fn array<'a>(&self, instance: &'a dyn ReflectedType, property_id: StringID) -> Option<&'a dyn ReflectArray> {
        self.get_property_value(instance, property_id)?.reflect_ref().as_array()
    }

    fn array_mut<'a>(
        &self,
        instance: &'a mut dyn ReflectedType,
        property_id: StringID,
    ) -> Option<&'a mut dyn ReflectArray> {
        self.get_property_value_mut(instance, property_id)?.reflect_mut().as_array()
    }

    /// Current length of an array property, `0` for anything else.
    pub fn get_array_size(&self, instance: &dyn ReflectedType, property_id: StringID) -> usize {
        self.array(instance, property_id).map_or(0, |array| array.len())
    }

    /// Resize a dynamic array property.
    pub fn set_array_size(&self, instance: &mut dyn ReflectedType, property_id: StringID, size: usize) -> bool {
        self.array_mut(instance, property_id)
            .is_some_and(|array| array.set_len(size))
    }

    pub fn get_array_element_size(&self, property_id: StringID) -> usize {
        self.get_property_info(property_id)
            .map_or(0, |property| property.array_element_size)
    }

    pub fn get_array_element<'a>(
        &self,
        instance: &'a dyn ReflectedType,
        property_id: StringID,
        index: usize,
    ) -> Option<&'a dyn Reflect> {
        self.array(instance, property_id)?.element(index)
    }

    pub fn get_array_element_mut<'a>(
        &self,
        instance: &'a mut dyn ReflectedType,
        property_id: StringID,
        index: usize,
    ) -> Option<&'a mut dyn Reflect> {
        self.array_mut(instance, property_id)?.element_mut(index)
    }

    /// Append a default element to a dynamic array property.
    pub fn add_array_element(&self, instance: &mut dyn ReflectedType, property_id: StringID) -> bool {
        self.array_mut(instance, property_id)
            .is_some_and(|array| array.insert_default(array.len()))
    }

    /// Insert a default element before `index`.
    pub fn insert_array_element(
        &self,
        instance: &mut dyn ReflectedType,
        property_id: StringID,
        index: usize,
    ) -> bool {
        self.array_mut(instance, property_id)
            .is_some_and(|array| array.insert_default(index))
    }

    pub fn move_array_element(
        &self,
        instance: &mut dyn ReflectedType,
        property_id: StringID,
        from: usize,
        to: usize,
    ) -> bool {
        self.array_mut(instance, property_id)
            .is_some_and(|array| array.move_element(from, to))
    }

    pub fn remove_array_element(
        &self,
        instance: &mut dyn ReflectedType,
        property_id: StringID,
        index: usize,
    ) -> bool {
        self.array_mut(instance, property_id)
            .is_some_and(|array| array.remove(index))
    }

    // -------------------------------------------------------------------------
    // Copy and compare

    /// Copy every property value of `source` onto `target`.
    pub fn copy_properties(&self, target: &mut dyn ReflectedType, source: &dyn ReflectedType) {
        for property in &self.properties {
            let Some(value) = property.get(source) else {
                continue;
            };
            if let Some(slot) = property.get_mut(&mut *target) {
                slot.reflect_set(value);
            }
        }
    }

    pub fn are_all_property_values_equal(&self, a: &dyn ReflectedType, b: &dyn ReflectedType) -> bool {
        self.properties.iter().all(|property| {
            match (property.get(a), property.get(b)) {
                (Some(a), Some(b)) => a.reflect_eq(b),
                _ => false,
            }
        })
    }

    /// Compare one property, or one element of an array property, of two instances.
    pub fn is_property_value_equal(
        &self,
        a: &dyn ReflectedType,
        b: &dyn ReflectedType,
        property_id: StringID,
        array_index: Option<usize>,
    ) -> bool {
        let Some(property) = self.get_property_info(property_id) else {
            return false;
        };
        let (Some(a), Some(b)) = (property.get(a), property.get(b)) else {
            return false;
        };

        match array_index {
            None => a.reflect_eq(b),
            Some(index) => {
                let (Some(a), Some(b)) = (a.reflect_ref().as_array(), b.reflect_ref().as_array()) else {
                    return false;
                };
                match (a.element(index), b.element(index)) {
                    (Some(a), Some(b)) => a.reflect_eq(b),
                    _ => false,
                }
            }
        }
    }

    /// Compare one property, or array element, against the default instance.
    ///
    /// Elements past the end of the default array are compared against a
    /// default-constructed element.
    pub fn is_property_value_set_to_default(
        &self,
        instance: &dyn ReflectedType,
        property_id: StringID,
        array_index: Option<usize>,
    ) -> bool {
        let Some(index) = array_index else {
            return self.is_property_value_equal(instance, self.default_instance(), property_id, None);
        };

        let Some(property) = self.get_property_info(property_id) else {
            return false;
        };
        let (Some(value), Some(default)) = (property.get(instance), self.get_default_value(property)) else {
            return false;
        };
        let (Some(array), Some(default_array)) = (value.reflect_ref().as_array(), default.reflect_ref().as_array()) else {
            return false;
        };
        let Some(element) = array.element(index) else {
            return false;
        };

        match default_array.element(index) {
            Some(default_element) => element.reflect_eq(default_element),
            None => element.reflect_eq(&*array.new_default_element()),
        }
    }

    /// Set one property back to the default instance's value.
    pub fn reset_to_default(&self, instance: &mut dyn ReflectedType, property_id: StringID) -> bool {
        let Some(property) = self.get_property_info(property_id) else {
            return false;
        };
        let Some(default) = self.get_default_value(property) else {
            return false;
        };
        property
            .get_mut(instance)
            .is_some_and(|value| value.reflect_set(default))
    }

    // -------------------------------------------------------------------------
    // Construction

    /// A new default instance.
    ///
    /// # Panics
    ///
    /// Panics if the type is abstract.
    pub fn create_type(&self) -> Box<dyn ReflectedType> {
        assert!(!self.is_abstract, "cannot create abstract type {}", self.id);
        (self.vtable.create)()
    }

    /// Default-construct an instance in the slot at `ptr`.
    ///
    /// # Panics
    ///
    /// Panics if the type is abstract.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least [`size`](Self::size) writable bytes aligned
    /// to [`alignment`](Self::alignment). Any previous content is overwritten
    /// without being dropped.
    pub unsafe fn create_type_in_place<'a>(&self, ptr: PtrMut<'a>) -> OwningPtr<'a> {
        assert!(!self.is_abstract, "cannot create abstract type {}", self.id);
        // SAFETY: Forwarded from the caller.
        unsafe { (self.vtable.create_in_place)(ptr) }
    }

    /// Drop the instance at `ptr` without freeing its memory.
    ///
    /// # Safety
    ///
    /// `ptr` must own a live instance of this type.
    pub unsafe fn drop_in_place(&self, ptr: OwningPtr<'_>) {
        // SAFETY: Forwarded from the caller.
        unsafe { (self.vtable.drop_in_place)(ptr) }
    }

    /// View the instance at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live instance of this type.
    pub unsafe fn deref_instance<'a>(&self, ptr: Ptr<'a>) -> &'a dyn ReflectedType {
        // SAFETY: Forwarded from the caller.
        unsafe { (self.vtable.deref)(ptr) }
    }

    /// Mutably view the instance at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live instance of this type.
    pub unsafe fn deref_instance_mut<'a>(&self, ptr: PtrMut<'a>) -> &'a mut dyn ReflectedType {
        // SAFETY: Forwarded from the caller.
        unsafe { (self.vtable.deref_mut)(ptr) }
    }

    // -------------------------------------------------------------------------
    // Resources

    /// Append the id of every set resource handle reachable from `instance`.
    ///
    /// Existing content of `out` is kept.
    pub fn get_referenced_resources(&self, instance: &dyn ReflectedType, out: &mut Vec<ResourceID>) {
        visit_handles(instance, &mut |handle| {
            if handle.is_set() {
                out.push(handle.resource_id().clone());
            }
        });
    }

    /// Hand every set resource handle reachable from `instance` to `requester`.
    pub fn load_resources(&self, requester: &mut dyn ResourceRequester, instance: &mut dyn ReflectedType) {
        visit_handles_mut(instance, &mut |handle| {
            if handle.is_set() {
                requester.load_resource(handle);
            }
        });
    }

    pub fn unload_resources(&self, requester: &mut dyn ResourceRequester, instance: &mut dyn ReflectedType) {
        visit_handles_mut(instance, &mut |handle| {
            if handle.is_set() {
                requester.unload_resource(handle);
            }
        });
    }

    /// Combined loading status of the handles reachable from `instance`.
    ///
    /// `Loading` while any handle is not done, then `Failed` if any handle
    /// failed, otherwise `Loaded`.
    pub fn get_resource_loading_status(&self, instance: &dyn ReflectedType) -> LoadingStatus {
        let mut loading = false;
        let mut failed = false;
        visit_handles(instance, &mut |handle| {
            if !handle.is_set() {
                return;
            }
            match handle.loading_status() {
                LoadingStatus::Loaded => {}
                LoadingStatus::Failed => failed = true,
                LoadingStatus::Unloaded | LoadingStatus::Loading | LoadingStatus::Unloading => {
                    loading = true;
                }
            }
        });

        if loading {
            LoadingStatus::Loading
        } else if failed {
            LoadingStatus::Failed
        } else {
            LoadingStatus::Loaded
        }
    }

    /// `Unloading` while any handle reachable from `instance` still holds or
    /// is fetching its resource, otherwise `Unloaded`.
    pub fn get_resource_unloading_status(&self, instance: &dyn ReflectedType) -> LoadingStatus {
        let mut unloading = false;
        visit_handles(instance, &mut |handle| {
            unloading |= matches!(
                handle.loading_status(),
                LoadingStatus::Loading | LoadingStatus::Loaded | LoadingStatus::Unloading
            );
        });

        if unloading {
            LoadingStatus::Unloading
        } else {
            LoadingStatus::Unloaded
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("id", &self.id)
            .field("parent", &self.parent_type_id())
            .field("size", &self.size)
            .field("alignment", &self.alignment)
            .field("is_abstract", &self.is_abstract)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeInfoBuilder

/// Builds the [`TypeInfo`] of `T`.
///
/// Generated by [`#[derive(Reflect)]`](crate::derive::Reflect); a parent
/// must be declared before any property.
pub struct TypeInfoBuilder<T: Typed> {
    parent: Option<&'static TypeInfo>,
    properties: Vec<PropertyInfo>,
    is_abstract: bool,
    #[cfg(feature = "tools")]
    friendly_name: Option<String>,
    #[cfg(feature = "tools")]
    category: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Typed> TypeInfoBuilder<T> {
    fn new() -> Self {
        Self {
            parent: None,
            properties: Vec::new(),
            is_abstract: false,
            #[cfg(feature = "tools")]
            friendly_name: None,
            #[cfg(feature = "tools")]
            category: String::new(),
            _marker: PhantomData,
        }
    }

    /// Declare the field of type `P` at `offset` as this type's parent.
    ///
    /// The parent's properties become properties of `T`, reached through
    /// that field.
    ///
    /// # Panics
    ///
    /// Panics if a parent or a property was already declared.
    pub fn with_parent<P: Typed>(mut self, offset: usize, get: fn(&T) -> &P, get_mut: fn(&mut T) -> &mut P) -> Self {
        assert!(self.parent.is_none(), "{} declares more than one parent", T::TYPE_NAME);
        assert!(
            self.properties.is_empty(),
            "{} must declare its parent before its properties",
            T::TYPE_NAME,
        );

        let parent = P::type_info();
        let outer = PropertyAccessor::field(get, get_mut);
        self.properties = parent
            .properties()
            .iter()
            .map(|property| property.nested_in(offset, &outer))
            .collect();
        self.parent = Some(parent);
        self
    }

    /// # Panics
    ///
    /// Panics if a property with the same id exists, including one
    /// inherited from the parent.
    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        assert!(
            self.properties.iter().all(|existing| existing.id != property.id),
            "{} declares property {} twice",
            T::TYPE_NAME,
            property.id,
        );
        self.properties.push(property);
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Ignored without the `tools` feature.
    #[cfg_attr(not(feature = "tools"), expect(unused_mut, unused_variables))]
    pub fn with_friendly_name(mut self, name: &str) -> Self {
        #[cfg(feature = "tools")]
        {
            self.friendly_name = Some(name.to_owned());
        }
        self
    }

    /// Ignored without the `tools` feature.
    #[cfg_attr(not(feature = "tools"), expect(unused_mut, unused_variables))]
    pub fn with_category(mut self, category: &str) -> Self {
        #[cfg(feature = "tools")]
        {
            self.category = category.to_owned();
        }
        self
    }

    pub fn build(self) -> TypeInfo {
        let default_instance: Box<dyn ReflectedType> = Box::new(T::default());

        let mut properties = self.properties;
        for property in properties.iter_mut().filter(|p| p.is_dynamic_array()) {
            property.array_size = property
                .get(&*default_instance)
                .and_then(|value| value.reflect_ref().as_array())
                .map_or(0, |array| array.len());
        }

        let property_map = properties
            .iter()
            .enumerate()
            .map(|(index, property)| (property.id, index))
            .collect();

        TypeInfo {
            id: T::reflect_type_id(),
            size: size_of::<T>(),
            alignment: align_of::<T>(),
            is_abstract: self.is_abstract,
            parent: self.parent,
            properties,
            property_map,
            default_instance,
            vtable: TypeVTable::of::<T>(),
            #[cfg(feature = "tools")]
            friendly_name: self
                .friendly_name
                .unwrap_or_else(|| default_friendly_name(T::TYPE_NAME)),
            #[cfg(feature = "tools")]
            category: self.category,
        }
    }
}

#[cfg(feature = "tools")]
fn default_friendly_name(type_name: &str) -> String {
    type_name.rsplit("::").next().unwrap_or(type_name).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::TypeInstance;
    use crate::derive::Reflect;
    use crate::resource::ResourcePtr;

    #[derive(Reflect, Debug, PartialEq)]
    struct Stats {
        hp: u32,
        tags: Vec<u8>,
        speeds: [f32; 2],
    }

    impl Default for Stats {
        fn default() -> Self {
            Self {
                hp: 100,
                tags: vec![1, 2],
                speeds: [1.0, 2.0],
            }
        }
    }

    #[derive(Reflect, Default)]
    struct Part {
        mesh: ResourcePtr,
    }

    #[derive(Reflect, Default)]
    struct Loadout {
        icon: ResourcePtr,
        meshes: Vec<ResourcePtr>,
        part: Part,
        extra: TypeInstance,
        unset: ResourcePtr,
    }

    fn id(name: &str) -> StringID {
        StringID::new(name)
    }

    fn loadout() -> Loadout {
        let mut extra = TypeInstance::default();
        extra.create_instance(Part::type_info());
        extra.get_mut::<Part>().unwrap().mesh = ResourcePtr::new("data://extra.msh");

        Loadout {
            icon: ResourcePtr::new("data://icon.tex"),
            meshes: vec![ResourcePtr::new("data://a.msh"), ResourcePtr::default()],
            part: Part { mesh: ResourcePtr::new("data://part.msh") },
            extra,
            unset: ResourcePtr::default(),
        }
    }

    fn set_all_statuses(loadout: &mut Loadout, status: LoadingStatus) {
        Loadout::type_info().load_resources(&mut StatusSetter(status), loadout);
    }

    struct StatusSetter(LoadingStatus);

    impl ResourceRequester for StatusSetter {
        fn load_resource(&mut self, handle: &mut dyn ResourceHandle) {
            handle.set_loading_status(self.0);
        }

        fn unload_resource(&mut self, handle: &mut dyn ResourceHandle) {
            handle.set_loading_status(LoadingStatus::Unloaded);
        }
    }

    #[derive(Default)]
    struct Recorder {
        loaded: Vec<String>,
        unloaded: Vec<String>,
    }

    impl ResourceRequester for Recorder {
        fn load_resource(&mut self, handle: &mut dyn ResourceHandle) {
            self.loaded.push(handle.resource_id().path().as_str().to_owned());
            handle.set_loading_status(LoadingStatus::Loading);
        }

        fn unload_resource(&mut self, handle: &mut dyn ResourceHandle) {
            self.unloaded.push(handle.resource_id().path().as_str().to_owned());
            handle.set_loading_status(LoadingStatus::Unloading);
        }
    }

    #[test]
    fn properties_and_default_values() {
        let info = Stats::type_info();
        assert_eq!(info.num_properties(), 3);
        assert_eq!(info.properties()[0].id, id("hp"));
        assert!(info.get_property_info(id("missing")).is_none());
        assert!(!info.is_abstract());
        assert_eq!(info.size(), size_of::<Stats>());

        let hp = info.get_property_info(id("hp")).unwrap();
        assert!(info.get_default_value(hp).unwrap().reflect_eq(&100u32));

        let tags = info.get_property_info(id("tags")).unwrap();
        assert_eq!(tags.array_size, 2);
        assert_eq!(info.get_array_element_size(id("tags")), 1);
        assert_eq!(info.get_array_element_size(id("speeds")), 4);
    }

    #[test]
    fn copy_and_compare() {
        let info = Stats::type_info();
        let source = Stats { hp: 7, tags: vec![9], speeds: [0.5, 0.25] };
        let mut target = Stats::default();

        assert!(!info.are_all_property_values_equal(&source, &target));
        assert!(!info.is_property_value_equal(&source, &target, id("tags"), Some(1)));

        info.copy_properties(&mut target, &source);
        assert_eq!(target, source);
        assert!(info.are_all_property_values_equal(&source, &target));
        assert!(info.is_property_value_equal(&source, &target, id("speeds"), Some(1)));
        assert!(!info.is_property_value_equal(&source, &target, id("missing"), None));
    }

    #[test]
    fn array_editing_through_type_info() {
        let info = Stats::type_info();
        let mut stats = Stats::default();
        let tags = id("tags");

        assert_eq!(info.get_array_size(&stats, tags), 2);
        assert!(info.add_array_element(&mut stats, tags));
        assert!(info.insert_array_element(&mut stats, tags, 0));
        assert_eq!(stats.tags, [0, 1, 2, 0]);

        *info
            .get_array_element_mut(&mut stats, tags, 3)
            .unwrap()
            .downcast_mut::<u8>()
            .unwrap() = 5;
        assert!(info.move_array_element(&mut stats, tags, 3, 0));
        assert_eq!(stats.tags, [5, 0, 1, 2]);

        assert!(info.remove_array_element(&mut stats, tags, 1));
        assert!(!info.remove_array_element(&mut stats, tags, 3));
        assert!(!info.insert_array_element(&mut stats, tags, 9));
        assert_eq!(stats.tags, [5, 1, 2]);
        assert!(info.get_array_element(&stats, tags, 0).unwrap().reflect_eq(&5u8));

        assert!(info.set_array_size(&mut stats, tags, 1));
        assert_eq!(stats.tags, [5]);

        let speeds = id("speeds");
        assert!(!info.set_array_size(&mut stats, speeds, 3));
        assert!(!info.add_array_element(&mut stats, speeds));
        assert!(!info.remove_array_element(&mut stats, speeds, 0));
        assert!(info.move_array_element(&mut stats, speeds, 0, 1));
        assert_eq!(stats.speeds, [2.0, 1.0]);

        assert_eq!(info.get_array_size(&stats, id("hp")), 0);
        assert!(!info.add_array_element(&mut stats, id("hp")));
    }

    #[test]
    fn default_checks_and_reset() {
        let info = Stats::type_info();
        let mut stats = Stats { hp: 1, tags: vec![1, 7, 0], ..Default::default() };

        assert!(!info.is_property_value_set_to_default(&stats, id("hp"), None));
        assert!(info.is_property_value_set_to_default(&stats, id("tags"), Some(0)));
        assert!(!info.is_property_value_set_to_default(&stats, id("tags"), Some(1)));
        // Past the default length the element is compared to a fresh default.
        assert!(info.is_property_value_set_to_default(&stats, id("tags"), Some(2)));
        assert!(!info.is_property_value_set_to_default(&stats, id("tags"), Some(3)));

        assert!(info.reset_to_default(&mut stats, id("hp")));
        assert!(info.reset_to_default(&mut stats, id("tags")));
        assert!(!info.reset_to_default(&mut stats, id("missing")));
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn referenced_resources_are_appended() {
        let info = Loadout::type_info();
        let loadout = loadout();

        let mut out = vec![ResourceID::new("data://kept.tex")];
        info.get_referenced_resources(&loadout, &mut out);

        let paths: Vec<&str> = out.iter().map(|id| id.path().as_str()).collect();
        assert_eq!(
            paths,
            ["data://kept.tex", "data://icon.tex", "data://a.msh", "data://part.msh", "data://extra.msh"]
        );
    }

    #[test]
    fn load_and_unload_visit_set_handles() {
        let info = Loadout::type_info();
        let mut loadout = loadout();
        let mut recorder = Recorder::default();

        info.load_resources(&mut recorder, &mut loadout);
        assert_eq!(recorder.loaded.len(), 4);
        assert_eq!(loadout.icon.status(), LoadingStatus::Loading);
        assert_eq!(loadout.unset.status(), LoadingStatus::Unloaded);

        info.unload_resources(&mut recorder, &mut loadout);
        assert_eq!(recorder.unloaded, recorder.loaded);
        assert_eq!(loadout.part.mesh.status(), LoadingStatus::Unloading);
    }

    #[test]
    fn loading_status_aggregation() {
        let info = Loadout::type_info();
        let mut loadout = loadout();

        set_all_statuses(&mut loadout, LoadingStatus::Loaded);
        assert_eq!(info.get_resource_loading_status(&loadout), LoadingStatus::Loaded);

        loadout.part.mesh.set_loading_status(LoadingStatus::Failed);
        assert_eq!(info.get_resource_loading_status(&loadout), LoadingStatus::Failed);

        loadout.icon.set_loading_status(LoadingStatus::Loading);
        assert_eq!(info.get_resource_loading_status(&loadout), LoadingStatus::Loading);

        set_all_statuses(&mut loadout, LoadingStatus::Unloaded);
        assert_eq!(info.get_resource_loading_status(&loadout), LoadingStatus::Loading);

        let empty = Loadout::default();
        assert_eq!(info.get_resource_loading_status(&empty), LoadingStatus::Loaded);
    }

    #[test]
    fn unloading_status_aggregation() {
        let info = Loadout::type_info();
        let mut loadout = loadout();
        assert_eq!(info.get_resource_unloading_status(&loadout), LoadingStatus::Unloaded);

        set_all_statuses(&mut loadout, LoadingStatus::Loaded);
        assert_eq!(info.get_resource_unloading_status(&loadout), LoadingStatus::Unloading);

        set_all_statuses(&mut loadout, LoadingStatus::Unloaded);
        loadout.meshes[0].set_loading_status(LoadingStatus::Failed);
        assert_eq!(info.get_resource_unloading_status(&loadout), LoadingStatus::Unloaded);

        loadout.meshes[0].set_loading_status(LoadingStatus::Unloading);
        assert_eq!(info.get_resource_unloading_status(&loadout), LoadingStatus::Unloading);
    }

    #[test]
    fn instances_are_created_and_dropped_in_place() {
        let info = Stats::type_info();
        let boxed = info.create_type();
        assert_eq!(boxed.downcast_ref::<Stats>(), Some(&Stats::default()));

        let mut slot = core::mem::MaybeUninit::<Stats>::uninit();
        // SAFETY: `slot` is sized and aligned for `Stats`, and the instance
        // is dropped once below.
        unsafe {
            let ptr = PtrMut::new(core::ptr::NonNull::from(&mut slot).cast());
            let mut owned = info.create_type_in_place(ptr);
            let instance = info.deref_instance_mut(owned.as_mut());
            instance.downcast_mut::<Stats>().unwrap().hp = 3;
            assert_eq!(info.deref_instance(owned.as_ref()).downcast_ref::<Stats>().unwrap().hp, 3);
            info.drop_in_place(owned);
        }
    }
}
