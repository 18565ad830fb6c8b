#![expect(unsafe_code, reason = "descriptors can restore instances in caller-provided memory")]

use ee_ptr::{OwningPtr, PtrMut};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::TypeID;
use crate::conversion::{ConversionError, convert_binary_to_native, convert_native_to_binary};
use crate::info::{PropertyInfo, TypeInfo};
use crate::path::{PathElement, PropertyPath};
use crate::reflection::{Reflect, ReflectedType};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// One non-default property value.
///
/// The path of a dynamic array property without an element index records the
/// array's length instead of a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub path: PropertyPath,
    pub byte_value: Vec<u8>,
    /// The value in string form, for editors and diffs.
    #[cfg(feature = "tools")]
    #[serde(default)]
    pub string_value: String,
}

impl PropertyDescriptor {
    pub fn new(path: PropertyPath, byte_value: Vec<u8>) -> Self {
        Self {
            path,
            byte_value,
            #[cfg(feature = "tools")]
            string_value: String::new(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.path.is_valid()
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The properties of a reflected instance that differ from its type's
/// default instance.
///
/// Restoring a descriptor is tolerant of schema changes: a property whose
/// path no longer resolves, or whose value no longer converts, is logged and
/// skipped.
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::descriptor::TypeDescriptor;
/// use ee_reflect::info::Typed;
/// use ee_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect, Default)]
/// struct Door {
///     locked: bool,
///     keys: Vec<u32>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type::<Door>();
///
/// let door = Door { locked: true, keys: vec![0, 7] };
/// let descriptor = TypeDescriptor::describe_type(&registry, &door, true);
///
/// let paths: Vec<String> = descriptor.properties.iter().map(|p| p.path.to_string()).collect();
/// assert_eq!(paths, ["locked", "keys", "keys/1"]);
///
/// let copy = descriptor.create_type(&registry).unwrap();
/// assert!(Door::type_info().are_all_property_values_equal(&door, &*copy));
///
/// registry.unregister_type(descriptor.type_id);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub type_id: TypeID,
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// A descriptor of `type_id` with no overrides.
    #[inline]
    pub fn new(type_id: TypeID) -> Self {
        Self {
            type_id,
            properties: Vec::new(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.type_id.is_valid()
    }

    /// The descriptor entry at `path`.
    pub fn get_property(&self, path: &PropertyPath) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| &property.path == path)
    }

    /// Record every property of `instance` that differs from the default.
    ///
    /// String values are only kept with the `tools` feature.
    pub fn describe_type(
        registry: &TypeRegistry,
        instance: &dyn ReflectedType,
        set_string_values: bool,
    ) -> Self {
        let type_info = instance.reflect_type_info();
        let mut describer = Describer {
            registry,
            set_string_values,
            path: PropertyPath::default(),
            properties: Vec::new(),
        };
        describer.describe_structure(instance, type_info.default_instance());

        Self {
            type_id: type_info.id(),
            properties: describer.properties,
        }
    }

    /// Apply every property onto `instance`, then run its
    /// [`post_deserialize`](ReflectedType::post_deserialize) hook.
    pub fn restore_property_state(&self, registry: &TypeRegistry, instance: &mut dyn ReflectedType) {
        let instance_type = instance.reflect_type_info().id();
        if instance_type != self.type_id {
            error!(
                "descriptor of {} restored onto an instance of {instance_type}",
                self.type_id,
            );
            return;
        }

        for property in &self.properties {
            if let Err(message) = restore_property(registry, instance, property) {
                warn!("skipping `{}` of {}: {message}", property.path, self.type_id);
            }
        }
        instance.post_deserialize();
    }

    fn type_info(&self, registry: &TypeRegistry) -> Option<&'static TypeInfo> {
        let Some(type_info) = registry.get_type_info(self.type_id) else {
            error!("cannot create unregistered type {}", self.type_id);
            return None;
        };
        if type_info.is_abstract() {
            error!("cannot create abstract type {}", self.type_id);
            return None;
        }
        Some(type_info)
    }

    /// A new instance with this descriptor's properties applied.
    ///
    /// `None`, after logging, if the type is unregistered or abstract.
    pub fn create_type(&self, registry: &TypeRegistry) -> Option<Box<dyn ReflectedType>> {
        let type_info = self.type_info(registry)?;
        let mut instance = type_info.create_type();
        self.restore_property_state(registry, &mut *instance);
        Some(instance)
    }

    /// Like [`create_type`](Self::create_type), constructing the instance
    /// in the slot at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to writable memory sized and aligned for the
    /// descriptor's type.
    pub unsafe fn create_type_in_place<'a>(
        &self,
        registry: &TypeRegistry,
        ptr: PtrMut<'a>,
    ) -> Option<OwningPtr<'a>> {
        let type_info = self.type_info(registry)?;
        // SAFETY: Forwarded from the caller.
        Some(unsafe { self.restore_in_place(registry, type_info, ptr) })
    }

    /// # Safety
    ///
    /// `type_info` must be this descriptor's registered, concrete type and
    /// `ptr` must be valid for it.
    pub(crate) unsafe fn restore_in_place<'a>(
        &self,
        registry: &TypeRegistry,
        type_info: &'static TypeInfo,
        ptr: PtrMut<'a>,
    ) -> OwningPtr<'a> {
        // SAFETY: Forwarded from the caller.
        let mut owned = unsafe { type_info.create_type_in_place(ptr) };
        // SAFETY: `owned` holds the instance of `type_info` just constructed.
        let instance = unsafe { type_info.deref_instance_mut(owned.as_mut()) };
        self.restore_property_state(registry, instance);
        owned
    }
}

// -----------------------------------------------------------------------------
// Describe

struct Describer<'r> {
    registry: &'r TypeRegistry,
    #[cfg_attr(not(feature = "tools"), expect(dead_code))]
    set_string_values: bool,
    path: PropertyPath,
    properties: Vec<PropertyDescriptor>,
}

impl Describer<'_> {
    fn describe_structure(&mut self, instance: &dyn ReflectedType, default: &dyn ReflectedType) {
        let type_info = instance.reflect_type_info();
        for property in type_info.properties() {
            let (Some(value), Some(default_value)) = (property.get(instance), property.get(default)) else {
                continue;
            };

            if property.is_array() {
                self.describe_array(type_info, property, instance, default, value, default_value);
                continue;
            }

            self.path.append(property.id);
            if property.is_structure() {
                if let (Some(value), Some(default_value)) = (
                    value.reflect_ref().as_structure(),
                    default_value.reflect_ref().as_structure(),
                ) {
                    self.describe_structure(value, default_value);
                }
            } else if !type_info.is_property_value_equal(instance, default, property.id, None) {
                self.record_value(property, value);
            }
            self.path.remove_last_element();
        }
    }

    fn describe_array(
        &mut self,
        type_info: &TypeInfo,
        property: &PropertyInfo,
        instance: &dyn ReflectedType,
        default: &dyn ReflectedType,
        value: &dyn Reflect,
        default_value: &dyn Reflect,
    ) {
        let (Some(array), Some(default_array)) =
            (value.reflect_ref().as_array(), default_value.reflect_ref().as_array())
        else {
            return;
        };

        if array.is_dynamic() && array.len() != default_array.len() {
            self.path.append(property.id);
            self.record_array_size(array.len());
            self.path.remove_last_element();
        }

        for index in 0..array.len() {
            let Some(element) = array.element(index) else {
                continue;
            };
            let fresh_default;
            let default_element = match default_array.element(index) {
                Some(default_element) => default_element,
                None => {
                    fresh_default = array.new_default_element();
                    &*fresh_default
                }
            };

            self.path.append_with_index(property.id, index);
            if property.is_structure() {
                if let (Some(element), Some(default_element)) = (
                    element.reflect_ref().as_structure(),
                    default_element.reflect_ref().as_structure(),
                ) {
                    self.describe_structure(element, default_element);
                }
            } else if index < default_array.len() {
                if !type_info.is_property_value_equal(instance, default, property.id, Some(index)) {
                    self.record_value(property, element);
                }
            } else if !element.reflect_eq(default_element) {
                self.record_value(property, element);
            }
            self.path.remove_last_element();
        }
    }

    fn record_array_size(&mut self, len: usize) {
        match postcard::to_allocvec(&len) {
            Ok(bytes) => {
                #[cfg_attr(not(feature = "tools"), expect(unused_mut))]
                let mut descriptor = PropertyDescriptor::new(self.path.clone(), bytes);
                #[cfg(feature = "tools")]
                if self.set_string_values {
                    descriptor.string_value = len.to_string();
                }
                self.properties.push(descriptor);
            }
            Err(err) => warn!("cannot describe the length of `{}`: {err}", self.path),
        }
    }

    fn record_value(&mut self, property: &PropertyInfo, value: &dyn Reflect) {
        let bytes = match convert_native_to_binary(
            self.registry,
            property.type_id,
            property.template_argument_type_id,
            value,
        ) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("cannot describe `{}`: {err}", self.path);
                return;
            }
        };

        #[cfg_attr(not(feature = "tools"), expect(unused_mut))]
        let mut descriptor = PropertyDescriptor::new(self.path.clone(), bytes);
        #[cfg(feature = "tools")]
        if self.set_string_values {
            match crate::conversion::convert_native_to_string(
                self.registry,
                property.type_id,
                property.template_argument_type_id,
                value,
            ) {
                Ok(text) => descriptor.string_value = text,
                Err(err) => warn!("cannot write `{}` as a string: {err}", self.path),
            }
        }
        self.properties.push(descriptor);
    }
}

// -----------------------------------------------------------------------------
// Restore

#[derive(Debug, thiserror::Error)]
enum RestoreError {
    #[error("the path does not resolve against {0}")]
    Unresolved(TypeID),
    #[error("the array cannot be resized to {0}")]
    Resize(usize),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Find the value `elements` names below `instance`.
///
/// A dynamic array grows by one element when the index is its current
/// length; any other index past the end does not resolve.
fn resolve_mut<'a>(
    instance: &'a mut dyn ReflectedType,
    elements: &[PathElement],
) -> Option<(&'static PropertyInfo, &'a mut dyn Reflect)> {
    let (element, rest) = elements.split_first()?;
    let property = instance.reflect_type_info().get_property_info(element.id)?;
    let value = property.get_mut(instance)?;

    let value = match element.array_index {
        None => value,
        Some(index) => {
            let array = value.reflect_mut().as_array()?;
            if array.is_dynamic() && index == array.len() {
                let len = index.checked_add(1)?;
                if !array.set_len(len) {
                    return None;
                }
            }
            array.element_mut(index)?
        }
    };

    if rest.is_empty() {
        return Some((property, value));
    }
    resolve_mut(value.reflect_mut().as_structure()?, rest)
}

fn restore_property(
    registry: &TypeRegistry,
    instance: &mut dyn ReflectedType,
    descriptor: &PropertyDescriptor,
) -> Result<(), RestoreError> {
    let type_id = instance.reflect_type_info().id();
    let (property, value) =
        resolve_mut(instance, descriptor.path.elements()).ok_or(RestoreError::Unresolved(type_id))?;

    if property.is_array() && !descriptor.path.is_array_element_path() {
        let len: usize = postcard::from_bytes(&descriptor.byte_value).map_err(ConversionError::from)?;
        let array = value.reflect_mut().as_array().ok_or(RestoreError::Unresolved(type_id))?;
        return if array.set_len(len) { Ok(()) } else { Err(RestoreError::Resize(len)) };
    }

    convert_binary_to_native(
        registry,
        property.type_id,
        property.template_argument_type_id,
        &descriptor.byte_value,
        value,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Reflect;
    use crate::info::Typed;
    use crate::resource::ResourcePtr;
    use ee_utils::StringID;
    use glam::Vec3;

    #[derive(Reflect, Debug, PartialEq)]
    struct Widget {
        m_opacity: f32,
        m_flags: u32,
        m_pos: Vec3,
    }

    impl Default for Widget {
        fn default() -> Self {
            Self {
                m_opacity: 1.0,
                m_flags: 0,
                m_pos: Vec3::ZERO,
            }
        }
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq)]
    struct Socket {
        name: String,
        offset: Vec3,
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Rig {
        root: Socket,
        sockets: Vec<Socket>,
        weights: [f32; 3],
        texture: ResourcePtr,
    }

    impl Default for Rig {
        fn default() -> Self {
            Self {
                root: Socket::default(),
                sockets: vec![Socket { name: "hand".into(), offset: Vec3::X }],
                weights: [1.0; 3],
                texture: ResourcePtr::default(),
            }
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(post_deserialize = Counter::recount)]
    struct Counter {
        values: Vec<u8>,
        #[reflect(skip)]
        total: u32,
    }

    impl Counter {
        fn recount(&mut self) {
            self.total = self.values.iter().map(|&v| u32::from(v)).sum();
        }
    }

    #[derive(Reflect, Default)]
    struct Bag {
        keys: Vec<u32>,
        count: u32,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Bag>();
        registry.register_type::<Widget>();
        registry.register_type::<Socket>();
        registry.register_type::<Rig>();
        registry.register_type::<Counter>();
        registry
    }

    fn teardown(mut registry: TypeRegistry) {
        for name in [Counter::TYPE_NAME, Rig::TYPE_NAME, Socket::TYPE_NAME, Widget::TYPE_NAME, Bag::TYPE_NAME] {
            registry.unregister_type(TypeID::new(name));
        }
    }

    fn paths(descriptor: &TypeDescriptor) -> Vec<String> {
        descriptor.properties.iter().map(|p| p.path.to_string()).collect()
    }

    #[test]
    fn widget_opacity_round_trip() {
        let registry = registry();

        let widget = Widget { m_opacity: 0.5, ..Default::default() };
        let descriptor = TypeDescriptor::describe_type(&registry, &widget, true);
        assert_eq!(paths(&descriptor), ["m_opacity"]);

        let property = &descriptor.properties[0];
        assert_eq!(postcard::from_bytes::<f32>(&property.byte_value).unwrap(), 0.5);
        #[cfg(feature = "tools")]
        assert_eq!(property.string_value, "0.5");

        let restored = descriptor.create_type(&registry).unwrap();
        let restored = restored.downcast_ref::<Widget>().unwrap();
        assert_eq!(restored, &widget);
        assert_eq!(restored.m_flags, 0);
        assert_eq!(restored.m_pos, Vec3::ZERO);

        teardown(registry);
    }

    #[test]
    fn default_instances_are_empty() {
        let registry = registry();

        let mut widget = Widget::default();
        assert!(TypeDescriptor::describe_type(&registry, &widget, false).properties.is_empty());

        widget.m_flags = 3;
        assert_eq!(paths(&TypeDescriptor::describe_type(&registry, &widget, false)), ["m_flags"]);

        widget.m_flags = 0;
        assert!(TypeDescriptor::describe_type(&registry, &widget, false).properties.is_empty());
        assert!(TypeDescriptor::describe_type(&registry, &Rig::default(), false).properties.is_empty());

        teardown(registry);
    }

    #[test]
    fn nested_values_use_nested_paths() {
        let registry = registry();

        let mut rig = Rig::default();
        rig.root.name = "pelvis".into();
        rig.sockets[0].offset = Vec3::Y;
        rig.sockets.push(Socket { name: "head".into(), offset: Vec3::ZERO });
        rig.weights[2] = 0.25;
        rig.texture = ResourcePtr::new("data://rig/skin.tex");

        let descriptor = TypeDescriptor::describe_type(&registry, &rig, false);
        assert_eq!(
            paths(&descriptor),
            [
                "root/name",
                "sockets",
                "sockets/0/offset",
                "sockets/1/name",
                "weights/2",
                "texture",
            ]
        );

        let restored = descriptor.create_type(&registry).unwrap();
        assert!(Rig::type_info().are_all_property_values_equal(&rig, &*restored));

        teardown(registry);
    }

    #[test]
    fn shrunk_arrays_record_their_length() {
        let registry = registry();

        let rig = Rig { sockets: Vec::new(), ..Default::default() };
        let descriptor = TypeDescriptor::describe_type(&registry, &rig, false);
        assert_eq!(paths(&descriptor), ["sockets"]);

        let restored = descriptor.create_type(&registry).unwrap();
        assert!(restored.downcast_ref::<Rig>().unwrap().sockets.is_empty());

        teardown(registry);
    }

    #[test]
    fn stale_paths_are_skipped() {
        let registry = registry();

        let mut descriptor = TypeDescriptor::describe_type(
            &registry,
            &Widget { m_flags: 9, ..Default::default() },
            false,
        );
        descriptor.properties.insert(
            0,
            PropertyDescriptor::new(PropertyPath::parse("m_removed").unwrap(), vec![1]),
        );
        descriptor.properties.push(PropertyDescriptor::new(
            PropertyPath::parse("m_pos").unwrap(),
            vec![0xFF],
        ));

        let restored = descriptor.create_type(&registry).unwrap();
        let restored = restored.downcast_ref::<Widget>().unwrap();
        assert_eq!(restored.m_flags, 9);
        assert_eq!(restored.m_pos, Vec3::ZERO);

        teardown(registry);
    }

    fn entry<T: serde::Serialize>(path: &str, value: &T) -> PropertyDescriptor {
        PropertyDescriptor::new(PropertyPath::parse(path).unwrap(), postcard::to_allocvec(value).unwrap())
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let registry = registry();

        let mut descriptor = TypeDescriptor::new(TypeID::new(Bag::TYPE_NAME));
        descriptor.properties.push(entry(&format!("keys/{}", usize::MAX), &5u32));
        descriptor.properties.push(entry("keys/3", &6u32));
        descriptor.properties.push(entry("keys/0", &8u32));
        descriptor.properties.push(entry("count", &7u32));

        let restored = descriptor.create_type(&registry).unwrap();
        let restored = restored.downcast_ref::<Bag>().unwrap();
        assert_eq!(restored.keys, [8]);
        assert_eq!(restored.count, 7);

        teardown(registry);
    }

    #[test]
    fn unallocatable_lengths_are_skipped() {
        let registry = registry();

        let mut descriptor = TypeDescriptor::new(TypeID::new(Bag::TYPE_NAME));
        descriptor.properties.push(entry("keys", &(usize::MAX / 2)));
        descriptor.properties.push(entry("count", &7u32));

        let restored = descriptor.create_type(&registry).unwrap();
        let restored = restored.downcast_ref::<Bag>().unwrap();
        assert!(restored.keys.is_empty());
        assert_eq!(restored.count, 7);

        teardown(registry);
    }

    #[test]
    fn empty_paths_do_not_poison_a_descriptor() {
        let registry = registry();

        let mut descriptor = TypeDescriptor::new(TypeID::new(Bag::TYPE_NAME));
        descriptor.properties.push(PropertyDescriptor::new(PropertyPath::default(), vec![1]));
        descriptor.properties.push(entry("count", &2u32));

        let json = serde_json::to_string(&descriptor).unwrap();
        let loaded: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, descriptor);
        assert!(!loaded.properties[0].is_valid());

        let restored = loaded.create_type(&registry).unwrap();
        assert_eq!(restored.downcast_ref::<Bag>().unwrap().count, 2);

        teardown(registry);
    }

    #[test]
    fn restore_runs_post_deserialize() {
        let registry = registry();

        let counter = Counter { values: vec![1, 2, 3], total: 0 };
        let descriptor = TypeDescriptor::describe_type(&registry, &counter, false);

        let restored = descriptor.create_type(&registry).unwrap();
        assert_eq!(restored.downcast_ref::<Counter>().unwrap().total, 6);

        teardown(registry);
    }

    #[test]
    fn restoring_onto_another_type_is_ignored() {
        let registry = registry();

        let descriptor = TypeDescriptor::describe_type(&registry, &Widget { m_flags: 1, ..Default::default() }, false);
        let mut socket = Socket::default();
        descriptor.restore_property_state(&registry, &mut socket);
        assert_eq!(socket, Socket::default());

        assert!(TypeDescriptor::new(TypeID::new("Unregistered")).create_type(&registry).is_none());
        teardown(registry);
    }

    #[test]
    fn descriptors_persist_with_serde() {
        let registry = registry();

        let widget = Widget { m_pos: Vec3::new(1.0, 2.0, 3.0), ..Default::default() };
        let descriptor = TypeDescriptor::describe_type(&registry, &widget, true);

        let json = serde_json::to_string(&descriptor).unwrap();
        let from_json: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json, descriptor);

        let text = ron::to_string(&descriptor).unwrap();
        let from_ron: TypeDescriptor = ron::from_str(&text).unwrap();
        assert_eq!(from_ron, descriptor);

        let path = PropertyPath::parse("m_pos").unwrap();
        assert!(from_ron.get_property(&path).is_some());
        assert_eq!(from_ron.get_property(&path).unwrap().path.first().unwrap().id, StringID::new("m_pos"));

        teardown(registry);
    }
}
