#![expect(unsafe_code, reason = "static collections place instances in one shared allocation")]

use alloc::alloc as malloc;
use core::alloc::Layout;
use core::fmt;
use core::num::NonZeroUsize;
use core::ptr::NonNull;

use ee_ptr::{OwningPtr, Ptr, PtrMut};
use ee_utils::padding_for;
use serde::{Deserialize, Serialize};

use crate::descriptor::{DescriptorError, TypeDescriptor};
use crate::info::TypeInfo;
use crate::reflection::ReflectedType;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// TypeDescriptorCollection

/// An ordered list of descriptors, instantiated together.
///
/// A static instantiation packs every instance into one allocation. Its
/// layout comes from [`calculate_collection_requirements`], which must run
/// after the last change to the descriptor list.
///
/// [`calculate_collection_requirements`]: Self::calculate_collection_requirements
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::descriptor::{TypeDescriptor, TypeDescriptorCollection};
/// use ee_reflect::registry::TypeRegistry;
///
/// #[derive(Reflect, Default)]
/// struct Flag {
///     raised: bool,
/// }
///
/// #[derive(Reflect, Default)]
/// struct Pole {
///     height: f64,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type::<Flag>();
/// registry.register_type::<Pole>();
///
/// let mut collection = TypeDescriptorCollection::new();
/// collection.push(TypeDescriptor::describe_type(&registry, &Flag { raised: true }, false));
/// collection.push(TypeDescriptor::describe_type(&registry, &Pole { height: 4.0 }, false));
/// collection.calculate_collection_requirements(&registry).unwrap();
/// assert_eq!(collection.total_required_size(), 16);
/// assert_eq!(collection.required_alignment(), 8);
///
/// let instances = collection.instantiate_static_collection(&registry);
/// assert_eq!(instances.get(0).unwrap().downcast_ref::<Flag>().unwrap().raised, true);
/// assert_eq!(instances.get(1).unwrap().downcast_ref::<Pole>().unwrap().height, 4.0);
/// drop(instances);
///
/// for descriptor in collection.descriptors() {
///     registry.unregister_type(descriptor.type_id);
/// }
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDescriptor>", into = "Vec<TypeDescriptor>")]
pub struct TypeDescriptorCollection {
    descriptors: Vec<TypeDescriptor>,
    type_infos: Vec<&'static TypeInfo>,
    type_paddings: Vec<usize>,
    total_required_size: usize,
    required_alignment: usize,
}

impl TypeDescriptorCollection {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Append a descriptor, invalidating the calculated layout.
    pub fn push(&mut self, descriptor: TypeDescriptor) {
        self.descriptors.push(descriptor);
        self.invalidate_requirements();
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.invalidate_requirements();
    }

    fn invalidate_requirements(&mut self) {
        self.type_infos.clear();
        self.type_paddings.clear();
        self.total_required_size = 0;
        self.required_alignment = 0;
    }

    /// `true` once the layout matches the current descriptor list.
    #[inline]
    pub fn are_requirements_calculated(&self) -> bool {
        self.required_alignment != 0 && self.type_infos.len() == self.descriptors.len()
    }

    /// Bytes needed to pack every instance, including padding.
    #[inline]
    pub fn total_required_size(&self) -> usize {
        self.total_required_size
    }

    /// The largest alignment of the collected types.
    #[inline]
    pub fn required_alignment(&self) -> usize {
        self.required_alignment
    }

    /// Size of each collected type, in order.
    pub fn type_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.type_infos.iter().map(|info| info.size())
    }

    /// Padding inserted before each instance, in order.
    #[inline]
    pub fn type_paddings(&self) -> &[usize] {
        &self.type_paddings
    }

    /// Lay the instances out one after another, each aligned for its type.
    pub fn calculate_collection_requirements(&mut self, registry: &TypeRegistry) -> Result<(), DescriptorError> {
        self.invalidate_requirements();

        let mut type_infos = Vec::with_capacity(self.descriptors.len());
        let mut type_paddings = Vec::with_capacity(self.descriptors.len());
        let mut offset = 0;
        let mut alignment = 1;

        for (index, descriptor) in self.descriptors.iter().enumerate() {
            let type_id = descriptor.type_id;
            let type_info = registry
                .get_type_info(type_id)
                .ok_or(DescriptorError::UnknownType { index, type_id })?;
            if type_info.is_abstract() {
                return Err(DescriptorError::AbstractType { index, type_id });
            }

            let padding = padding_for(offset, type_info.alignment());
            offset += padding + type_info.size();
            alignment = alignment.max(type_info.alignment());

            type_infos.push(type_info);
            type_paddings.push(padding);
        }

        self.type_infos = type_infos;
        self.type_paddings = type_paddings;
        self.total_required_size = offset;
        self.required_alignment = alignment;
        Ok(())
    }

    /// Create every instance inside a single allocation.
    ///
    /// # Panics
    ///
    /// Panics if the requirements were not calculated for the current
    /// descriptor list.
    pub fn instantiate_static_collection(&self, registry: &TypeRegistry) -> StaticTypeCollection {
        assert!(
            self.are_requirements_calculated(),
            "collection requirements must be calculated before static instantiation",
        );

        let mut collection = StaticTypeCollection::allocate(self.total_required_size, self.required_alignment);
        let mut offset = 0;

        for ((descriptor, &type_info), &padding) in self
            .descriptors
            .iter()
            .zip(&self.type_infos)
            .zip(&self.type_paddings)
        {
            offset += padding;
            // SAFETY: The layout gives each type a slot of its size at an
            // offset aligned for it, inside the allocation.
            unsafe {
                let slot = PtrMut::new(collection.data).byte_add(offset);
                descriptor.restore_in_place(registry, type_info, slot);
            }
            collection.entries.push((type_info, offset));
            offset += type_info.size();
        }

        debug_assert_eq!(offset, self.total_required_size);
        collection
    }

    /// Create every instance in its own allocation.
    ///
    /// Descriptors of unregistered or abstract types are logged and skipped.
    pub fn instantiate_dynamic_collection(&self, registry: &TypeRegistry) -> Vec<Box<dyn ReflectedType>> {
        self.descriptors
            .iter()
            .filter_map(|descriptor| descriptor.create_type(registry))
            .collect()
    }
}

impl From<Vec<TypeDescriptor>> for TypeDescriptorCollection {
    fn from(descriptors: Vec<TypeDescriptor>) -> Self {
        Self {
            descriptors,
            ..Self::default()
        }
    }
}

impl From<TypeDescriptorCollection> for Vec<TypeDescriptor> {
    #[inline]
    fn from(collection: TypeDescriptorCollection) -> Self {
        collection.descriptors
    }
}

impl fmt::Debug for TypeDescriptorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptorCollection")
            .field("descriptors", &self.descriptors)
            .field("type_paddings", &self.type_paddings)
            .field("total_required_size", &self.total_required_size)
            .field("required_alignment", &self.required_alignment)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StaticTypeCollection

/// Instances packed into one allocation, dropped and freed together.
pub struct StaticTypeCollection {
    data: NonNull<u8>,
    layout: Layout,
    entries: Vec<(&'static TypeInfo, usize)>,
}

impl StaticTypeCollection {
    fn allocate(size: usize, alignment: usize) -> Self {
        let layout = match Layout::from_size_align(size, alignment) {
            Ok(layout) => layout,
            Err(err) => panic!("invalid collection layout ({size} bytes, align {alignment}): {err}"),
        };
        let data = if layout.size() == 0 {
            NonNull::without_provenance(NonZeroUsize::new(layout.align()).unwrap_or(NonZeroUsize::MIN))
        } else {
            // SAFETY: `layout` has a non-zero size.
            NonNull::new(unsafe { malloc::alloc(layout) }).unwrap_or_else(|| malloc::handle_alloc_error(layout))
        };

        Self {
            data,
            layout,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Byte offset of each instance from the start of the allocation.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|&(_, offset)| offset)
    }

    pub fn get(&self, index: usize) -> Option<&dyn ReflectedType> {
        let &(type_info, offset) = self.entries.get(index)?;
        // SAFETY: Entry `index` is a live instance of `type_info` at `offset`.
        Some(unsafe { type_info.deref_instance(Ptr::new(self.data).byte_add(offset)) })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn ReflectedType> {
        let &(type_info, offset) = self.entries.get(index)?;
        // SAFETY: Entry `index` is a live instance of `type_info` at `offset`,
        // borrowed uniquely through `self`.
        Some(unsafe { type_info.deref_instance_mut(PtrMut::new(self.data).byte_add(offset)) })
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ReflectedType> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

impl Drop for StaticTypeCollection {
    fn drop(&mut self) {
        for &(type_info, offset) in &self.entries {
            // SAFETY: Each entry owns a live instance of its type, dropped once.
            unsafe {
                type_info.drop_in_place(OwningPtr::new(self.data).byte_add(offset));
            }
        }
        if self.layout.size() != 0 {
            // SAFETY: `data` was allocated with `layout`.
            unsafe {
                malloc::dealloc(self.data.as_ptr(), self.layout);
            }
        }
    }
}

impl fmt::Debug for StaticTypeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(info, offset)| (info.id(), offset)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeID;
    use crate::derive::Reflect;
    use crate::info::Typed;
    use glam::{Mat4, Vec3};

    #[derive(Reflect, Default)]
    struct Tiny {
        value: u8,
    }

    #[derive(Reflect, Default)]
    struct Wide {
        transform: Mat4,
        names: Vec<String>,
    }

    #[derive(Reflect, Default)]
    struct Point {
        position: Vec3,
    }

    #[derive(Reflect, Default)]
    #[reflect(abstract)]
    struct Shape {
        sides: u32,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Tiny>();
        registry.register_type::<Wide>();
        registry.register_type::<Point>();
        registry.register_type::<Shape>();
        registry
    }

    fn teardown(mut registry: TypeRegistry) {
        for name in [Shape::TYPE_NAME, Point::TYPE_NAME, Wide::TYPE_NAME, Tiny::TYPE_NAME] {
            registry.unregister_type(TypeID::new(name));
        }
    }

    fn collection(registry: &TypeRegistry) -> TypeDescriptorCollection {
        let mut collection = TypeDescriptorCollection::new();
        collection.push(TypeDescriptor::describe_type(registry, &Tiny { value: 3 }, false));
        collection.push(TypeDescriptor::describe_type(
            registry,
            &Wide { transform: Mat4::IDENTITY, names: vec!["a".into(), "b".into()] },
            false,
        ));
        collection.push(TypeDescriptor::describe_type(registry, &Tiny { value: 4 }, false));
        collection.push(TypeDescriptor::describe_type(registry, &Point { position: Vec3::ONE }, false));
        collection
    }

    #[test]
    fn layout_packs_with_alignment_padding() {
        let registry = registry();
        let mut collection = collection(&registry);
        collection.calculate_collection_requirements(&registry).unwrap();

        let sizes: Vec<usize> = collection.type_sizes().collect();
        let paddings = collection.type_paddings().to_vec();
        let mut offset = 0;
        for (size, padding) in sizes.iter().zip(&paddings) {
            offset += padding;
            offset += size;
        }
        assert_eq!(offset, collection.total_required_size());
        assert_eq!(paddings[0], 0);
        assert_eq!(paddings[1], align_of::<Wide>() - 1);
        assert_eq!(collection.required_alignment(), align_of::<Wide>());

        let instances = collection.instantiate_static_collection(&registry);
        assert_eq!(instances.len(), 4);
        for ((offset, instance), descriptor) in instances.offsets().zip(instances.iter()).zip(collection.descriptors()) {
            let info = instance.reflect_type_info();
            assert_eq!(offset % info.alignment(), 0);
            assert_eq!(info.id(), descriptor.type_id);
        }

        teardown(registry);
    }

    #[test]
    fn static_and_dynamic_instances_match() {
        let registry = registry();
        let mut collection = collection(&registry);
        collection.calculate_collection_requirements(&registry).unwrap();

        let mut packed = collection.instantiate_static_collection(&registry);
        let boxed = collection.instantiate_dynamic_collection(&registry);
        assert_eq!(boxed.len(), packed.len());
        for (a, b) in packed.iter().zip(&boxed) {
            assert!(a.reflect_eq(&**b));
        }

        assert_eq!(packed.get(1).unwrap().downcast_ref::<Wide>().unwrap().names, ["a", "b"]);
        packed.get_mut(2).unwrap().downcast_mut::<Tiny>().unwrap().value = 9;
        assert_eq!(packed.get(2).unwrap().downcast_ref::<Tiny>().unwrap().value, 9);
        assert!(packed.get(4).is_none());

        teardown(registry);
    }

    #[test]
    fn requirements_report_bad_types() {
        let registry = registry();

        let mut collection = TypeDescriptorCollection::new();
        collection.push(TypeDescriptor::new(TypeID::new("Missing")));
        assert_eq!(
            collection.calculate_collection_requirements(&registry),
            Err(DescriptorError::UnknownType { index: 0, type_id: TypeID::new("Missing") })
        );

        collection.clear();
        collection.push(TypeDescriptor::new(TypeID::new(Shape::TYPE_NAME)));
        assert!(matches!(
            collection.calculate_collection_requirements(&registry),
            Err(DescriptorError::AbstractType { index: 0, .. })
        ));

        teardown(registry);
    }

    #[test]
    #[should_panic(expected = "must be calculated")]
    fn stale_requirements_panic() {
        let registry = registry();
        let mut collection = collection(&registry);
        collection.calculate_collection_requirements(&registry).unwrap();
        collection.push(TypeDescriptor::new(TypeID::new(Tiny::TYPE_NAME)));
        let _ = collection.instantiate_static_collection(&registry);
    }

    #[test]
    fn empty_collection_instantiates_nothing() {
        let registry = registry();
        let mut collection = TypeDescriptorCollection::new();
        collection.calculate_collection_requirements(&registry).unwrap();
        assert_eq!(collection.total_required_size(), 0);
        assert!(collection.instantiate_static_collection(&registry).is_empty());
        teardown(registry);
    }

    #[test]
    fn collections_persist_as_descriptor_lists() {
        let registry = registry();
        let collection = collection(&registry);

        let json = serde_json::to_string(&collection).unwrap();
        let restored: TypeDescriptorCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.descriptors(), collection.descriptors());
        assert!(!restored.are_requirements_calculated());

        teardown(registry);
    }
}
