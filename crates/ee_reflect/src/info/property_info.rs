use alloc::sync::Arc;
use core::fmt;

use bitflags::bitflags;
use ee_utils::StringID;

use crate::TypeID;
#[cfg(feature = "tools")]
use crate::info::PropertyMetadata;
use crate::info::Typed;
use crate::reflection::{PropertyType, Reflect};

bitflags! {
    /// Structural flags of a property.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        const IS_ARRAY = 1 << 0;
        const IS_DYNAMIC_ARRAY = 1 << 1;
        const IS_ENUM = 1 << 2;
        const IS_BIT_FLAGS = 1 << 3;
        const IS_STRUCTURE = 1 << 4;
    }
}

// -----------------------------------------------------------------------------
// PropertyAccessor

type GetFn = dyn for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync;
type GetMutFn = dyn for<'a> Fn(&'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> + Send + Sync;

/// Reaches a property's value inside an instance of its owning type.
///
/// Both closures return `None` when handed an instance of another type.
#[derive(Clone)]
pub struct PropertyAccessor {
    get: Arc<GetFn>,
    get_mut: Arc<GetMutFn>,
}

impl PropertyAccessor {
    pub fn new<G, M>(get: G, get_mut: M) -> Self
    where
        G: for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get),
            get_mut: Arc::new(get_mut),
        }
    }

    /// An accessor for a field of `T` of type `V`.
    pub fn field<T: Reflect, V: Reflect>(get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self::new(
            move |owner| owner.downcast_ref::<T>().map(|owner| get(owner) as &dyn Reflect),
            move |owner| {
                owner
                    .downcast_mut::<T>()
                    .map(|owner| get_mut(owner) as &mut dyn Reflect)
            },
        )
    }

    /// Reach this property through `outer` first.
    ///
    /// Used to expose the properties of a parent type, stored in a field of
    /// the child, on the child itself.
    pub fn nested_in(&self, outer: &PropertyAccessor) -> Self {
        let (outer_get, inner_get) = (outer.get.clone(), self.get.clone());
        let (outer_get_mut, inner_get_mut) = (outer.get_mut.clone(), self.get_mut.clone());
        Self::new(
            move |owner| outer_get(owner).and_then(|value| inner_get(value)),
            move |owner| outer_get_mut(owner).and_then(|value| inner_get_mut(value)),
        )
    }

    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.get)(owner)
    }

    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        (self.get_mut)(owner)
    }
}

impl fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropertyAccessor")
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// Static description of one property of a reflected type.
///
/// For arrays, [`type_id`](Self::type_id) is the element type and
/// [`array_size`](Self::array_size) is the static length, or the default
/// length for dynamic arrays.
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::info::Typed;
/// use ee_reflect::TypeID;
/// use ee_utils::StringID;
///
/// #[derive(Reflect, Default)]
/// struct Spawner {
///     counts: Vec<u16>,
/// }
///
/// let info = Spawner::type_info();
/// let counts = info.get_property_info(StringID::new("counts")).unwrap();
///
/// assert!(counts.is_dynamic_array());
/// assert_eq!(counts.type_id, TypeID::new("uint16"));
/// assert_eq!(counts.array_element_size, 2);
/// assert_eq!(counts.parent_type_id, Spawner::reflect_type_id());
/// ```
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    pub id: StringID,
    pub type_id: TypeID,
    /// The type that declares the property.
    pub parent_type_id: TypeID,
    pub template_argument_type_id: TypeID,
    pub size: usize,
    /// Byte offset within the declaring type.
    pub offset: usize,
    pub array_element_size: usize,
    pub array_size: usize,
    pub flags: PropertyFlags,
    accessor: PropertyAccessor,
    #[cfg(feature = "tools")]
    pub metadata: PropertyMetadata,
}

impl PropertyInfo {
    /// Describe field `name` of `T`, of type `V`, at byte `offset`.
    pub fn new<T: Typed, V: PropertyType>(
        name: &str,
        offset: usize,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        let desc = V::property_type();
        Self {
            id: StringID::new(name),
            type_id: desc.type_id,
            parent_type_id: T::reflect_type_id(),
            template_argument_type_id: desc.template_argument_type_id,
            size: size_of::<V>(),
            offset,
            array_element_size: desc.array_element_size,
            array_size: desc.array_size,
            flags: desc.flags,
            accessor: PropertyAccessor::field(get, get_mut),
            #[cfg(feature = "tools")]
            metadata: PropertyMetadata::default(),
        }
    }

    /// Attach an editor metadata entry. Ignored without the `tools` feature.
    #[cfg_attr(not(feature = "tools"), expect(unused_mut, unused_variables))]
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        #[cfg(feature = "tools")]
        self.metadata.add(key, value);
        self
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.id.is_valid() && self.type_id.is_valid()
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.flags.contains(PropertyFlags::IS_ARRAY)
    }

    #[inline]
    pub fn is_dynamic_array(&self) -> bool {
        self.flags.contains(PropertyFlags::IS_DYNAMIC_ARRAY)
    }

    #[inline]
    pub fn is_static_array(&self) -> bool {
        self.is_array() && !self.is_dynamic_array()
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.flags.contains(PropertyFlags::IS_ENUM)
    }

    #[inline]
    pub fn is_bit_flags(&self) -> bool {
        self.flags.contains(PropertyFlags::IS_BIT_FLAGS)
    }

    #[inline]
    pub fn is_structure(&self) -> bool {
        self.flags.contains(PropertyFlags::IS_STRUCTURE)
    }

    /// The property's value within `owner`.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        self.accessor.get(owner)
    }

    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        self.accessor.get_mut(owner)
    }

    #[inline]
    pub fn accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }

    /// The same property, reached through a parent field at `offset` in the child.
    pub(crate) fn nested_in(&self, offset: usize, outer: &PropertyAccessor) -> Self {
        Self {
            offset: offset + self.offset,
            accessor: self.accessor.nested_in(outer),
            ..self.clone()
        }
    }
}
