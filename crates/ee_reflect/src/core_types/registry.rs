use ee_utils::StringID;
use ee_utils::hash::HashMap;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::TypeID;
use crate::core_types::{
    BitFlags, Color, CoreTypeID, Degrees, EulerAngles, FloatCurve, FloatRange, IntRange,
    Microseconds, Milliseconds, Percentage, Radians, Seconds, Transform, TypeInstance,
};
use crate::resource::{ResourceID, ResourcePath, ResourcePtr, ResourceTypeID};

/// One row of the core type table.
#[derive(Copy, Clone, Debug)]
pub struct CoreTypeRecord {
    pub type_id: TypeID,
    pub core_type: CoreTypeID,
    pub size: usize,
    pub alignment: usize,
}

const fn layout_of<T>() -> (usize, usize) {
    (size_of::<T>(), align_of::<T>())
}

/// Size and alignment of the native representation of each core type.
///
/// Generic wrappers use a representative instantiation; their layout does
/// not depend on the template argument.
const fn native_layout(core_type: CoreTypeID) -> (usize, usize) {
    match core_type {
        CoreTypeID::Bool => layout_of::<bool>(),
        CoreTypeID::Uint8 => layout_of::<u8>(),
        CoreTypeID::Int8 => layout_of::<i8>(),
        CoreTypeID::Uint16 => layout_of::<u16>(),
        CoreTypeID::Int16 => layout_of::<i16>(),
        CoreTypeID::Uint32 => layout_of::<u32>(),
        CoreTypeID::Int32 => layout_of::<i32>(),
        CoreTypeID::Uint64 => layout_of::<u64>(),
        CoreTypeID::Int64 => layout_of::<i64>(),
        CoreTypeID::Float => layout_of::<f32>(),
        CoreTypeID::Double => layout_of::<f64>(),
        CoreTypeID::UUID => layout_of::<Uuid>(),
        CoreTypeID::StringID => layout_of::<StringID>(),
        CoreTypeID::TypeID => layout_of::<TypeID>(),
        CoreTypeID::String => layout_of::<String>(),
        CoreTypeID::Color => layout_of::<Color>(),
        CoreTypeID::Float2 => layout_of::<Vec2>(),
        CoreTypeID::Float3 => layout_of::<Vec3>(),
        CoreTypeID::Float4 => layout_of::<Vec4>(),
        CoreTypeID::Quaternion => layout_of::<Quat>(),
        CoreTypeID::Matrix => layout_of::<Mat4>(),
        CoreTypeID::Transform => layout_of::<Transform>(),
        CoreTypeID::Microseconds => layout_of::<Microseconds>(),
        CoreTypeID::Milliseconds => layout_of::<Milliseconds>(),
        CoreTypeID::Seconds => layout_of::<Seconds>(),
        CoreTypeID::Percentage => layout_of::<Percentage>(),
        CoreTypeID::Degrees => layout_of::<Degrees>(),
        CoreTypeID::Radians => layout_of::<Radians>(),
        CoreTypeID::EulerAngles => layout_of::<EulerAngles>(),
        CoreTypeID::IntRange => layout_of::<IntRange>(),
        CoreTypeID::FloatRange => layout_of::<FloatRange>(),
        CoreTypeID::FloatCurve => layout_of::<FloatCurve>(),
        CoreTypeID::BitFlags | CoreTypeID::TBitFlags => layout_of::<BitFlags>(),
        CoreTypeID::TVector => layout_of::<Vec<u8>>(),
        CoreTypeID::TInlineVector => layout_of::<SmallVec<[u8; 8]>>(),
        CoreTypeID::TypeInstance | CoreTypeID::TTypeInstance => layout_of::<TypeInstance>(),
        CoreTypeID::ResourcePath => layout_of::<ResourcePath>(),
        CoreTypeID::ResourceTypeID => layout_of::<ResourceTypeID>(),
        CoreTypeID::ResourceID => layout_of::<ResourceID>(),
        CoreTypeID::ResourcePtr | CoreTypeID::TResourcePtr => layout_of::<ResourcePtr>(),
        CoreTypeID::Invalid => (0, 1),
    }
}

/// Table of the built-in types: their ids, sizes and alignments.
///
/// The table has an explicit lifecycle: [`initialize`](Self::initialize)
/// fills it exactly once and [`shutdown`](Self::shutdown) clears it. It is
/// owned and driven by the [`TypeRegistry`](crate::registry::TypeRegistry).
///
/// # Examples
///
/// ```
/// use ee_reflect::TypeID;
/// use ee_reflect::core_types::{CoreTypeID, CoreTypeRegistry};
///
/// let mut core = CoreTypeRegistry::new();
/// core.initialize();
///
/// assert!(core.is_core_type(TypeID::new("Float3")));
/// assert_eq!(core.get_type(TypeID::new("uint16")), CoreTypeID::Uint16);
/// assert_eq!(core.get_type(TypeID::new("game::Widget")), CoreTypeID::Invalid);
/// assert_eq!(core.get_type_size(CoreTypeID::Uint16), 2);
///
/// core.shutdown();
/// ```
#[derive(Debug, Default)]
pub struct CoreTypeRegistry {
    records: Vec<CoreTypeRecord>,
    lookup: HashMap<TypeID, CoreTypeID>,
    initialized: bool,
}

impl CoreTypeRegistry {
    /// An empty, uninitialized table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the table.
    ///
    /// # Panics
    ///
    /// Panics if already initialized.
    pub fn initialize(&mut self) {
        assert!(!self.initialized, "core type registry initialized twice");

        self.records = CoreTypeID::ALL
            .iter()
            .map(|&core_type| {
                let (size, alignment) = native_layout(core_type);
                CoreTypeRecord {
                    type_id: core_type.type_id(),
                    core_type,
                    size,
                    alignment,
                }
            })
            .collect();

        self.lookup = self
            .records
            .iter()
            .map(|record| (record.type_id, record.core_type))
            .collect();

        self.initialized = true;
    }

    /// Clear the table.
    ///
    /// # Panics
    ///
    /// Panics if not initialized.
    pub fn shutdown(&mut self) {
        assert!(self.initialized, "core type registry shut down while not initialized");

        self.records.clear();
        self.lookup.clear();
        self.initialized = false;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn is_core_type(&self, type_id: TypeID) -> bool {
        self.lookup.contains_key(&type_id)
    }

    /// The core type with id `type_id`, or [`CoreTypeID::Invalid`].
    #[inline]
    pub fn get_type(&self, type_id: TypeID) -> CoreTypeID {
        self.lookup
            .get(&type_id)
            .copied()
            .unwrap_or(CoreTypeID::Invalid)
    }

    #[inline]
    fn record(&self, core_type: CoreTypeID) -> Option<&CoreTypeRecord> {
        self.records.get(core_type as usize)
    }

    /// The [`TypeID`] of `core_type`, invalid for [`CoreTypeID::Invalid`].
    #[inline]
    pub fn get_type_id(&self, core_type: CoreTypeID) -> TypeID {
        self.record(core_type)
            .map(|record| record.type_id)
            .unwrap_or(TypeID::INVALID)
    }

    #[inline]
    pub fn get_type_size(&self, core_type: CoreTypeID) -> usize {
        self.record(core_type).map_or(0, |record| record.size)
    }

    #[inline]
    pub fn get_type_alignment(&self, core_type: CoreTypeID) -> usize {
        self.record(core_type).map_or(1, |record| record.alignment)
    }

    #[cfg(feature = "tools")]
    #[inline]
    pub fn get_friendly_name(&self, core_type: CoreTypeID) -> &'static str {
        core_type.friendly_name()
    }

    /// All rows, in [`CoreTypeID`] order.
    #[inline]
    pub fn records(&self) -> &[CoreTypeRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> CoreTypeRegistry {
        let mut core = CoreTypeRegistry::new();
        core.initialize();
        core
    }

    #[test]
    fn ids_map_both_ways() {
        let core = initialized();
        assert_eq!(core.records().len(), CoreTypeID::COUNT);

        for &core_type in CoreTypeID::ALL {
            let type_id = core.get_type_id(core_type);
            assert!(type_id.is_valid());
            assert_eq!(core.get_type(type_id), core_type);
        }
    }

    #[test]
    fn layouts_match_native_types() {
        let core = initialized();
        assert_eq!(core.get_type_size(CoreTypeID::Bool), 1);
        assert_eq!(core.get_type_size(CoreTypeID::Double), 8);
        assert_eq!(core.get_type_size(CoreTypeID::Float3), 12);
        assert_eq!(core.get_type_alignment(CoreTypeID::Matrix), align_of::<Mat4>());
        assert_eq!(core.get_type_size(CoreTypeID::Invalid), 0);
    }

    #[test]
    fn shutdown_clears_table() {
        let mut core = initialized();
        core.shutdown();
        assert!(!core.is_initialized());
        assert!(!core.is_core_type(TypeID::new("bool")));

        core.initialize();
        assert!(core.is_core_type(TypeID::new("bool")));
    }

    #[test]
    #[should_panic(expected = "initialized twice")]
    fn double_initialize_panics() {
        let mut core = initialized();
        core.initialize();
    }

    #[test]
    #[should_panic(expected = "not initialized")]
    fn shutdown_without_initialize_panics() {
        CoreTypeRegistry::new().shutdown();
    }
}
