use crate::TypeID;
use crate::core_types::CoreTypeID;
use crate::info::PropertyFlags;
use crate::reflection::Reflect;

/// How a Rust type appears when used as the type of a property.
///
/// Arrays report their element's type id with the array flags added, so a
/// `Vec<u32>` property is a dynamic array of `uint32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyTypeDesc {
    pub type_id: TypeID,
    pub template_argument_type_id: TypeID,
    pub flags: PropertyFlags,
    /// Element count of a static array, `0` otherwise.
    pub array_size: usize,
    /// Byte size of one element, `0` for non-array properties.
    pub array_element_size: usize,
}

impl PropertyTypeDesc {
    /// A plain core value.
    pub fn core(core_type: CoreTypeID) -> Self {
        Self::new(core_type.type_id(), PropertyFlags::empty())
    }

    /// A templated core value such as `TBitFlags<E>` or `TResourcePtr<R>`.
    pub fn templated(core_type: CoreTypeID, template_argument: TypeID, flags: PropertyFlags) -> Self {
        Self {
            template_argument_type_id: template_argument,
            ..Self::new(core_type.type_id(), flags)
        }
    }

    pub fn enumeration(type_id: TypeID) -> Self {
        Self::new(type_id, PropertyFlags::IS_ENUM)
    }

    pub fn structure(type_id: TypeID) -> Self {
        Self::new(type_id, PropertyFlags::IS_STRUCTURE)
    }

    #[inline]
    pub const fn new(type_id: TypeID, flags: PropertyFlags) -> Self {
        Self {
            type_id,
            template_argument_type_id: TypeID::INVALID,
            flags,
            array_size: 0,
            array_element_size: 0,
        }
    }

    /// Turn an element description into an array of that element.
    ///
    /// # Panics
    ///
    /// Arrays of arrays are not representable.
    pub fn into_array(self, element_size: usize, static_size: Option<usize>) -> Self {
        assert!(
            !self.flags.contains(PropertyFlags::IS_ARRAY),
            "nested arrays are not supported as property types ({})",
            self.type_id,
        );

        let mut flags = self.flags | PropertyFlags::IS_ARRAY;
        if static_size.is_none() {
            flags |= PropertyFlags::IS_DYNAMIC_ARRAY;
        }

        Self {
            flags,
            array_size: static_size.unwrap_or(0),
            array_element_size: element_size,
            ..self
        }
    }
}

/// A type that can be the type of a reflected property.
///
/// Core value types, reflected enums and structures, and arrays of those.
pub trait PropertyType: Reflect + Default {
    fn property_type() -> PropertyTypeDesc;
}
