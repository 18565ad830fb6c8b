use crate::TypeID;
use crate::resource::{Resource, ResourceTypeID};

/// Registration record linking a resource type to its reflected type.
///
/// Parent resource types are declared explicitly and are unrelated to the
/// parent chain of the reflected type.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceInfo {
    pub resource_type_id: ResourceTypeID,
    pub type_id: TypeID,
    pub parent_types: Vec<ResourceTypeID>,
    #[cfg(feature = "tools")]
    pub friendly_name: String,
}

impl ResourceInfo {
    pub fn new(resource_type_id: ResourceTypeID, type_id: TypeID) -> Self {
        Self {
            resource_type_id,
            type_id,
            parent_types: Vec::new(),
            #[cfg(feature = "tools")]
            friendly_name: String::new(),
        }
    }

    #[inline]
    pub fn of<R: Resource>() -> Self {
        Self::new(R::RESOURCE_TYPE, TypeID::new(R::TYPE_NAME))
    }

    pub fn with_parent_type(mut self, parent: ResourceTypeID) -> Self {
        if !self.parent_types.contains(&parent) {
            self.parent_types.push(parent);
        }
        self
    }

    #[cfg_attr(not(feature = "tools"), expect(unused_mut, unused_variables))]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        #[cfg(feature = "tools")]
        {
            self.friendly_name = name.into();
        }
        self
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.resource_type_id.is_valid() && self.type_id.is_valid()
    }

    /// `true` if this is `parent` or declares it as a parent type.
    #[inline]
    pub fn is_derived_from(&self, parent: ResourceTypeID) -> bool {
        self.resource_type_id == parent || self.parent_types.contains(&parent)
    }
}

/// Registration record of an editable data file type.
#[cfg(feature = "tools")]
#[derive(Clone, Debug, PartialEq)]
pub struct DataFileInfo {
    pub type_id: TypeID,
    pub extension: ResourceTypeID,
    pub friendly_name: String,
}

#[cfg(feature = "tools")]
impl DataFileInfo {
    pub fn new(type_id: TypeID, extension: ResourceTypeID, friendly_name: impl Into<String>) -> Self {
        Self { type_id, extension, friendly_name: friendly_name.into() }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.type_id.is_valid() && self.extension.is_valid()
    }
}
