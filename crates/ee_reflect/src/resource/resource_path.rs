use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::resource::ResourceTypeID;

/// A path into the data directory, always written with the `data://` scheme.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePath(String);

impl ResourcePath {
    pub const PREFIX: &'static str = "data://";

    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// `true` if the path has the `data://` prefix and something after it.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.len() > Self::PREFIX.len() && self.0.starts_with(Self::PREFIX)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The last path segment.
    pub fn file_name(&self) -> &str {
        let path = self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0);
        path.rsplit('/').next().unwrap_or(path)
    }

    /// The text after the last `.` of the file name, lowercased.
    pub fn extension(&self) -> Option<String> {
        let (_, extension) = self.file_name().rsplit_once('.')?;
        (!extension.is_empty()).then(|| extension.to_ascii_lowercase())
    }
}

impl fmt::Display for ResourcePath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourcePath({:?})", self.0)
    }
}

impl From<&str> for ResourcePath {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// -----------------------------------------------------------------------------
// ResourceID

/// A resource path together with the resource type named by its extension.
///
/// # Examples
///
/// ```
/// use ee_reflect::resource::{ResourceID, ResourceTypeID};
///
/// let id = ResourceID::new("data://meshes/crate.msh");
/// assert!(id.is_valid());
/// assert_eq!(id.resource_type_id(), ResourceTypeID::new("msh"));
///
/// assert!(!ResourceID::new("meshes/crate.msh").is_valid());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceID {
    path: ResourcePath,
    resource_type: ResourceTypeID,
}

impl ResourceID {
    pub fn new(path: impl Into<ResourcePath>) -> Self {
        let path = path.into();
        let resource_type = path
            .extension()
            .and_then(|extension| ResourceTypeID::try_new(&extension))
            .unwrap_or_default();
        Self { path, resource_type }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.path.is_valid() && self.resource_type.is_valid()
    }

    #[inline]
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    #[inline]
    pub fn resource_type_id(&self) -> ResourceTypeID {
        self.resource_type
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl From<&str> for ResourceID {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ResourcePath> for ResourceID {
    #[inline]
    fn from(value: ResourcePath) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ResourceID {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl fmt::Debug for ResourceID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceID({:?}, {})", self.path.as_str(), self.resource_type)
    }
}

impl Serialize for ResourceID {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.path.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ResourcePath::deserialize(deserializer).map(Self::new)
    }
}
