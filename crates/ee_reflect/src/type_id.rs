use core::fmt;

use ee_utils::StringID;
use serde::{Deserialize, Serialize};

/// Identifies a reflected type, core or user-defined.
///
/// A thin wrapper over an interned [`StringID`]: copying and comparing are
/// pointer-sized operations.
///
/// # Examples
///
/// ```
/// use ee_reflect::TypeID;
///
/// let id = TypeID::new("game::Widget");
/// assert!(id.is_valid());
/// assert_eq!(id, TypeID::new("game::Widget"));
/// assert_eq!(id.as_str(), "game::Widget");
///
/// assert!(!TypeID::default().is_valid());
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeID(StringID);

impl TypeID {
    /// The invalid type id.
    pub const INVALID: TypeID = TypeID(StringID::INVALID);

    /// Create a type id from its name.
    #[inline]
    pub fn new(name: &str) -> Self {
        Self(StringID::new(name))
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    #[inline]
    pub const fn string_id(&self) -> StringID {
        self.0
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }
}

impl From<StringID> for TypeID {
    #[inline]
    fn from(value: StringID) -> Self {
        Self(value)
    }
}

impl From<&str> for TypeID {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TypeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TypeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeID({:?})", self.as_str())
    }
}
