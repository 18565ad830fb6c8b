use core::fmt;

use serde::{Deserialize, Serialize};

/// A four-character code naming a kind of resource, e.g. `msh` or `tex`.
///
/// One to four lowercase ASCII letters or digits, packed big-endian into a
/// `u32` with unused trailing bytes left zero.
///
/// # Examples
///
/// ```
/// use ee_reflect::resource::ResourceTypeID;
///
/// let id = ResourceTypeID::new("msh");
/// assert_eq!(id.to_string(), "msh");
/// assert_eq!(id.value(), u32::from_be_bytes(*b"msh\0"));
///
/// assert!(ResourceTypeID::try_new("MESH").is_none());
/// assert!(ResourceTypeID::try_new("").is_none());
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTypeID(u32);

impl ResourceTypeID {
    pub const INVALID: ResourceTypeID = ResourceTypeID(0);

    const fn is_valid_char(c: u8) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit()
    }

    /// Pack `code`, or `None` if it is not a valid code.
    pub const fn try_new(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 {
            return None;
        }

        let mut packed = [0u8; 4];
        let mut i = 0;
        while i < bytes.len() {
            if !Self::is_valid_char(bytes[i]) {
                return None;
            }
            packed[i] = bytes[i];
            i += 1;
        }

        Some(Self(u32::from_be_bytes(packed)))
    }

    /// Pack `code`.
    ///
    /// # Panics
    ///
    /// Panics if `code` is not one to four lowercase letters or digits.
    pub const fn new(code: &str) -> Self {
        match Self::try_new(code) {
            Some(id) => id,
            None => panic!("invalid resource type code"),
        }
    }

    #[inline]
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    fn chars(&self) -> impl Iterator<Item = char> {
        self.0.to_be_bytes().into_iter().filter(|&b| b != 0).map(char::from)
    }
}

impl fmt::Display for ResourceTypeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|c| fmt::Write::write_char(f, c))
    }
}

impl fmt::Debug for ResourceTypeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceTypeID({self})")
    }
}
