use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use serde_core::de::{self, Visitor};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::{FixedHashState, HashMap, hash_one};

// -----------------------------------------------------------------------------
// Interner

struct Interned {
    hash: u64,
    text: Box<str>,
}

static INTERNER: Mutex<HashMap<&'static str, &'static Interned>> =
    Mutex::new(HashMap::with_hasher(FixedHashState));

fn intern(text: &str) -> &'static Interned {
    let mut table = INTERNER.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(&entry) = table.get(text) {
        return entry;
    }

    let entry: &'static Interned = Box::leak(Box::new(Interned {
        hash: hash_one(text),
        text: text.into(),
    }));
    table.insert(&*entry.text, entry);
    entry
}

// -----------------------------------------------------------------------------
// StringID

/// An interned string identifier.
///
/// Two ids created from the same text share one interned entry, so equality
/// is a pointer comparison. The hash of the text is computed once, with the
/// fixed seed, when the text is first interned.
///
/// The empty string is the invalid id.
///
/// # Examples
///
/// ```
/// use ee_utils::StringID;
///
/// let a = StringID::new("Health");
/// let b = StringID::new("Health");
///
/// assert_eq!(a, b);
/// assert!(a.is_valid());
/// assert_eq!(a.as_str(), "Health");
///
/// assert!(!StringID::new("").is_valid());
/// assert_eq!(StringID::new(""), StringID::INVALID);
/// ```
#[derive(Copy, Clone, Default)]
pub struct StringID(Option<&'static Interned>);

impl StringID {
    /// The invalid (empty) id.
    pub const INVALID: StringID = StringID(None);

    /// Interns `text` and returns its id.
    pub fn new(text: &str) -> Self {
        if text.is_empty() {
            Self::INVALID
        } else {
            Self(Some(intern(text)))
        }
    }

    /// Returns `true` for any id created from a non-empty string.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The interned text, empty for the invalid id.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            Some(entry) => &entry.text,
            None => "",
        }
    }

    /// The stable 64-bit hash of the text, `0` for the invalid id.
    #[inline]
    pub fn hash_value(&self) -> u64 {
        match self.0 {
            Some(entry) => entry.hash,
            None => 0,
        }
    }
}

impl PartialEq for StringID {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => core::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for StringID {}

impl Hash for StringID {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl PartialOrd for StringID {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringID {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.as_str().cmp(other.as_str())
        }
    }
}

impl From<&str> for StringID {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for StringID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for StringID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringID({:?})", self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Serde

impl Serialize for StringID {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct StringIDVisitor;

impl Visitor<'_> for StringIDVisitor {
    type Value = StringID;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(StringID::new(v))
    }
}

impl<'de> Deserialize<'de> for StringID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(StringIDVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_shared() {
        let a = StringID::new("Position");
        let b = StringID::from("Position");
        let c = StringID::new("Rotation");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_eq!(a.hash_value(), hash_one("Position"));
    }

    #[test]
    fn invalid_id() {
        let id = StringID::default();
        assert!(!id.is_valid());
        assert_eq!(id.as_str(), "");
        assert_eq!(id.hash_value(), 0);
        assert_ne!(id, StringID::new("x"));
    }

    #[test]
    fn ordering_by_text() {
        let mut ids = [StringID::new("b"), StringID::new("c"), StringID::new("a")];
        ids.sort();
        assert_eq!(ids.map(|id| id.as_str()), ["a", "b", "c"]);
    }

    #[test]
    fn serde_as_string() {
        let id = StringID::new("Speed");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Speed\"");

        let back: StringID = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
