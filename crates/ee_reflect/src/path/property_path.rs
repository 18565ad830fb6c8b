use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use ee_utils::StringID;
use ee_utils::hash::hash_one;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One step of a [`PropertyPath`]: a property, optionally indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathElement {
    pub id: StringID,
    pub array_index: Option<usize>,
}

impl PathElement {
    #[inline]
    pub fn new(id: StringID, array_index: Option<usize>) -> Self {
        Self { id, array_index }
    }

    #[inline]
    pub fn is_array_element(&self) -> bool {
        self.array_index.is_some()
    }
}

/// Why a string is not a valid [`PropertyPath`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("property path is empty")]
    Empty,
    #[error("property path `{0}` starts with an array index")]
    LeadingIndex(String),
    #[error("property path `{0}` indexes the same property twice")]
    DoubleIndex(String),
    #[error("property path `{0}` has an out of range array index")]
    InvalidIndex(String),
}

/// A `/`-separated address of a nested property, like `items/2/name`.
///
/// Numeric segments are the array index of the preceding property, so
/// `items/2/name` has two elements: `items[2]` and `name`.
///
/// Equality compares the element sequences; the cached hash only speeds up
/// hashing.
///
/// # Examples
///
/// ```
/// use ee_reflect::path::PropertyPath;
/// use ee_utils::StringID;
///
/// let path: PropertyPath = "Foo/Bar/2/Baz".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[1].array_index, Some(2));
/// assert_eq!(path.to_string(), "Foo/Bar/2/Baz");
///
/// let mut built = PropertyPath::default();
/// built.append(StringID::new("Foo"));
/// built.append_with_index(StringID::new("Bar"), 2);
/// built.append(StringID::new("Qux"));
/// built.replace_last_element(StringID::new("Baz"), None);
/// assert_eq!(built, path);
/// ```
#[derive(Clone, Default)]
pub struct PropertyPath {
    elements: Vec<PathElement>,
    hash: u64,
}

impl PropertyPath {
    /// Parse a path, skipping empty segments.
    pub fn parse(text: &str) -> Result<Self, PathParseError> {
        let mut path = Self::default();

        for segment in text.split('/').filter(|s| !s.is_empty()) {
            if segment.bytes().all(|b| b.is_ascii_digit()) {
                let Some(last) = path.elements.last_mut() else {
                    return Err(PathParseError::LeadingIndex(text.to_owned()));
                };
                if last.array_index.is_some() {
                    return Err(PathParseError::DoubleIndex(text.to_owned()));
                }
                let index = segment
                    .parse()
                    .map_err(|_| PathParseError::InvalidIndex(text.to_owned()))?;
                last.array_index = Some(index);
            } else {
                path.elements.push(PathElement::new(StringID::new(segment), None));
            }
        }

        if path.elements.is_empty() {
            return Err(PathParseError::Empty);
        }
        path.regenerate_hash();
        Ok(path)
    }

    /// The empty path hashes to `0`, like [`PropertyPath::default`].
    fn regenerate_hash(&mut self) {
        self.hash = if self.elements.is_empty() {
            0
        } else {
            hash_one(&self.elements[..])
        };
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.elements.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    #[inline]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// `true` if the last element addresses an array element.
    #[inline]
    pub fn is_array_element_path(&self) -> bool {
        self.last().is_some_and(PathElement::is_array_element)
    }

    pub fn append(&mut self, id: StringID) {
        debug_assert!(id.is_valid());
        self.elements.push(PathElement::new(id, None));
        self.regenerate_hash();
    }

    pub fn append_with_index(&mut self, id: StringID, array_index: usize) {
        debug_assert!(id.is_valid());
        self.elements.push(PathElement::new(id, Some(array_index)));
        self.regenerate_hash();
    }

    /// # Panics
    ///
    /// Panics if the path is empty.
    pub fn remove_last_element(&mut self) {
        assert!(self.elements.pop().is_some(), "removing from an empty property path");
        self.regenerate_hash();
    }

    /// # Panics
    ///
    /// Panics if the path is empty.
    pub fn replace_last_element(&mut self, id: StringID, array_index: Option<usize>) {
        let Some(last) = self.elements.last_mut() else {
            panic!("replacing the last element of an empty property path");
        };
        *last = PathElement::new(id, array_index);
        self.regenerate_hash();
    }

    /// A copy with `id` appended.
    pub fn with_appended(&self, id: StringID, array_index: Option<usize>) -> Self {
        let mut path = self.clone();
        path.elements.push(PathElement::new(id, array_index));
        path.regenerate_hash();
        path
    }
}

impl PartialEq for PropertyPath {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.elements == other.elements
    }
}

impl Eq for PropertyPath {}

impl Hash for PropertyPath {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl core::ops::Index<usize> for PropertyPath {
    type Output = PathElement;

    #[inline]
    fn index(&self, index: usize) -> &PathElement {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a PropertyPath {
    type Item = &'a PathElement;
    type IntoIter = core::slice::Iter<'a, PathElement>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromStr for PropertyPath {
    type Err = PathParseError;

    #[inline]
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(element.id.as_str())?;
            if let Some(index) = element.array_index {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyPath({self})")
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The empty string reads back as the empty path it was written from.
impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(Self::default());
        }
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_well_formed_paths() {
        for text in ["Foo", "Foo/Bar/2/Baz", "a/0", "list/10/inner/3"] {
            assert_eq!(PropertyPath::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn skips_empty_segments() {
        let path = PropertyPath::parse("/Foo//Bar/").unwrap();
        assert_eq!(path.to_string(), "Foo/Bar");
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(PropertyPath::parse(""), Err(PathParseError::Empty));
        assert_eq!(PropertyPath::parse("//"), Err(PathParseError::Empty));
        assert!(matches!(PropertyPath::parse("3/Foo"), Err(PathParseError::LeadingIndex(_))));
        assert!(matches!(PropertyPath::parse("Foo/1/2"), Err(PathParseError::DoubleIndex(_))));
    }

    #[test]
    fn equality_ignores_history() {
        let mut a = PropertyPath::parse("x/y").unwrap();
        a.append(StringID::new("z"));
        a.remove_last_element();

        let b = PropertyPath::parse("x/y").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(hash_one(&a), hash_one(&b));
        assert_ne!(a, PropertyPath::parse("x/y/0").unwrap());
    }

    #[test]
    fn serializes_as_string() {
        let path = PropertyPath::parse("items/4/name").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"items/4/name\"");
        assert_eq!(serde_json::from_str::<PropertyPath>(&json).unwrap(), path);
        assert!(serde_json::from_str::<PropertyPath>("\"3/x\"").is_err());

        let empty = serde_json::to_string(&PropertyPath::default()).unwrap();
        assert_eq!(empty, "\"\"");
        assert!(!serde_json::from_str::<PropertyPath>(&empty).unwrap().is_valid());
    }
}
