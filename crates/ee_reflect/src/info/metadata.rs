use core::fmt;
use core::str::FromStr;

/// A key of the editor metadata table.
///
/// Keys the editor does not know are kept as [`Unknown`](MetadataKey::Unknown)
/// with their original text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    FriendlyName,
    Description,
    Category,
    Hidden,
    ReadOnly,
    ShowAsStaticArray,
    Min,
    Max,
    DisableTypePicker,
    CustomEditor,
    Unknown(String),
}

impl MetadataKey {
    const KNOWN: [(&'static str, MetadataKey); 10] = [
        ("FriendlyName", MetadataKey::FriendlyName),
        ("Description", MetadataKey::Description),
        ("Category", MetadataKey::Category),
        ("Hidden", MetadataKey::Hidden),
        ("ReadOnly", MetadataKey::ReadOnly),
        ("ShowAsStaticArray", MetadataKey::ShowAsStaticArray),
        ("Min", MetadataKey::Min),
        ("Max", MetadataKey::Max),
        ("DisableTypePicker", MetadataKey::DisableTypePicker),
        ("CustomEditor", MetadataKey::CustomEditor),
    ];

    /// Parse a key; matching is case-insensitive.
    pub fn parse(key: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, known)| known.clone())
            .unwrap_or_else(|| MetadataKey::Unknown(key.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            MetadataKey::Unknown(key) => key,
            known => Self::KNOWN
                .iter()
                .find(|(_, k)| k == known)
                .map_or("", |(name, _)| *name),
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor-facing key/value table attached to a property.
///
/// # Examples
///
/// ```
/// use ee_reflect::info::{MetadataKey, PropertyMetadata};
///
/// let mut metadata = PropertyMetadata::default();
/// metadata.add("Min", "0.5");
/// metadata.add("ReadOnly", "");
/// metadata.add("Tooltip", "Hover text");
///
/// assert!(metadata.has_flag(&MetadataKey::ReadOnly));
/// assert_eq!(metadata.get_value_as::<f32>(&MetadataKey::Min), Some(0.5));
/// assert_eq!(
///     metadata.get_value(&MetadataKey::Unknown("Tooltip".into())),
///     Some("Hover text"),
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyMetadata {
    entries: Vec<(MetadataKey, String)>,
}

impl PropertyMetadata {
    /// Add or replace the entry for `key`.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        let key = MetadataKey::parse(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// `true` if `key` is present, whatever its value.
    #[inline]
    pub fn has_flag(&self, key: &MetadataKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get_value(&self, key: &MetadataKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// The value of `key` parsed as `T`; `None` if absent or unparsable.
    pub fn get_value_as<T: FromStr>(&self, key: &MetadataKey) -> Option<T> {
        self.get_value(key)?.trim().parse().ok()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&MetadataKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_case_insensitively() {
        assert_eq!(MetadataKey::parse("friendlyname"), MetadataKey::FriendlyName);
        assert_eq!(MetadataKey::parse("CustomEditor").as_str(), "CustomEditor");
        assert_eq!(
            MetadataKey::parse("Units"),
            MetadataKey::Unknown("Units".to_owned())
        );
    }

    #[test]
    fn later_value_replaces_earlier() {
        let mut metadata = PropertyMetadata::default();
        metadata.add("Max", "10");
        metadata.add("max", "20");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get_value_as::<i32>(&MetadataKey::Max), Some(20));
    }

    #[test]
    fn unparsable_values_are_none() {
        let mut metadata = PropertyMetadata::default();
        metadata.add("Min", "low");
        assert_eq!(metadata.get_value_as::<f32>(&MetadataKey::Min), None);
        assert_eq!(metadata.get_value_as::<f32>(&MetadataKey::Max), None);
    }
}
