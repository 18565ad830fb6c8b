use ee_utils::StringID;
use ee_utils::hash::HashMap;

use crate::TypeID;
use crate::core_types::CoreTypeID;

/// One labelled constant of an enum.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumConstant {
    pub id: StringID,
    pub value: i64,
    #[cfg(feature = "tools")]
    pub description: String,
}

/// Label and value table of a reflected enum.
///
/// Labels are unique; values need not be. Value to label lookups return the
/// first constant declared with that value.
///
/// # Examples
///
/// ```
/// use ee_reflect::TypeID;
/// use ee_reflect::core_types::CoreTypeID;
/// use ee_reflect::info::EnumInfo;
/// use ee_utils::StringID;
///
/// let info = EnumInfo::new(TypeID::new("game::Team"), CoreTypeID::Uint8)
///     .with_constant("Red", 0)
///     .with_constant("Blue", 1);
///
/// assert_eq!(info.get_constant_value(StringID::new("Blue")), Some(1));
/// assert_eq!(info.get_constant_label(0), Some(StringID::new("Red")));
/// assert!(!info.is_valid_value(2));
/// ```
#[derive(Clone, Debug)]
pub struct EnumInfo {
    id: TypeID,
    underlying_type: CoreTypeID,
    constants: Vec<EnumConstant>,
    lookup: HashMap<StringID, usize>,
}

impl EnumInfo {
    /// # Panics
    ///
    /// Panics if `id` is invalid or `underlying_type` is not an 8, 16 or
    /// 32-bit integer type.
    pub fn new(id: TypeID, underlying_type: CoreTypeID) -> Self {
        assert!(id.is_valid(), "enum registered with an invalid type id");
        assert!(
            underlying_type.is_enum_storage(),
            "enum {id} uses unsupported storage type {underlying_type:?}",
        );

        Self {
            id,
            underlying_type,
            constants: Vec::new(),
            lookup: HashMap::default(),
        }
    }

    /// Add a constant.
    ///
    /// # Panics
    ///
    /// Panics if the label is already used or the value does not fit the
    /// storage type.
    pub fn with_constant(self, label: &str, value: i64) -> Self {
        self.with_described_constant(label, value, "")
    }

    /// Add a constant with an editor description, kept only with the `tools` feature.
    #[cfg_attr(not(feature = "tools"), expect(unused_variables))]
    pub fn with_described_constant(mut self, label: &str, value: i64, description: &str) -> Self {
        let id = StringID::new(label);
        assert!(id.is_valid(), "enum {} has an empty label", self.id);
        assert!(
            !self.lookup.contains_key(&id),
            "enum {} declares label {label} twice",
            self.id,
        );
        assert!(
            self.storage_range().contains(&value),
            "value {value} of {}::{label} does not fit {:?}",
            self.id,
            self.underlying_type,
        );

        self.lookup.insert(id, self.constants.len());
        self.constants.push(EnumConstant {
            id,
            value,
            #[cfg(feature = "tools")]
            description: description.to_owned(),
        });
        self
    }

    #[inline]
    pub fn id(&self) -> TypeID {
        self.id
    }

    #[inline]
    pub fn underlying_type(&self) -> CoreTypeID {
        self.underlying_type
    }

    /// Byte width of the storage type.
    pub fn storage_size(&self) -> usize {
        match self.underlying_type {
            CoreTypeID::Uint8 | CoreTypeID::Int8 => 1,
            CoreTypeID::Uint16 | CoreTypeID::Int16 => 2,
            _ => 4,
        }
    }

    /// Values representable by the storage type.
    pub fn storage_range(&self) -> core::ops::RangeInclusive<i64> {
        match self.underlying_type {
            CoreTypeID::Uint8 => 0..=u8::MAX as i64,
            CoreTypeID::Int8 => i8::MIN as i64..=i8::MAX as i64,
            CoreTypeID::Uint16 => 0..=u16::MAX as i64,
            CoreTypeID::Int16 => i16::MIN as i64..=i16::MAX as i64,
            CoreTypeID::Uint32 => 0..=u32::MAX as i64,
            CoreTypeID::Int32 => i32::MIN as i64..=i32::MAX as i64,
            other => unreachable!("{other:?} is not an enum storage type"),
        }
    }

    #[inline]
    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    #[inline]
    pub fn is_valid_label(&self, label: StringID) -> bool {
        self.lookup.contains_key(&label)
    }

    #[inline]
    pub fn get_constant_value(&self, label: StringID) -> Option<i64> {
        self.lookup.get(&label).map(|&index| self.constants[index].value)
    }

    /// Linear scan for the first label with `value`.
    pub fn get_constant_label(&self, value: i64) -> Option<StringID> {
        self.constants
            .iter()
            .find(|constant| constant.value == value)
            .map(|constant| constant.id)
    }

    #[inline]
    pub fn is_valid_value(&self, value: i64) -> bool {
        self.constants.iter().any(|constant| constant.value == value)
    }

    #[cfg(feature = "tools")]
    pub fn get_constant_description(&self, label: StringID) -> Option<&str> {
        self.lookup
            .get(&label)
            .map(|&index| self.constants[index].description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> EnumInfo {
        EnumInfo::new(TypeID::new("test::Team"), CoreTypeID::Int8)
            .with_constant("None", -1)
            .with_constant("Red", 0)
            .with_constant("Crimson", 0)
    }

    #[test]
    fn duplicate_values_resolve_to_first_label() {
        let info = team();
        assert_eq!(info.len(), 3);
        assert_eq!(info.get_constant_label(0), Some(StringID::new("Red")));
        assert_eq!(info.get_constant_value(StringID::new("Crimson")), Some(0));
        assert_eq!(info.get_constant_value(StringID::new("Green")), None);
    }

    #[test]
    fn storage_width() {
        assert_eq!(team().storage_size(), 1);
        assert_eq!(team().storage_range(), -128..=127);
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn duplicate_labels_panic() {
        let _ = team().with_constant("Red", 4);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn out_of_range_value_panics() {
        let _ = team().with_constant("Huge", 300);
    }

    #[test]
    #[should_panic(expected = "unsupported storage type")]
    fn wide_storage_is_rejected() {
        let _ = EnumInfo::new(TypeID::new("test::Wide"), CoreTypeID::Int64);
    }
}
