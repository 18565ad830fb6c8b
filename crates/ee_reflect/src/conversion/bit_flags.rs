use core::fmt::Write;

use ee_utils::StringID;

use crate::conversion::ConversionError;
use crate::core_types::MAX_FLAGS;
use crate::info::EnumInfo;

/// Label the set bits of `mask` with `enum_info`'s constants.
///
/// Set bits are listed in ascending order joined by `|`. If any set bit has
/// no label the whole mask is written as `0x` hex instead.
///
/// # Examples
///
/// ```
/// use ee_reflect::TypeID;
/// use ee_reflect::conversion::{convert_bit_flags_to_string, convert_string_to_bit_flags};
/// use ee_reflect::core_types::CoreTypeID;
/// use ee_reflect::info::EnumInfo;
///
/// let layers = EnumInfo::new(TypeID::new("Layers"), CoreTypeID::Uint8)
///     .with_constant("World", 0)
///     .with_constant("Water", 1)
///     .with_constant("Sky", 4);
///
/// assert_eq!(convert_bit_flags_to_string(&layers, 0b10011), "World|Water|Sky");
/// assert_eq!(convert_bit_flags_to_string(&layers, 0b100), "0x4");
/// assert_eq!(convert_string_to_bit_flags(&layers, "Water| Sky").unwrap(), 0b10010);
/// assert_eq!(convert_string_to_bit_flags(&layers, "0xFF").unwrap(), 0xFF);
/// ```
pub fn convert_bit_flags_to_string(enum_info: &EnumInfo, mask: u32) -> String {
    let mut text = String::new();
    for bit in 0..MAX_FLAGS {
        if mask & (1 << bit) == 0 {
            continue;
        }
        let Some(label) = enum_info.get_constant_label(i64::from(bit)) else {
            return format!("0x{mask:X}");
        };
        if !text.is_empty() {
            text.push('|');
        }
        let _ = write!(text, "{label}");
    }
    text
}

/// Parse a `0x` hex mask or `|` separated labels of `enum_info`.
///
/// Spaces before a label are skipped; a space after a label is an error. The
/// empty string is the empty mask.
pub fn convert_string_to_bit_flags(enum_info: &EnumInfo, text: &str) -> Result<u32, ConversionError> {
    let invalid = || ConversionError::invalid_string(enum_info.id(), text);

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).map_err(|_| invalid());
    }
    if text.is_empty() {
        return Ok(0);
    }

    let mut mask = 0;
    for part in text.split('|') {
        let label = part.trim_start_matches(' ');
        if label.is_empty() || label.contains(char::is_whitespace) {
            return Err(invalid());
        }
        let value = enum_info
            .get_constant_value(StringID::new(label))
            .ok_or_else(|| ConversionError::UnknownEnumLabel {
                type_id: enum_info.id(),
                label: label.to_owned(),
            })?;
        let bit = u32::try_from(value)
            .ok()
            .filter(|&bit| bit < MAX_FLAGS)
            .ok_or(ConversionError::UnknownEnumValue {
                type_id: enum_info.id(),
                value,
            })?;
        mask |= 1 << bit;
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeID;
    use crate::core_types::CoreTypeID;

    fn directions() -> EnumInfo {
        EnumInfo::new(TypeID::new("Directions"), CoreTypeID::Uint8)
            .with_constant("North", 0)
            .with_constant("East", 1)
            .with_constant("South", 2)
            .with_constant("West", 3)
            .with_constant("Up", 31)
    }

    #[test]
    fn every_labelled_subset_round_trips() {
        let info = directions();
        let bits = [0u32, 1, 2, 3, 31];

        for subset in 0u32..(1 << bits.len()) {
            let mask = bits
                .iter()
                .enumerate()
                .filter(|(i, _)| subset & (1 << i) != 0)
                .fold(0u32, |mask, (_, bit)| mask | (1 << bit));

            let text = convert_bit_flags_to_string(&info, mask);
            assert_eq!(convert_string_to_bit_flags(&info, &text).unwrap(), mask, "via `{text}`");
        }
    }

    #[test]
    fn labels_are_listed_in_bit_order() {
        let info = directions();
        assert_eq!(convert_bit_flags_to_string(&info, 0), "");
        assert_eq!(convert_bit_flags_to_string(&info, 0b1001), "North|West");
        assert_eq!(convert_bit_flags_to_string(&info, 1 << 31 | 1), "North|Up");
    }

    #[test]
    fn unlabelled_bit_falls_back_to_hex() {
        let info = directions();
        let text = convert_bit_flags_to_string(&info, 0b10001);
        assert_eq!(text, "0x11");
        assert_eq!(convert_string_to_bit_flags(&info, &text).unwrap(), 0b10001);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        let info = directions();
        assert_eq!(convert_string_to_bit_flags(&info, "  North|  East").unwrap(), 0b11);
        assert!(convert_string_to_bit_flags(&info, "North |East").is_err());
        assert!(convert_string_to_bit_flags(&info, "North||East").is_err());
        assert!(convert_string_to_bit_flags(&info, "0xZZ").is_err());
        assert!(matches!(
            convert_string_to_bit_flags(&info, "Down"),
            Err(ConversionError::UnknownEnumLabel { .. })
        ));
    }

    #[test]
    fn label_values_must_be_bit_indices() {
        let info = EnumInfo::new(TypeID::new("Wide"), CoreTypeID::Uint8).with_constant("Far", 40);
        assert!(matches!(
            convert_string_to_bit_flags(&info, "Far"),
            Err(ConversionError::UnknownEnumValue { value: 40, .. })
        ));
    }
}
