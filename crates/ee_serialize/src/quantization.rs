//! Fixed-point encodings of `f32` values.
//!
//! Values outside the encodable range are clamped; `NaN` encodes as the
//! lower bound.

#[inline]
fn encode_unit(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, 1.0) * max + 0.5).floor()
}

// -----------------------------------------------------------------------------
// Signed normalized

/// Encode a value in `[-1, 1]` into 8 bits.
#[inline]
pub fn encode_signed_normalized_float8(value: f32) -> u8 {
    encode_unit(value * 0.5 + 0.5, u8::MAX as f32) as u8
}

#[inline]
pub fn decode_signed_normalized_float8(encoded: u8) -> f32 {
    (encoded as f32 / u8::MAX as f32) * 2.0 - 1.0
}

/// Encode a value in `[-1, 1]` into 16 bits.
#[inline]
pub fn encode_signed_normalized_float16(value: f32) -> u16 {
    encode_unit(value * 0.5 + 0.5, u16::MAX as f32) as u16
}

#[inline]
pub fn decode_signed_normalized_float16(encoded: u16) -> f32 {
    (encoded as f32 / u16::MAX as f32) * 2.0 - 1.0
}

// -----------------------------------------------------------------------------
// Range quantized

/// Encode a value in `[min, max]` into 16 bits.
///
/// # Panics
///
/// Panics if `min >= max`.
#[inline]
pub fn encode_float16(value: f32, min: f32, max: f32) -> u16 {
    assert!(min < max, "invalid quantization range [{min}, {max}]");
    encode_unit((value - min) / (max - min), u16::MAX as f32) as u16
}

/// # Panics
///
/// Panics if `min >= max`.
#[inline]
pub fn decode_float16(encoded: u16, min: f32, max: f32) -> f32 {
    assert!(min < max, "invalid quantization range [{min}, {max}]");
    min + (encoded as f32 / u16::MAX as f32) * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_endpoints_are_exact() {
        for value in [-1.0, 0.0, 1.0] {
            let decoded = decode_signed_normalized_float16(encode_signed_normalized_float16(value));
            assert!((decoded - value).abs() < 1e-4, "{value} -> {decoded}");
        }
        assert_eq!(encode_signed_normalized_float8(-1.0), 0);
        assert_eq!(encode_signed_normalized_float8(1.0), u8::MAX);
        assert_eq!(decode_signed_normalized_float8(u8::MAX), 1.0);
    }

    #[test]
    fn normalized_error_is_within_one_step() {
        let step8 = 2.0 / u8::MAX as f32;
        let step16 = 2.0 / u16::MAX as f32;
        for i in -100..=100 {
            let value = i as f32 / 100.0;
            let decoded8 = decode_signed_normalized_float8(encode_signed_normalized_float8(value));
            let decoded16 = decode_signed_normalized_float16(encode_signed_normalized_float16(value));
            assert!((decoded8 - value).abs() <= step8);
            assert!((decoded16 - value).abs() <= step16);
        }
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(encode_signed_normalized_float8(5.0), u8::MAX);
        assert_eq!(encode_signed_normalized_float16(-3.0), 0);
        assert_eq!(encode_float16(-20.0, -10.0, 10.0), 0);
        assert_eq!(encode_float16(20.0, -10.0, 10.0), u16::MAX);
        assert_eq!(encode_float16(f32::NAN, -10.0, 10.0), 0);
    }

    #[test]
    fn range_quantization() {
        let step = 200.0 / u16::MAX as f32;
        for value in [-100.0, -33.3, 0.0, 12.5, 99.9, 100.0] {
            let decoded = decode_float16(encode_float16(value, -100.0, 100.0), -100.0, 100.0);
            assert!((decoded - value).abs() <= step, "{value} -> {decoded}");
        }
    }

    #[test]
    #[should_panic(expected = "invalid quantization range")]
    fn empty_range_panics() {
        encode_float16(1.0, 2.0, 2.0);
    }
}
