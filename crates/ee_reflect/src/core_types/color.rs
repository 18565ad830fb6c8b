use glam::Vec4;
use serde::{Deserialize, Serialize};

/// An 8-bit per channel RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as floats in `[0, 1]`.
    pub fn to_float4(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }

    /// Build from floats in `[0, 1]`, clamping out-of-range channels.
    pub fn from_float4(value: Vec4) -> Self {
        let [r, g, b, a] = (value.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round().to_array();
        Self::new(r as u8, g as u8, b as u8, a as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_channels() {
        assert_eq!(Color::WHITE.to_float4(), Vec4::ONE);
        assert_eq!(Color::from_float4(Vec4::new(1.0, 0.5, -1.0, 2.0)), Color::new(255, 128, 0, 255));
    }
}
