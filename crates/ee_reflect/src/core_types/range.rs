use serde::{Deserialize, Serialize};

/// An inclusive integer range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    pub begin: i32,
    pub end: i32,
}

impl IntRange {
    #[inline]
    pub const fn new(begin: i32, end: i32) -> Self {
        Self { begin, end }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.begin <= self.end
    }

    #[inline]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.begin && value <= self.end
    }
}

/// An inclusive float range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub begin: f32,
    pub end: f32,
}

impl FloatRange {
    #[inline]
    pub const fn new(begin: f32, end: f32) -> Self {
        Self { begin, end }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.begin <= self.end
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.begin && value <= self.end
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.end - self.begin
    }

    /// Linear position of `value` in the range, `0` at `begin` and `1` at `end`.
    pub fn percentage_through(&self, value: f32) -> f32 {
        let length = self.length();
        if length == 0.0 {
            0.0
        } else {
            (value - self.begin) / length
        }
    }
}
