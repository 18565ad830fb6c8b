use serde::{Deserialize, Serialize};

macro_rules! define_unit {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f32);

        impl From<f32> for $name {
            #[inline]
            fn from(value: f32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for f32 {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }
    )*};
}

define_unit! {
    /// A duration in microseconds.
    Microseconds;
    /// A duration in milliseconds.
    Milliseconds;
    /// A duration in seconds.
    Seconds;
    /// A ratio where `1.0` is one hundred percent.
    Percentage;
    /// An angle in degrees.
    Degrees;
    /// An angle in radians.
    Radians;
}

impl Seconds {
    #[inline]
    pub fn to_milliseconds(self) -> Milliseconds {
        Milliseconds(self.0 * 1000.0)
    }
}

impl Milliseconds {
    #[inline]
    pub fn to_seconds(self) -> Seconds {
        Seconds(self.0 / 1000.0)
    }

    #[inline]
    pub fn to_microseconds(self) -> Microseconds {
        Microseconds(self.0 * 1000.0)
    }
}

impl Degrees {
    #[inline]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl Radians {
    #[inline]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }
}

impl Percentage {
    /// Clamp to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }
}
