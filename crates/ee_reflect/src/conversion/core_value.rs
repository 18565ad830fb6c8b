use core::fmt::Display;
use core::str::FromStr;

use ee_utils::StringID;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::TypeID;
use crate::core_types::{
    Color, CoreTypeID, CurvePoint, Degrees, EulerAngles, FloatCurve, FloatRange, IntRange,
    Microseconds, Milliseconds, Percentage, Radians, Seconds, Transform,
};
use crate::reflection::Reflect;
use crate::resource::{ResourceID, ResourcePath, ResourceTypeID};

/// A non-templated core type with a string form.
///
/// The binary form is the value's `serde` encoding.
pub trait CoreValue: Reflect + Default + Clone + PartialEq + Serialize + DeserializeOwned {
    const CORE_TYPE: CoreTypeID;

    fn to_core_string(&self) -> String;

    /// `None` if `text` is not a valid value.
    fn from_core_string(text: &str) -> Option<Self>;
}

fn join<T: Display>(values: &[T]) -> String {
    let mut text = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&value.to_string());
    }
    text
}

/// Exactly `N` comma-separated values.
fn parse_list<T: FromStr + Copy + Default, const N: usize>(text: &str) -> Option<[T; N]> {
    let mut values = [T::default(); N];
    let mut parts = text.split(',');
    for value in &mut values {
        *value = parts.next()?.trim().parse().ok()?;
    }
    parts.next().is_none().then_some(values)
}

macro_rules! impl_parsed {
    ($($ty:ty => $core:ident),* $(,)?) => {$(
        impl CoreValue for $ty {
            const CORE_TYPE: CoreTypeID = CoreTypeID::$core;

            #[inline]
            fn to_core_string(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn from_core_string(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    )*};
}

impl_parsed! {
    u8 => Uint8,
    i8 => Int8,
    u16 => Uint16,
    i16 => Int16,
    u32 => Uint32,
    i32 => Int32,
    u64 => Uint64,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
}

macro_rules! impl_unit {
    ($($ty:ident),* $(,)?) => {$(
        impl CoreValue for $ty {
            const CORE_TYPE: CoreTypeID = CoreTypeID::$ty;

            #[inline]
            fn to_core_string(&self) -> String {
                self.0.to_string()
            }

            #[inline]
            fn from_core_string(text: &str) -> Option<Self> {
                f32::from_core_string(text).map($ty)
            }
        }
    )*};
}

impl_unit!(Microseconds, Milliseconds, Seconds, Percentage, Degrees, Radians);

impl CoreValue for bool {
    const CORE_TYPE: CoreTypeID = CoreTypeID::Bool;

    fn to_core_string(&self) -> String {
        let text = if *self { "True" } else { "False" };
        text.to_owned()
    }

    /// Anything but a case-insensitive `true` is `false`.
    fn from_core_string(text: &str) -> Option<Self> {
        Some(text.eq_ignore_ascii_case("true"))
    }
}

impl CoreValue for Uuid {
    const CORE_TYPE: CoreTypeID = CoreTypeID::UUID;

    fn to_core_string(&self) -> String {
        self.hyphenated().to_string()
    }

    fn from_core_string(text: &str) -> Option<Self> {
        Uuid::parse_str(text.trim()).ok()
    }
}

impl CoreValue for StringID {
    const CORE_TYPE: CoreTypeID = CoreTypeID::StringID;

    fn to_core_string(&self) -> String {
        self.as_str().to_owned()
    }

    fn from_core_string(text: &str) -> Option<Self> {
        Some(StringID::new(text))
    }
}

impl CoreValue for TypeID {
    const CORE_TYPE: CoreTypeID = CoreTypeID::TypeID;

    fn to_core_string(&self) -> String {
        self.as_str().to_owned()
    }

    fn from_core_string(text: &str) -> Option<Self> {
        Some(TypeID::new(text))
    }
}

impl CoreValue for String {
    const CORE_TYPE: CoreTypeID = CoreTypeID::String;

    fn to_core_string(&self) -> String {
        self.clone()
    }

    fn from_core_string(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }
}

impl CoreValue for Color {
    const CORE_TYPE: CoreTypeID = CoreTypeID::Color;

    fn to_core_string(&self) -> String {
        join(&[self.r, self.g, self.b, self.a])
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let [r, g, b, a] = parse_list(text)?;
        Some(Color::new(r, g, b, a))
    }
}

macro_rules! impl_vector {
    ($($ty:ty => $core:ident, $n:literal);* $(;)?) => {$(
        impl CoreValue for $ty {
            const CORE_TYPE: CoreTypeID = CoreTypeID::$core;

            fn to_core_string(&self) -> String {
                join(&self.to_array())
            }

            fn from_core_string(text: &str) -> Option<Self> {
                parse_list::<f32, $n>(text).map(<$ty>::from_array)
            }
        }
    )*};
}

impl_vector! {
    Vec2 => Float2, 2;
    Vec3 => Float3, 3;
    Vec4 => Float4, 4;
    Quat => Quaternion, 4;
}

impl CoreValue for Mat4 {
    const CORE_TYPE: CoreTypeID = CoreTypeID::Matrix;

    fn to_core_string(&self) -> String {
        join(&self.to_cols_array())
    }

    fn from_core_string(text: &str) -> Option<Self> {
        parse_list::<f32, 16>(text).map(|cols| Mat4::from_cols_array(&cols))
    }
}

/// Rotation as XYZ Euler degrees, then translation, then scale.
impl CoreValue for Transform {
    const CORE_TYPE: CoreTypeID = CoreTypeID::Transform;

    fn to_core_string(&self) -> String {
        let EulerAngles { x, y, z } = EulerAngles::from_quat(self.rotation);
        let t = self.translation;
        join(&[x, y, z, t.x, t.y, t.z, self.scale])
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let [rx, ry, rz, tx, ty, tz, scale] = parse_list::<f32, 7>(text)?;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rx.to_radians(),
            ry.to_radians(),
            rz.to_radians(),
        );
        Some(Transform::new(rotation, Vec3::new(tx, ty, tz), scale))
    }
}

impl CoreValue for EulerAngles {
    const CORE_TYPE: CoreTypeID = CoreTypeID::EulerAngles;

    fn to_core_string(&self) -> String {
        join(&[self.x, self.y, self.z])
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let [x, y, z] = parse_list(text)?;
        Some(EulerAngles::new(x, y, z))
    }
}

impl CoreValue for IntRange {
    const CORE_TYPE: CoreTypeID = CoreTypeID::IntRange;

    fn to_core_string(&self) -> String {
        join(&[self.begin, self.end])
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let [begin, end] = parse_list(text)?;
        Some(IntRange::new(begin, end))
    }
}

impl CoreValue for FloatRange {
    const CORE_TYPE: CoreTypeID = CoreTypeID::FloatRange;

    fn to_core_string(&self) -> String {
        join(&[self.begin, self.end])
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let [begin, end] = parse_list(text)?;
        Some(FloatRange::new(begin, end))
    }
}

/// Points as `parameter,value,in,out`, separated by `;`.
impl CoreValue for FloatCurve {
    const CORE_TYPE: CoreTypeID = CoreTypeID::FloatCurve;

    fn to_core_string(&self) -> String {
        self.points()
            .iter()
            .map(|p| join(&[p.parameter, p.value, p.in_tangent, p.out_tangent]))
            .collect::<Vec<_>>()
            .join(";")
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let points = text
            .split(';')
            .filter(|point| !point.trim().is_empty())
            .map(|point| {
                let [parameter, value, in_tangent, out_tangent] = parse_list(point)?;
                Some(CurvePoint { parameter, value, in_tangent, out_tangent })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(FloatCurve::from_points(points))
    }
}

impl CoreValue for ResourcePath {
    const CORE_TYPE: CoreTypeID = CoreTypeID::ResourcePath;

    fn to_core_string(&self) -> String {
        self.as_str().to_owned()
    }

    /// Empty, or a `data://` path.
    fn from_core_string(text: &str) -> Option<Self> {
        let path = ResourcePath::new(text.trim());
        (text.trim().is_empty() || path.is_valid()).then_some(path)
    }
}

impl CoreValue for ResourceTypeID {
    const CORE_TYPE: CoreTypeID = CoreTypeID::ResourceTypeID;

    fn to_core_string(&self) -> String {
        self.to_string()
    }

    fn from_core_string(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(ResourceTypeID::INVALID);
        }
        ResourceTypeID::try_new(text)
    }
}

impl CoreValue for ResourceID {
    const CORE_TYPE: CoreTypeID = CoreTypeID::ResourceID;

    fn to_core_string(&self) -> String {
        self.path().as_str().to_owned()
    }

    /// Empty, or a `data://` path with a resource type extension.
    fn from_core_string(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(ResourceID::default());
        }
        let id = ResourceID::new(text);
        id.is_valid().then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: CoreValue + core::fmt::Debug>(value: T) {
        let text = value.to_core_string();
        assert_eq!(T::from_core_string(&text).as_ref(), Some(&value), "via `{text}`");

        let bytes = postcard::to_allocvec(&value).unwrap();
        assert_eq!(postcard::from_bytes::<T>(&bytes).unwrap(), value);
    }

    #[test]
    fn scalars_round_trip() {
        round_trip(true);
        round_trip(false);
        round_trip(0u8);
        round_trip(u8::MAX);
        round_trip(i8::MIN);
        round_trip(u16::MAX);
        round_trip(i16::MIN);
        round_trip(u32::MAX);
        round_trip(i32::MIN);
        round_trip(u64::MAX);
        round_trip(i64::MIN);
        round_trip(0.1f32);
        round_trip(-3.5e-12f32);
        round_trip(f32::MAX);
        round_trip(core::f64::consts::PI);
        round_trip(Seconds(2.5));
        round_trip(Degrees(-90.0));
        round_trip(Percentage(0.333));
    }

    #[test]
    fn text_types_round_trip() {
        round_trip(String::new());
        round_trip(String::from("hello, world"));
        round_trip(StringID::new("Weapon"));
        round_trip(TypeID::new("game::Widget"));
        round_trip(Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0));
        round_trip(ResourcePath::new("data://maps/arena.map"));
        round_trip(ResourceTypeID::new("map"));
        round_trip(ResourceID::new("data://maps/arena.map"));
        round_trip(ResourceID::default());
    }

    #[test]
    fn math_types_round_trip() {
        round_trip(Color::new(1, 2, 3, 255));
        round_trip(Vec2::new(1.5, -2.0));
        round_trip(Vec3::new(0.0, 1.0, 1e6));
        round_trip(Vec4::new(1.0, 2.0, 3.0, 4.0));
        round_trip(Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
        round_trip(Mat4::from_cols_array(&core::array::from_fn(|i| i as f32)));
        round_trip(Transform::new(Quat::IDENTITY, Vec3::new(1.0, 2.0, 3.0), 2.0));
        round_trip(EulerAngles::new(10.0, 20.0, 30.0));
        round_trip(IntRange::new(-5, 5));
        round_trip(FloatRange::new(0.25, 0.75));

        let mut curve = FloatCurve::default();
        curve.add_point(0.0, 1.0, 0.5, -0.5);
        curve.add_point(1.0, 2.0, 0.0, 0.0);
        round_trip(curve);
        round_trip(FloatCurve::default());
    }

    #[test]
    fn string_grammar() {
        assert_eq!(true.to_core_string(), "True");
        assert_eq!(bool::from_core_string("TRUE"), Some(true));
        assert_eq!(bool::from_core_string(""), Some(false));
        assert_eq!(bool::from_core_string("yes"), Some(false));

        assert_eq!(Vec3::new(1.0, 2.5, -3.0).to_core_string(), "1,2.5,-3");
        assert_eq!(Vec3::from_core_string(" 1 , 2 ,3"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Vec3::from_core_string("1,2"), None);
        assert_eq!(Vec3::from_core_string("1,2,3,4"), None);
        assert_eq!(u8::from_core_string("256"), None);
        assert_eq!(ResourceID::from_core_string("maps/arena.map"), None);
    }

    #[test]
    fn transform_string_uses_euler_degrees() {
        let transform = Transform::new(
            EulerAngles::new(0.0, 90.0, 0.0).to_quat(),
            Vec3::new(1.0, 2.0, 3.0),
            0.5,
        );
        let text = transform.to_core_string();
        let parsed: Vec<f32> = text.split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(parsed.len(), 7);
        assert!((parsed[1] - 90.0).abs() < 1e-3);
        assert_eq!(&parsed[3..], &[1.0, 2.0, 3.0, 0.5]);

        let back = Transform::from_core_string(&text).unwrap();
        assert!(back.rotation.abs_diff_eq(transform.rotation, 1e-5));
        assert_eq!(back.translation, transform.translation);
    }
}
