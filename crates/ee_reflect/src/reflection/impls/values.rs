use ee_utils::StringID;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use uuid::Uuid;

use crate::TypeID;
use crate::core_types::{
    Color, CoreTypeID, Degrees, EulerAngles, FloatCurve, FloatRange, IntRange, Microseconds,
    Milliseconds, Percentage, Radians, Seconds, Transform,
};
use crate::reflection::{PropertyType, PropertyTypeDesc, Reflect, ReflectMut, ReflectRef};
use crate::resource::{ResourceID, ResourcePath, ResourceTypeID};

macro_rules! impl_reflect_value {
    ($($ty:ty => $core:ident),* $(,)?) => {$(
        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Value
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Value
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn Reflect) -> bool {
                other.downcast_ref::<Self>().is_some_and(|other| self == other)
            }

            fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
                match other.downcast_ref::<Self>() {
                    Some(other) => {
                        self.clone_from(other);
                        true
                    }
                    None => false,
                }
            }
        }

        impl PropertyType for $ty {
            #[inline]
            fn property_type() -> PropertyTypeDesc {
                PropertyTypeDesc::core(CoreTypeID::$core)
            }
        }
    )*};
}

impl_reflect_value! {
    bool => Bool,
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
    Uuid => UUID,
    StringID => StringID,
    TypeID => TypeID,
    String => String,
    Color => Color,
    Vec2 => Float2,
    Vec3 => Float3,
    Vec4 => Float4,
    Quat => Quaternion,
    Mat4 => Matrix,
    Transform => Transform,
    Microseconds => Microseconds,
    Milliseconds => Milliseconds,
    Seconds => Seconds,
    Percentage => Percentage,
    Degrees => Degrees,
    Radians => Radians,
    EulerAngles => EulerAngles,
    IntRange => IntRange,
    FloatRange => FloatRange,
    FloatCurve => FloatCurve,
    ResourcePath => ResourcePath,
    ResourceTypeID => ResourceTypeID,
    ResourceID => ResourceID,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::PropertyFlags;

    #[test]
    fn core_values_compare_by_type_and_value() {
        let a: &dyn Reflect = &Vec3::new(1.0, 2.0, 3.0);
        assert!(a.reflect_eq(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!a.reflect_eq(&Vec3::ZERO));
        assert!(!a.reflect_eq(&Vec4::new(1.0, 2.0, 3.0, 0.0)));
    }

    #[test]
    fn set_copies_only_same_type() {
        let mut name = String::from("old");
        assert!(name.reflect_set(&String::from("new")));
        assert_eq!(name, "new");
        assert!(!name.reflect_set(&5u8));
        assert_eq!(name, "new");
    }

    #[test]
    fn core_property_types() {
        let desc = f32::property_type();
        assert_eq!(desc.type_id, TypeID::new("float"));
        assert_eq!(desc.flags, PropertyFlags::empty());
        assert_eq!(Quat::property_type().type_id, TypeID::new("Quaternion"));
    }
}
