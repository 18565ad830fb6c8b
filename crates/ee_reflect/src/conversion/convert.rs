use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::TypeID;
use crate::conversion::{
    ConversionError, CoreValue, convert_bit_flags_to_string, convert_string_to_bit_flags,
};
use crate::core_types::{
    Color, CoreTypeID, Degrees, EulerAngles, FloatCurve, FloatRange, IntRange, Microseconds,
    Milliseconds, Percentage, Radians, Seconds, Transform,
};
use crate::descriptor::TypeDescriptor;
use crate::info::EnumInfo;
use crate::reflection::{Reflect, ReflectInstance, ReflectMut, ReflectRef, ReflectedType};
use crate::registry::TypeRegistry;
use crate::resource::{ResourceID, ResourcePath, ResourceTypeID};

type Result<T> = core::result::Result<T, ConversionError>;

/// Run `$body` with `$t` aliased to the native type of a plain core value.
macro_rules! with_core_value {
    ($core:expr, $t:ident => $body:expr, _ => $otherwise:expr $(,)?) => {
        with_core_value!(@arms $core, $t, $body, $otherwise;
            Bool => bool,
            Uint8 => u8,
            Int8 => i8,
            Uint16 => u16,
            Int16 => i16,
            Uint32 => u32,
            Int32 => i32,
            Uint64 => u64,
            Int64 => i64,
            Float => f32,
            Double => f64,
            UUID => uuid::Uuid,
            StringID => ee_utils::StringID,
            TypeID => TypeID,
            String => String,
            Color => Color,
            Float2 => glam::Vec2,
            Float3 => glam::Vec3,
            Float4 => glam::Vec4,
            Quaternion => glam::Quat,
            Matrix => glam::Mat4,
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
        )
    };
    (@arms $core:expr, $t:ident, $body:expr, $otherwise:expr; $($variant:ident => $ty:ty,)*) => {
        match $core {
            $(CoreTypeID::$variant => {
                type $t = $ty;
                $body
            })*
            _ => $otherwise,
        }
    };
}

/// Run `$body` with `$t` aliased to the integer an enum is stored as.
macro_rules! with_enum_storage {
    ($info:expr, $t:ident => $body:expr) => {
        match $info.underlying_type() {
            CoreTypeID::Uint8 => { type $t = u8; $body }
            CoreTypeID::Int8 => { type $t = i8; $body }
            CoreTypeID::Uint16 => { type $t = u16; $body }
            CoreTypeID::Int16 => { type $t = i16; $body }
            CoreTypeID::Uint32 => { type $t = u32; $body }
            CoreTypeID::Int32 => { type $t = i32; $body }
            other => unreachable!("{other:?} is not an enum storage type"),
        }
    };
}

// -----------------------------------------------------------------------------
// Classification

/// How values of a property type are converted.
enum ValueKind<'a> {
    Core(CoreTypeID),
    Enum(&'a EnumInfo),
    /// Untyped masks have no labelling enum.
    BitFlags(Option<&'a EnumInfo>),
    Resource,
    Instance,
}

fn classify(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
) -> Result<ValueKind<'_>> {
    let core_type = registry.core_type_registry().get_type(type_id);
    match core_type {
        CoreTypeID::Invalid => registry
            .get_enum_info(type_id)
            .map(ValueKind::Enum)
            .ok_or(ConversionError::UnknownType(type_id)),
        CoreTypeID::BitFlags => Ok(ValueKind::BitFlags(None)),
        CoreTypeID::TBitFlags => registry
            .get_enum_info(template_argument)
            .map(|info| ValueKind::BitFlags(Some(info)))
            .ok_or(ConversionError::UnknownType(template_argument)),
        CoreTypeID::ResourcePtr | CoreTypeID::TResourcePtr => Ok(ValueKind::Resource),
        CoreTypeID::TypeInstance | CoreTypeID::TTypeInstance => Ok(ValueKind::Instance),
        CoreTypeID::TVector | CoreTypeID::TInlineVector => Err(ConversionError::Unsupported(type_id)),
        core_type => Ok(ValueKind::Core(core_type)),
    }
}

fn mismatch(type_id: TypeID, value: &dyn Reflect) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: type_id,
        actual: value.reflect_type_name(),
    }
}

#[inline]
fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(postcard::to_allocvec(value)?)
}

#[inline]
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(postcard::from_bytes(bytes)?)
}

fn parse_core<T: CoreValue>(type_id: TypeID, text: &str) -> Result<T> {
    T::from_core_string(text).ok_or_else(|| ConversionError::invalid_string(type_id, text))
}

fn downcast_core<T: CoreValue>(type_id: TypeID, value: &dyn Reflect) -> Result<&T> {
    value.downcast_ref::<T>().ok_or_else(|| mismatch(type_id, value))
}

fn downcast_core_mut<T: CoreValue>(type_id: TypeID, value: &mut dyn Reflect) -> Result<&mut T> {
    let actual = value.reflect_type_name();
    value.downcast_mut::<T>().ok_or(ConversionError::TypeMismatch {
        expected: type_id,
        actual,
    })
}

fn parse_enum_label(info: &EnumInfo, text: &str) -> Result<i64> {
    info.get_constant_value(ee_utils::StringID::new(text))
        .ok_or_else(|| ConversionError::UnknownEnumLabel {
            type_id: info.id(),
            label: text.to_owned(),
        })
}

fn enum_label(info: &EnumInfo, value: i64) -> Result<String> {
    info.get_constant_label(value)
        .map(|label| label.as_str().to_owned())
        .ok_or(ConversionError::UnknownEnumValue {
            type_id: info.id(),
            value,
        })
}

fn encode_enum(info: &EnumInfo, value: i64) -> Result<Vec<u8>> {
    let unknown = ConversionError::UnknownEnumValue {
        type_id: info.id(),
        value,
    };
    with_enum_storage!(info, T => encode(&T::try_from(value).map_err(|_| unknown)?))
}

fn decode_enum(info: &EnumInfo, bytes: &[u8]) -> Result<i64> {
    let value = with_enum_storage!(info, T => i64::from(decode::<T>(bytes)?));
    if !info.is_valid_value(value) {
        return Err(ConversionError::UnknownEnumValue {
            type_id: info.id(),
            value,
        });
    }
    Ok(value)
}

fn parse_bit_flags(enum_info: Option<&EnumInfo>, type_id: TypeID, text: &str) -> Result<u32> {
    match enum_info {
        Some(info) => convert_string_to_bit_flags(info, text),
        None => parse_core::<u32>(type_id, text),
    }
}

fn bit_flags_string(enum_info: Option<&EnumInfo>, bits: u32) -> String {
    match enum_info {
        Some(info) => convert_bit_flags_to_string(info, bits),
        None => bits.to_string(),
    }
}

/// The resource type a typed handle's template argument names.
fn required_resource_type(registry: &TypeRegistry, template_argument: TypeID) -> Option<ResourceTypeID> {
    if !template_argument.is_valid() {
        return None;
    }
    registry
        .get_resource_info_for_type(template_argument)
        .map(|info| info.resource_type_id)
}

fn check_resource_type(
    registry: &TypeRegistry,
    type_id: TypeID,
    required: Option<ResourceTypeID>,
    id: &ResourceID,
) -> Result<()> {
    match required {
        Some(required)
            if id.is_valid()
                && id.resource_type_id() != required
                && !registry.is_resource_type_derived_from(id.resource_type_id(), required) =>
        {
            Err(ConversionError::invalid_string(type_id, id.path().as_str()))
        }
        _ => Ok(()),
    }
}

fn parse_resource_id(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    text: &str,
) -> Result<ResourceID> {
    let id = parse_core::<ResourceID>(type_id, text)?;
    check_resource_type(registry, type_id, required_resource_type(registry, template_argument), &id)?;
    Ok(id)
}

/// An empty string is an unset instance; anything else names a registered
/// type deriving from `template_argument`, if that is valid.
fn parse_instance_type(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    text: &str,
) -> Result<Option<TypeID>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let instance = TypeID::new(text);
    let info = registry
        .get_type_info(instance)
        .ok_or_else(|| ConversionError::invalid_string(type_id, text))?;
    if template_argument.is_valid() && !info.is_derived_from(template_argument) {
        return Err(ConversionError::InstanceTypeRejected {
            instance,
            base: template_argument,
        });
    }
    Ok(Some(instance))
}

fn set_instance(
    instance: &mut dyn ReflectInstance,
    value: Option<Box<dyn ReflectedType>>,
) -> Result<()> {
    let type_id = value.as_ref().map(|v| v.reflect_type_info().id());
    let base = instance.base_type_id().unwrap_or(TypeID::INVALID);
    if instance.set_instance(value) {
        Ok(())
    } else {
        Err(ConversionError::InstanceTypeRejected {
            instance: type_id.unwrap_or(TypeID::INVALID),
            base,
        })
    }
}

// -----------------------------------------------------------------------------
// Native <-> string

/// Write `value`, a native value of type `type_id`, in its string form.
///
/// # Examples
///
/// ```
/// use ee_reflect::TypeID;
/// use ee_reflect::conversion::{convert_native_to_string, convert_string_to_native};
/// use ee_reflect::registry::TypeRegistry;
/// use glam::Vec3;
///
/// let registry = TypeRegistry::new();
/// let float3 = TypeID::new("Float3");
///
/// let text = convert_native_to_string(&registry, float3, TypeID::INVALID, &Vec3::new(1.0, 0.5, -2.0)).unwrap();
/// assert_eq!(text, "1,0.5,-2");
///
/// let mut value = Vec3::ZERO;
/// convert_string_to_native(&registry, float3, TypeID::INVALID, "4,5,6", &mut value).unwrap();
/// assert_eq!(value, Vec3::new(4.0, 5.0, 6.0));
/// ```
pub fn convert_native_to_string(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    value: &dyn Reflect,
) -> Result<String> {
    match (classify(registry, type_id, template_argument)?, value.reflect_ref()) {
        (ValueKind::Core(core_type), _) => with_core_value!(core_type,
            T => Ok(downcast_core::<T>(type_id, value)?.to_core_string()),
            _ => Err(ConversionError::Unsupported(type_id)),
        ),
        (ValueKind::Enum(info), ReflectRef::Enum(native)) => enum_label(info, native.value()),
        (ValueKind::BitFlags(info), ReflectRef::BitFlags(native)) => {
            Ok(bit_flags_string(info, native.bits()))
        }
        (ValueKind::Resource, ReflectRef::Resource(native)) => {
            Ok(native.resource_id().path().as_str().to_owned())
        }
        (ValueKind::Instance, ReflectRef::Instance(native)) => Ok(native
            .instance()
            .map(|instance| instance.reflect_type_info().id().as_str().to_owned())
            .unwrap_or_default()),
        _ => Err(mismatch(type_id, value)),
    }
}

/// Parse `text` into `value`, a native value of type `type_id`.
///
/// `value` is left unchanged on error.
pub fn convert_string_to_native(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    text: &str,
    value: &mut dyn Reflect,
) -> Result<()> {
    let kind = classify(registry, type_id, template_argument)?;
    if let ValueKind::Core(core_type) = kind {
        return with_core_value!(core_type,
            T => {
                let parsed = parse_core::<T>(type_id, text)?;
                *downcast_core_mut::<T>(type_id, value)? = parsed;
                Ok(())
            },
            _ => Err(ConversionError::Unsupported(type_id)),
        );
    }

    let actual = value.reflect_type_name();
    match (kind, value.reflect_mut()) {
        (ValueKind::Enum(info), ReflectMut::Enum(native)) => {
            let parsed = parse_enum_label(info, text)?;
            native.set_value(parsed);
            Ok(())
        }
        (ValueKind::BitFlags(info), ReflectMut::BitFlags(native)) => {
            native.set_bits(parse_bit_flags(info, type_id, text)?);
            Ok(())
        }
        (ValueKind::Resource, ReflectMut::Resource(native)) => {
            let id = parse_resource_id(registry, type_id, template_argument, text)?;
            check_resource_type(registry, type_id, native.required_resource_type(), &id)?;
            native.set_resource_id(id);
            Ok(())
        }
        (ValueKind::Instance, ReflectMut::Instance(native)) => {
            let instance = parse_instance_type(registry, type_id, template_argument, text)?
                .and_then(|id| registry.get_type_info(id))
                .map(|info| info.create_type());
            set_instance(native, instance)
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: type_id,
            actual,
        }),
    }
}

/// `true` if [`convert_string_to_native`] would accept `text`.
pub fn is_valid_string_value_for_type(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    text: &str,
) -> bool {
    let Ok(kind) = classify(registry, type_id, template_argument) else {
        return false;
    };
    match kind {
        ValueKind::Core(core_type) => with_core_value!(core_type,
            T => T::from_core_string(text).is_some(),
            _ => false,
        ),
        ValueKind::Enum(info) => info.is_valid_label(ee_utils::StringID::new(text)),
        ValueKind::BitFlags(info) => parse_bit_flags(info, type_id, text).is_ok(),
        ValueKind::Resource => parse_resource_id(registry, type_id, template_argument, text).is_ok(),
        ValueKind::Instance => parse_instance_type(registry, type_id, template_argument, text).is_ok(),
    }
}

// -----------------------------------------------------------------------------
// Native <-> binary

/// Encode `value`, a native value of type `type_id`, in its binary form.
///
/// Core values use their `postcard` encoding, enums are written at their
/// storage width, and type instances as an optional [`TypeDescriptor`].
pub fn convert_native_to_binary(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    value: &dyn Reflect,
) -> Result<Vec<u8>> {
    match (classify(registry, type_id, template_argument)?, value.reflect_ref()) {
        (ValueKind::Core(core_type), _) => with_core_value!(core_type,
            T => encode(downcast_core::<T>(type_id, value)?),
            _ => Err(ConversionError::Unsupported(type_id)),
        ),
        (ValueKind::Enum(info), ReflectRef::Enum(native)) => encode_enum(info, native.value()),
        (ValueKind::BitFlags(_), ReflectRef::BitFlags(native)) => encode(&native.bits()),
        (ValueKind::Resource, ReflectRef::Resource(native)) => encode(native.resource_id()),
        (ValueKind::Instance, ReflectRef::Instance(native)) => {
            let descriptor = native
                .instance()
                .map(|instance| TypeDescriptor::describe_type(registry, instance, false));
            encode(&descriptor)
        }
        _ => Err(mismatch(type_id, value)),
    }
}

/// Decode `bytes` into `value`, a native value of type `type_id`.
///
/// `value` is left unchanged on error.
pub fn convert_binary_to_native(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    bytes: &[u8],
    value: &mut dyn Reflect,
) -> Result<()> {
    let kind = classify(registry, type_id, template_argument)?;
    if let ValueKind::Core(core_type) = kind {
        return with_core_value!(core_type,
            T => {
                let decoded = decode::<T>(bytes)?;
                *downcast_core_mut::<T>(type_id, value)? = decoded;
                Ok(())
            },
            _ => Err(ConversionError::Unsupported(type_id)),
        );
    }

    let actual = value.reflect_type_name();
    match (kind, value.reflect_mut()) {
        (ValueKind::Enum(info), ReflectMut::Enum(native)) => {
            native.set_value(decode_enum(info, bytes)?);
            Ok(())
        }
        (ValueKind::BitFlags(_), ReflectMut::BitFlags(native)) => {
            native.set_bits(decode(bytes)?);
            Ok(())
        }
        (ValueKind::Resource, ReflectMut::Resource(native)) => {
            let id: ResourceID = decode(bytes)?;
            check_resource_type(registry, type_id, native.required_resource_type(), &id)?;
            native.set_resource_id(id);
            Ok(())
        }
        (ValueKind::Instance, ReflectMut::Instance(native)) => {
            let instance = match decode::<Option<TypeDescriptor>>(bytes)? {
                Some(descriptor) => Some(
                    descriptor
                        .create_type(registry)
                        .ok_or(ConversionError::UnknownType(descriptor.type_id))?,
                ),
                None => None,
            };
            set_instance(native, instance)
        }
        _ => Err(ConversionError::TypeMismatch {
            expected: type_id,
            actual,
        }),
    }
}

// -----------------------------------------------------------------------------
// String <-> binary

/// Parse `text` and encode the value it names, without a native target.
pub fn convert_string_to_binary(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    text: &str,
) -> Result<Vec<u8>> {
    match classify(registry, type_id, template_argument)? {
        ValueKind::Core(core_type) => with_core_value!(core_type,
            T => encode(&parse_core::<T>(type_id, text)?),
            _ => Err(ConversionError::Unsupported(type_id)),
        ),
        ValueKind::Enum(info) => encode_enum(info, parse_enum_label(info, text)?),
        ValueKind::BitFlags(info) => encode(&parse_bit_flags(info, type_id, text)?),
        ValueKind::Resource => encode(&parse_resource_id(registry, type_id, template_argument, text)?),
        ValueKind::Instance => {
            let descriptor = parse_instance_type(registry, type_id, template_argument, text)?
                .map(TypeDescriptor::new);
            encode(&descriptor)
        }
    }
}

/// Decode `bytes` and write the value they hold in its string form.
pub fn convert_binary_to_string(
    registry: &TypeRegistry,
    type_id: TypeID,
    template_argument: TypeID,
    bytes: &[u8],
) -> Result<String> {
    match classify(registry, type_id, template_argument)? {
        ValueKind::Core(core_type) => with_core_value!(core_type,
            T => Ok(decode::<T>(bytes)?.to_core_string()),
            _ => Err(ConversionError::Unsupported(type_id)),
        ),
        ValueKind::Enum(info) => enum_label(info, decode_enum(info, bytes)?),
        ValueKind::BitFlags(info) => Ok(bit_flags_string(info, decode(bytes)?)),
        ValueKind::Resource => Ok(decode::<ResourceID>(bytes)?.path().as_str().to_owned()),
        ValueKind::Instance => Ok(decode::<Option<TypeDescriptor>>(bytes)?
            .map(|descriptor| descriptor.type_id.as_str().to_owned())
            .unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReflectedEnum;
    use crate::core_types::{BitFlags, TBitFlags, TTypeInstance, TypeInstance};
    use crate::derive::Reflect;
    use crate::info::Typed;
    use crate::resource::{Resource, ResourceInfo, ResourcePtr, TResourcePtr};
    use glam::{Quat, Vec3};

    #[derive(Reflect, Copy, Clone, Debug, Default, PartialEq)]
    #[repr(i16)]
    enum Mood {
        #[default]
        Calm = -1,
        Angry = 300,
        Sleepy = 7,
    }

    #[derive(Reflect, Default)]
    struct Creature {
        mood: Mood,
        hunger: f32,
    }

    #[derive(Reflect, Default)]
    struct Dragon {
        #[reflect(base)]
        creature: Creature,
        wingspan: f32,
    }

    #[derive(Reflect, Default)]
    struct Rock {
        weight: f32,
    }

    struct Texture;

    impl Resource for Texture {
        const RESOURCE_TYPE: ResourceTypeID = ResourceTypeID::new("tex");
        const TYPE_NAME: &'static str = "Texture";
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_enum::<Mood>();
        registry.register_type::<Creature>();
        registry.register_type::<Dragon>();
        registry.register_type::<Rock>();
        registry.register_resource_info(ResourceInfo::of::<Texture>());
        registry
    }

    fn teardown(mut registry: TypeRegistry) {
        registry.unregister_resource_info(Texture::RESOURCE_TYPE);
        registry.unregister_type(TypeID::new(Rock::TYPE_NAME));
        registry.unregister_type(TypeID::new(Dragon::TYPE_NAME));
        registry.unregister_type(TypeID::new(Creature::TYPE_NAME));
        registry.unregister_enum(Mood::reflect_type_id());
    }

    fn id(name: &str) -> TypeID {
        TypeID::new(name)
    }

    /// Convert `value` through every form and back, returning its core type.
    fn convert_all_forms<T: CoreValue + core::fmt::Debug>(registry: &TypeRegistry, value: T) -> CoreTypeID {
        let type_id = T::CORE_TYPE.type_id();
        let text = convert_native_to_string(registry, type_id, TypeID::INVALID, &value).unwrap();
        assert_eq!(text, value.to_core_string());

        let bytes = convert_native_to_binary(registry, type_id, TypeID::INVALID, &value).unwrap();
        assert_eq!(convert_binary_to_string(registry, type_id, TypeID::INVALID, &bytes).unwrap(), text);

        let mut restored = T::default();
        convert_binary_to_native(registry, type_id, TypeID::INVALID, &bytes, &mut restored).unwrap();
        assert_eq!(restored, value);

        let mut parsed = T::default();
        convert_string_to_native(registry, type_id, TypeID::INVALID, &text, &mut parsed).unwrap();
        assert_eq!(parsed, value);

        let from_text = convert_string_to_binary(registry, type_id, TypeID::INVALID, &text).unwrap();
        let mut decoded = T::default();
        convert_binary_to_native(registry, type_id, TypeID::INVALID, &from_text, &mut decoded).unwrap();
        assert_eq!(decoded, value, "{:?} from {text:?}", T::CORE_TYPE);

        T::CORE_TYPE
    }

    #[test]
    fn core_values_convert_through_every_form() {
        let registry = registry();
        let r = &registry;

        let mut curve = FloatCurve::default();
        curve.add_point(-1.5, f32::MIN, 0.0, 1.0);
        curve.add_point(2.0, f32::MAX, -0.25, 0.0);

        let covered = [
            convert_all_forms(r, true),
            convert_all_forms(r, false),
            convert_all_forms(r, u8::MAX),
            convert_all_forms(r, i8::MIN),
            convert_all_forms(r, u16::MAX),
            convert_all_forms(r, i16::MIN),
            convert_all_forms(r, u32::MAX),
            convert_all_forms(r, i32::MIN),
            convert_all_forms(r, u64::MAX),
            convert_all_forms(r, i64::MIN),
            convert_all_forms(r, f32::MAX),
            convert_all_forms(r, f32::MIN_POSITIVE),
            convert_all_forms(r, f64::MIN_POSITIVE),
            convert_all_forms(r, f64::MAX),
            convert_all_forms(r, uuid::Uuid::from_u128(u128::MAX - 1)),
            convert_all_forms(r, ee_utils::StringID::new("core/value")),
            convert_all_forms(r, id("Float3")),
            convert_all_forms(r, String::new()),
            convert_all_forms(r, String::from("a,b;c \"d\"")),
            convert_all_forms(r, Color::new(0, 255, 0, 255)),
            convert_all_forms(r, glam::Vec2::new(f32::MIN, f32::MAX)),
            convert_all_forms(r, Vec3::new(0.1, -2.0, 3.25)),
            convert_all_forms(r, glam::Vec4::new(-0.0, 1e-30, 1e30, -7.5)),
            convert_all_forms(r, Quat::from_xyzw(0.0, -1.0, 0.0, 0.0)),
            convert_all_forms(r, glam::Mat4::from_cols_array(&[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0,
                9.0, 10.0, 11.0, 12.0, f32::MIN, -0.5, 0.25, f32::MAX,
            ])),
            convert_all_forms(r, Transform::new(Quat::IDENTITY, Vec3::new(f32::MAX, -1.0, 0.5), 2.0)),
            convert_all_forms(r, Microseconds(f32::MAX)),
            convert_all_forms(r, Milliseconds(-0.125)),
            convert_all_forms(r, Seconds(1e-7)),
            convert_all_forms(r, Percentage(1.5)),
            convert_all_forms(r, Degrees(-360.0)),
            convert_all_forms(r, Radians(core::f32::consts::PI)),
            convert_all_forms(r, EulerAngles::new(-180.0, 90.0, 360.0)),
            convert_all_forms(r, IntRange::new(i32::MIN, i32::MAX)),
            convert_all_forms(r, FloatRange::new(-0.5, f32::MAX)),
            convert_all_forms(r, FloatCurve::default()),
            convert_all_forms(r, curve),
            convert_all_forms(r, ResourcePath::new("data://textures/grass field.tex")),
            convert_all_forms(r, ResourceTypeID::new("tex9")),
            convert_all_forms(r, ResourceID::new("data://meshes/crate.msh")),
            convert_all_forms(r, ResourceID::default()),
        ];

        for &core_type in CoreTypeID::ALL {
            if let Ok(ValueKind::Core(_)) = classify(r, core_type.type_id(), TypeID::INVALID) {
                assert!(covered.contains(&core_type), "{core_type:?} is not converted");
            }
        }

        teardown(registry);
    }

    #[test]
    fn mismatched_native_is_an_error() {
        let registry = registry();
        let mut value = 5u8;
        assert!(matches!(
            convert_string_to_native(&registry, id("uint16"), TypeID::INVALID, "7", &mut value),
            Err(ConversionError::TypeMismatch { .. })
        ));
        assert_eq!(value, 5);
        assert!(matches!(
            convert_native_to_string(&registry, id("NotAType"), TypeID::INVALID, &value),
            Err(ConversionError::UnknownType(_))
        ));
        assert!(matches!(
            convert_native_to_string(&registry, id("TVector"), TypeID::INVALID, &vec![1u8]),
            Err(ConversionError::Unsupported(_))
        ));
        teardown(registry);
    }

    #[test]
    fn enums_use_labels_and_storage_width() {
        let registry = registry();
        let mood = Mood::reflect_type_id();

        let text = convert_native_to_string(&registry, mood, TypeID::INVALID, &Mood::Angry).unwrap();
        assert_eq!(text, "Angry");

        let bytes = convert_native_to_binary(&registry, mood, TypeID::INVALID, &Mood::Calm).unwrap();
        assert_eq!(bytes, postcard::to_allocvec(&-1i16).unwrap());

        let mut value = Mood::Calm;
        convert_string_to_native(&registry, mood, TypeID::INVALID, "Sleepy", &mut value).unwrap();
        assert_eq!(value, Mood::Sleepy);
        assert!(convert_string_to_native(&registry, mood, TypeID::INVALID, "Happy", &mut value).is_err());
        assert_eq!(value, Mood::Sleepy);

        let bad = postcard::to_allocvec(&5i16).unwrap();
        assert!(matches!(
            convert_binary_to_native(&registry, mood, TypeID::INVALID, &bad, &mut value),
            Err(ConversionError::UnknownEnumValue { value: 5, .. })
        ));
        teardown(registry);
    }

    #[test]
    fn bit_flags_use_enum_labels() {
        #[derive(Reflect, Copy, Clone, Default)]
        #[repr(u8)]
        enum Channel {
            #[default]
            Red,
            Green,
            Blue,
        }

        let mut registry = registry();
        registry.register_enum::<Channel>();
        let tbit_flags = id("TBitFlags");

        let flags = TBitFlags::with_flags([Channel::Red, Channel::Blue]);
        let text = convert_native_to_string(&registry, tbit_flags, Channel::reflect_type_id(), &flags).unwrap();
        assert_eq!(text, "Red|Blue");

        let mut restored = TBitFlags::<Channel>::default();
        convert_string_to_native(&registry, tbit_flags, Channel::reflect_type_id(), &text, &mut restored).unwrap();
        assert_eq!(restored, flags);

        let untyped = BitFlags(0b101);
        let text = convert_native_to_string(&registry, id("BitFlags"), TypeID::INVALID, &untyped).unwrap();
        assert_eq!(text, "5");

        registry.unregister_enum(Channel::reflect_type_id());
        teardown(registry);
    }

    #[test]
    fn resource_handles_convert_as_paths() {
        let registry = registry();
        let ptr_type = id("ResourcePtr");

        let handle = ResourcePtr::new("data://textures/grass.tex");
        let text = convert_native_to_string(&registry, ptr_type, TypeID::INVALID, &handle).unwrap();
        assert_eq!(text, "data://textures/grass.tex");

        let typed = id("TResourcePtr");
        let texture = id(Texture::TYPE_NAME);
        assert!(is_valid_string_value_for_type(&registry, typed, texture, "data://a/b.tex"));
        assert!(!is_valid_string_value_for_type(&registry, typed, texture, "data://a/b.msh"));
        assert!(!is_valid_string_value_for_type(&registry, typed, texture, "a/b.tex"));
        assert!(is_valid_string_value_for_type(&registry, typed, texture, ""));

        let mut typed_handle = TResourcePtr::<Texture>::default();
        convert_string_to_native(&registry, typed, texture, "data://rock.tex", &mut typed_handle).unwrap();
        assert_eq!(typed_handle.id().path().as_str(), "data://rock.tex");
        teardown(registry);
    }

    #[test]
    fn type_instances_convert_as_type_ids_and_descriptors() {
        let registry = registry();
        let instance_type = id("TypeInstance");

        let mut instance = TypeInstance::default();
        assert_eq!(convert_native_to_string(&registry, instance_type, TypeID::INVALID, &instance).unwrap(), "");

        convert_string_to_native(&registry, instance_type, TypeID::INVALID, Dragon::TYPE_NAME, &mut instance).unwrap();
        instance.get_mut::<Dragon>().unwrap().wingspan = 12.0;

        let bytes = convert_native_to_binary(&registry, instance_type, TypeID::INVALID, &instance).unwrap();
        let mut restored = TypeInstance::default();
        convert_binary_to_native(&registry, instance_type, TypeID::INVALID, &bytes, &mut restored).unwrap();
        assert_eq!(restored.get::<Dragon>().unwrap().wingspan, 12.0);
        assert_eq!(
            convert_binary_to_string(&registry, instance_type, TypeID::INVALID, &bytes).unwrap(),
            Dragon::TYPE_NAME
        );

        let typed = id("TTypeInstance");
        let creature = id(Creature::TYPE_NAME);
        let mut creatures = TTypeInstance::<Creature>::default();
        assert!(matches!(
            convert_string_to_native(&registry, typed, creature, Rock::TYPE_NAME, &mut creatures),
            Err(ConversionError::InstanceTypeRejected { .. })
        ));
        convert_string_to_native(&registry, typed, creature, Dragon::TYPE_NAME, &mut creatures).unwrap();
        assert!(creatures.get_as::<Dragon>().is_some());

        teardown(registry);
    }

    #[test]
    fn string_validation_does_not_need_a_native() {
        let registry = registry();
        assert!(is_valid_string_value_for_type(&registry, id("bool"), TypeID::INVALID, "anything"));
        assert!(is_valid_string_value_for_type(&registry, id("int8"), TypeID::INVALID, "-128"));
        assert!(!is_valid_string_value_for_type(&registry, id("int8"), TypeID::INVALID, "128"));
        assert!(is_valid_string_value_for_type(&registry, Mood::reflect_type_id(), TypeID::INVALID, "Calm"));
        assert!(!is_valid_string_value_for_type(&registry, Mood::reflect_type_id(), TypeID::INVALID, "calm"));
        assert!(!is_valid_string_value_for_type(&registry, id("Unknown"), TypeID::INVALID, ""));

        let quat = convert_string_to_binary(&registry, id("Quaternion"), TypeID::INVALID, "0,0,0,1").unwrap();
        assert_eq!(quat, postcard::to_allocvec(&Quat::IDENTITY).unwrap());
        teardown(registry);
    }
}
