use crate::TypeID;

macro_rules! define_core_types {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $friendly:literal;)*) => {
        /// The closed set of built-in types known without registration.
        ///
        /// Every variant except [`Invalid`](CoreTypeID::Invalid) maps to exactly one
        /// [`TypeID`], created from [`type_name`](CoreTypeID::type_name).
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CoreTypeID {
            $($(#[$meta])* $variant,)*
            /// Returned by lookups that miss.
            Invalid = 0xFF,
        }

        impl CoreTypeID {
            /// All valid core types, in declaration order.
            pub const ALL: &'static [CoreTypeID] = &[$(CoreTypeID::$variant,)*];

            /// Number of valid core types.
            pub const COUNT: usize = Self::ALL.len();

            /// The name the type's [`TypeID`] is created from.
            pub const fn type_name(self) -> &'static str {
                match self {
                    $(CoreTypeID::$variant => $name,)*
                    CoreTypeID::Invalid => "",
                }
            }

            /// Human-readable name shown by editors.
            #[cfg(feature = "tools")]
            pub const fn friendly_name(self) -> &'static str {
                match self {
                    $(CoreTypeID::$variant => $friendly,)*
                    CoreTypeID::Invalid => "Invalid",
                }
            }
        }
    };
}

define_core_types! {
    Bool => "bool", "Bool";
    Uint8 => "uint8", "Uint8";
    Int8 => "int8", "Int8";
    Uint16 => "uint16", "Uint16";
    Int16 => "int16", "Int16";
    Uint32 => "uint32", "Uint32";
    Int32 => "int32", "Int32";
    Uint64 => "uint64", "Uint64";
    Int64 => "int64", "Int64";
    Float => "float", "Float";
    Double => "double", "Double";
    UUID => "UUID", "UUID";
    StringID => "StringID", "String ID";
    TypeID => "TypeID", "Type ID";
    String => "String", "String";
    Color => "Color", "Color";
    Float2 => "Float2", "Float2";
    Float3 => "Float3", "Float3";
    Float4 => "Float4", "Float4";
    Quaternion => "Quaternion", "Quaternion";
    Matrix => "Matrix", "Matrix";
    Transform => "Transform", "Transform";
    Microseconds => "Microseconds", "Microseconds";
    Milliseconds => "Milliseconds", "Milliseconds";
    Seconds => "Seconds", "Seconds";
    Percentage => "Percentage", "Percentage";
    Degrees => "Degrees", "Degrees";
    Radians => "Radians", "Radians";
    EulerAngles => "EulerAngles", "Euler Angles";
    IntRange => "IntRange", "Int Range";
    FloatRange => "FloatRange", "Float Range";
    FloatCurve => "FloatCurve", "Float Curve";
    BitFlags => "BitFlags", "Bit Flags";
    /// Bit flags labelled by an enum, the template argument.
    TBitFlags => "TBitFlags", "Typed Bit Flags";
    TVector => "TVector", "Vector";
    TInlineVector => "TInlineVector", "Inline Vector";
    TypeInstance => "TypeInstance", "Type Instance";
    /// A type instance restricted to a base type, the template argument.
    TTypeInstance => "TTypeInstance", "Typed Type Instance";
    ResourcePath => "ResourcePath", "Resource Path";
    ResourceTypeID => "ResourceTypeID", "Resource Type ID";
    ResourceID => "ResourceID", "Resource ID";
    ResourcePtr => "ResourcePtr", "Resource Ptr";
    /// A resource handle restricted to a resource type, the template argument.
    TResourcePtr => "TResourcePtr", "Typed Resource Ptr";
}

impl CoreTypeID {
    #[inline]
    pub fn type_id(self) -> TypeID {
        TypeID::new(self.type_name())
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, CoreTypeID::Invalid)
    }

    /// `true` for the generic wrappers that carry a template argument type.
    #[inline]
    pub const fn is_templated(self) -> bool {
        matches!(
            self,
            CoreTypeID::TBitFlags
                | CoreTypeID::TVector
                | CoreTypeID::TInlineVector
                | CoreTypeID::TTypeInstance
                | CoreTypeID::TResourcePtr
        )
    }

    /// `true` for the integer kinds an enum may be stored as.
    #[inline]
    pub const fn is_enum_storage(self) -> bool {
        matches!(
            self,
            CoreTypeID::Uint8
                | CoreTypeID::Int8
                | CoreTypeID::Uint16
                | CoreTypeID::Int16
                | CoreTypeID::Uint32
                | CoreTypeID::Int32
        )
    }
}
