use std::{fmt, str::FromStr};

/// The role of a vertex attribute within a [Primitive](super::Primitive).
///
/// Names follow the [glTF attribute semantics](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#meshes-overview),
/// plus the `_CESIUMOVERLAY_n` texture coordinate sets used for raster overlays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    Texcoord(u32),
    Color(u32),
    Joints(u32),
    Weights(u32),
    /// Raster overlay texture coordinates (`_CESIUMOVERLAY_n`)
    Overlay(u32),
    /// Any other application-specific attribute, stored with its full name
    Custom(String),
}

impl Semantic {
    pub const OVERLAY_PREFIX: &'static str = "_CESIUMOVERLAY_";
}

impl FromStr for Semantic {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn set(s: &str, prefix: &str) -> Option<u32> {
            s.strip_prefix(prefix)?.parse().ok()
        }

        Ok(match s {
            "POSITION" => Self::Position,
            "NORMAL" => Self::Normal,
            "TANGENT" => Self::Tangent,
            _ => {
                if let Some(n) = set(s, "TEXCOORD_") {
                    Self::Texcoord(n)
                } else if let Some(n) = set(s, "COLOR_") {
                    Self::Color(n)
                } else if let Some(n) = set(s, "JOINTS_") {
                    Self::Joints(n)
                } else if let Some(n) = set(s, "WEIGHTS_") {
                    Self::Weights(n)
                } else if let Some(n) = set(s, Self::OVERLAY_PREFIX) {
                    Self::Overlay(n)
                } else {
                    Self::Custom(s.to_owned())
                }
            }
        })
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantic::Position => f.write_str("POSITION"),
            Semantic::Normal => f.write_str("NORMAL"),
            Semantic::Tangent => f.write_str("TANGENT"),
            Semantic::Texcoord(n) => write!(f, "TEXCOORD_{n}"),
            Semantic::Color(n) => write!(f, "COLOR_{n}"),
            Semantic::Joints(n) => write!(f, "JOINTS_{n}"),
            Semantic::Weights(n) => write!(f, "WEIGHTS_{n}"),
            Semantic::Overlay(n) => write!(f, "{}{n}", Self::OVERLAY_PREFIX),
            Semantic::Custom(name) => f.write_str(name),
        }
    }
}

/// The inner components of an [AttributeType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl AttributeComponent {
    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }

    /// The `componentType` value used for this component in glTF assets.
    pub const fn to_gl(self) -> u32 {
        match self {
            AttributeComponent::I8 => 5120,
            AttributeComponent::U8 => 5121,
            AttributeComponent::I16 => 5122,
            AttributeComponent::U16 => 5123,
            AttributeComponent::U32 => 5125,
            AttributeComponent::F32 => 5126,
        }
    }

    pub const fn from_gl(val: u32) -> Option<Self> {
        match val {
            5120 => Some(AttributeComponent::I8),
            5121 => Some(AttributeComponent::U8),
            5122 => Some(AttributeComponent::I16),
            5123 => Some(AttributeComponent::U16),
            5125 => Some(AttributeComponent::U32),
            5126 => Some(AttributeComponent::F32),
            _ => None,
        }
    }
}

/// The shape of each element of an accessor.
///
/// Values taken from the [glTF specification](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#accessor-data-types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
            AttributeType::Mat2 => 4,
            AttributeType::Mat3 => 9,
            AttributeType::Mat4 => 16,
        }
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> usize {
        comp.size() * self.size_elements()
    }

    pub const fn name(self) -> &'static str {
        match self {
            AttributeType::Scalar => "SCALAR",
            AttributeType::Vec2 => "VEC2",
            AttributeType::Vec3 => "VEC3",
            AttributeType::Vec4 => "VEC4",
            AttributeType::Mat2 => "MAT2",
            AttributeType::Mat3 => "MAT3",
            AttributeType::Mat4 => "MAT4",
        }
    }
}

/// Scalar types which can be the component of an [Attribute].
pub trait AttributeComponentType: Copy {
    const COMPONENT: AttributeComponent;

    /// Read one value from the front of `bytes`, which is little-endian.
    ///
    /// # Panics
    ///
    /// * if `bytes.len() < COMPONENT.size()`
    fn read_le(bytes: &[u8]) -> Self;
}

/// Types which can be read out of accessor data.
///
/// Implementations are checked at compile time to have exactly the size described by their `TYPE`
/// and `COMPONENT` constants.
pub trait Attribute: Copy {
    const TYPE: AttributeType;
    const COMPONENT: AttributeComponent;

    /// Read one element from the front of `bytes`, which is little-endian.
    ///
    /// # Panics
    ///
    /// * if `bytes.len() < TYPE.size_bytes(COMPONENT)`
    fn read_le(bytes: &[u8]) -> Self;
}

mod _impl_attr {
    use super::{Attribute, AttributeComponent, AttributeComponentType, AttributeType};

    macro_rules! impl_attr_comp_type {
        ($Target:ident: $comp:ident) => {
            static_assertions::const_assert_eq!(
                std::mem::size_of::<$Target>(),
                AttributeComponent::$comp.size()
            );

            impl AttributeComponentType for $Target {
                const COMPONENT: AttributeComponent = AttributeComponent::$comp;

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$Target>()];
                    raw.copy_from_slice(&bytes[..std::mem::size_of::<$Target>()]);
                    $Target::from_le_bytes(raw)
                }
            }

            impl Attribute for $Target {
                const TYPE: AttributeType = AttributeType::Scalar;
                const COMPONENT: AttributeComponent = AttributeComponent::$comp;

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    <$Target as AttributeComponentType>::read_le(bytes)
                }
            }
        };
    }

    impl_attr_comp_type!(i8: I8);
    impl_attr_comp_type!(u8: U8);
    impl_attr_comp_type!(i16: I16);
    impl_attr_comp_type!(u16: U16);
    impl_attr_comp_type!(u32: U32);
    impl_attr_comp_type!(f32: F32);

    macro_rules! impl_attr {
        ($t:ident<$($C:ty, $c:ident);+: $CAlias:ident> => $Target:ty) => {
            $( // for every ($C, $c)
               const _: () = { // anonymous module
                type $CAlias = $C;
                // "size of type $Target == size of attribute $t with component $c"
                static_assertions::const_assert_eq!(std::mem::size_of::<$Target>(), AttributeType::$t.size_bytes(AttributeComponent::$c));
                impl Attribute for $Target {
                    const TYPE: AttributeType = AttributeType::$t;
                    const COMPONENT: AttributeComponent = AttributeComponent::$c;

                    #[inline]
                    fn read_le(bytes: &[u8]) -> Self {
                        let size = AttributeComponent::$c.size();
                        let components: [$CAlias; AttributeType::$t.size_elements()] =
                            std::array::from_fn(|i| <$CAlias as AttributeComponentType>::read_le(&bytes[i * size..]));
                        components.into()
                    }
                }
               };
            )+
        };
        ($t:ident<$CAlias:ident> => $Target:ty) => {
            impl_attr!($t<
                i8, I8;
                u8, U8;
                i16, I16;
                u16, U16;
                u32, U32;
                f32, F32: $CAlias> => $Target);
        };
    }

    impl_attr!(Vec2<C> => nalgebra::Vector2<C>);
    impl_attr!(Vec2<C> => nalgebra::Point2<C>);
    impl_attr!(Vec2<C> => [C; 2]);

    impl_attr!(Vec3<C> => nalgebra::Vector3<C>);
    impl_attr!(Vec3<C> => nalgebra::Point3<C>);
    impl_attr!(Vec3<C> => [C; 3]);

    impl_attr!(Vec4<C> => nalgebra::Vector4<C>);
    impl_attr!(Vec4<C> => [C; 4]);
}
