//! Conversion of `COLOR_0` data to RGBA8.

use hedron::{Attribute, AttributeComponent, AttributeType, Model, Primitive, Semantic};

use crate::{accessor::AccessorView, vertex::Corners};

/// Color components which can be converted to a single byte.
pub trait ColorComponent: Copy {
    fn to_u8(self) -> u8;
}

impl ColorComponent for f32 {
    #[inline]
    fn to_u8(self) -> u8 {
        // `as` saturates, and maps NaN to 0
        (self.clamp(0.0, 1.0) * 255.0) as u8
    }
}

impl ColorComponent for u8 {
    #[inline]
    fn to_u8(self) -> u8 {
        self
    }
}

impl ColorComponent for u16 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self / 256) as u8
    }
}

/// Colors which can be converted to RGBA8.
pub trait Color: Attribute {
    fn to_rgba8(self) -> [u8; 4];
}

impl<C: ColorComponent> Color for [C; 3]
where
    [C; 3]: Attribute,
{
    #[inline]
    fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = self;
        [r.to_u8(), g.to_u8(), b.to_u8(), u8::MAX]
    }
}

impl<C: ColorComponent> Color for [C; 4]
where
    [C; 4]: Attribute,
{
    #[inline]
    fn to_rgba8(self) -> [u8; 4] {
        self.map(ColorComponent::to_u8)
    }
}

fn copy<T: Color>(model: &Model, accessor: usize, corners: &mut Corners<'_>) -> bool {
    let view = AccessorView::<T>::new(model, accessor);
    if !view.is_valid() {
        return false;
    }
    corners.fill(&view, |corner, color| corner.color = color.to_rgba8()) == 0
}

/// Copy the `COLOR_0` attribute of `primitive` into `corners`.
///
/// Returns whether every vertex received a color. If not, the colors in `corners` should be
/// ignored.
pub fn copy_colors(model: &Model, primitive: &Primitive, corners: &mut Corners<'_>) -> bool {
    let Some(index) = primitive.attribute(&Semantic::Color(0)) else {
        return false;
    };
    let Some(accessor) = model.accessors.get(index) else {
        return false;
    };

    let _span = tracing::trace_span!("copy colors").entered();
    use AttributeComponent as C;
    use AttributeType as T;
    match (accessor.ty, accessor.component) {
        (T::Vec3, C::F32) => copy::<[f32; 3]>(model, index, corners),
        (T::Vec3, C::U8) => copy::<[u8; 3]>(model, index, corners),
        (T::Vec3, C::U16) => copy::<[u16; 3]>(model, index, corners),
        (T::Vec4, C::F32) => copy::<[f32; 4]>(model, index, corners),
        (T::Vec4, C::U8) => copy::<[u8; 4]>(model, index, corners),
        (T::Vec4, C::U16) => copy::<[u16; 4]>(model, index, corners),
        (ty, component) => {
            tracing::debug!(?ty, ?component, "unsupported vertex color format");
            false
        }
    }
}
