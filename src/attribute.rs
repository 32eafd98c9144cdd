use hedron::{Attribute, Model, Primitive, Semantic};

use crate::{accessor::AccessorView, error::AccessorError};

/// The outcome of looking up a vertex attribute on a primitive.
#[derive(Debug, Clone)]
pub enum Resolved<'m, T> {
    /// The primitive has no attribute with the requested semantic.
    Absent,
    /// The attribute exists, but its accessor can't be read as `T`.
    Invalid(AccessorError),
    Valid(AccessorView<'m, T>),
}

impl<'m, T> Resolved<'m, T> {
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Resolved::Valid(_))
    }

    /// The view, if the attribute is present and readable.
    #[inline]
    pub fn valid(self) -> Option<AccessorView<'m, T>> {
        match self {
            Resolved::Valid(view) => Some(view),
            _ => None,
        }
    }
}

/// Look up the attribute `semantic` of `primitive`, and construct a view of its accessor.
pub fn resolve<'m, T: Attribute>(
    model: &'m Model,
    primitive: &Primitive,
    semantic: &Semantic,
) -> Resolved<'m, T> {
    match primitive.attribute(semantic) {
        None => Resolved::Absent,
        Some(index) => {
            let view = AccessorView::new(model, index);
            match view.status() {
                Ok(()) => Resolved::Valid(view),
                Err(e) => Resolved::Invalid(e.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hedron::Mode;
    use nalgebra::{Point3, Vector2, Vector3};

    use super::*;

    #[test]
    fn absent_is_distinct_from_invalid() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[0.0; 3]; 3]);
        let uv = model.push_vec2(&[[0.0; 2]; 3]);
        let prim = Primitive::new(Mode::Triangles)
            .with_attribute(Semantic::Position, pos)
            .with_attribute(Semantic::Normal, uv)
            .with_attribute(Semantic::Texcoord(0), uv);

        assert!(resolve::<Point3<f32>>(&model, &prim, &Semantic::Position).is_valid());
        assert!(resolve::<Vector2<f32>>(&model, &prim, &Semantic::Texcoord(0)).is_valid());
        assert!(resolve::<Vector3<f32>>(&model, &prim, &Semantic::Tangent).is_absent());
        assert!(matches!(
            resolve::<Vector3<f32>>(&model, &prim, &Semantic::Normal),
            Resolved::Invalid(AccessorError::WrongElementType { .. })
        ));
    }
}
