//! Canonical triangle index streams.
//!
//! Every supported index layout is reduced to a flat list of `u32` triangle corners, three per
//! triangle, in the winding order of the source data.

use hedron::{Attribute, AttributeComponent, Mode, Model, Primitive};
use num_traits::AsPrimitive;

use crate::{accessor::AccessorView, error::PrimitiveError};

/// An index accessor, tagged by component width.
#[derive(Debug, Clone)]
pub enum IndexAccessor<'m> {
    I8(AccessorView<'m, i8>),
    U8(AccessorView<'m, u8>),
    I16(AccessorView<'m, i16>),
    U16(AccessorView<'m, u16>),
    U32(AccessorView<'m, u32>),
}

impl<'m> IndexAccessor<'m> {
    /// Construct a view of the index accessor at `index`.
    ///
    /// # Errors
    ///
    /// * [UnsupportedIndexType](PrimitiveError::UnsupportedIndexType) if its components aren't
    ///   integers
    /// * [InvalidIndices](PrimitiveError::InvalidIndices) if it can't be read
    pub fn new(model: &'m Model, index: usize) -> Result<Self, PrimitiveError> {
        let Some(accessor) = model.accessors.get(index) else {
            return Err(PrimitiveError::InvalidIndices(
                crate::AccessorError::InvalidAccessorIndex {
                    index,
                    len: model.accessors.len(),
                },
            ));
        };
        let res = match accessor.component {
            AttributeComponent::I8 => Self::I8(AccessorView::from_accessor(model, accessor)),
            AttributeComponent::U8 => Self::U8(AccessorView::from_accessor(model, accessor)),
            AttributeComponent::I16 => Self::I16(AccessorView::from_accessor(model, accessor)),
            AttributeComponent::U16 => Self::U16(AccessorView::from_accessor(model, accessor)),
            AttributeComponent::U32 => Self::U32(AccessorView::from_accessor(model, accessor)),
            other => return Err(PrimitiveError::UnsupportedIndexType(other)),
        };
        match res.status() {
            Ok(()) => Ok(res),
            Err(e) => Err(PrimitiveError::InvalidIndices(e.clone())),
        }
    }

    pub fn status(&self) -> Result<(), &crate::AccessorError> {
        match self {
            Self::I8(v) => v.status(),
            Self::U8(v) => v.status(),
            Self::I16(v) => v.status(),
            Self::U16(v) => v.status(),
            Self::U32(v) => v.status(),
        }
    }

    /// Read every index, widened to `u32`.
    ///
    /// Signed indices are sign-extended, so negative values become very large and will be out
    /// of range of any vertex buffer.
    pub fn widen(&self) -> Vec<u32> {
        fn widen<T: Attribute + AsPrimitive<u32>>(view: &AccessorView<'_, T>) -> Vec<u32> {
            view.iter().map(AsPrimitive::as_).collect()
        }

        match self {
            Self::I8(v) => widen(v),
            Self::U8(v) => widen(v),
            Self::I16(v) => widen(v),
            Self::U16(v) => widen(v),
            Self::U32(v) => widen(v),
        }
    }
}

/// `[0, 1, 2, ..., count - 1]`
pub fn synthetic(count: usize) -> Vec<u32> {
    (0..count as u32).collect()
}

/// Expand `N` strip indices into `3 * (N - 2)` triangle corners.
///
/// Odd triangles swap their last two corners so that every triangle keeps the orientation of
/// the first. Strips of fewer than three indices describe no triangles.
pub fn expand_strip(strip: &[u32]) -> Vec<u32> {
    let mut res = Vec::with_capacity(3 * strip.len().saturating_sub(2));
    for (i, w) in strip.windows(3).enumerate() {
        if i % 2 == 1 {
            res.extend_from_slice(&[w[0], w[2], w[1]]);
        } else {
            res.extend_from_slice(w);
        }
    }
    res
}

/// Convert `raw` indices of a primitive with topology `mode` to a triangle list.
pub fn triangulate(mode: Mode, mut raw: Vec<u32>) -> Result<Vec<u32>, PrimitiveError> {
    match mode {
        Mode::Triangles => {
            let excess = raw.len() % 3;
            if excess != 0 {
                tracing::warn!(
                    count = raw.len(),
                    "triangle index count is not a multiple of 3; dropping the incomplete triangle"
                );
                raw.truncate(raw.len() - excess);
            }
            Ok(raw)
        }
        Mode::TriangleStrip => Ok(expand_strip(&raw)),
        other => Err(PrimitiveError::UnsupportedTopology(other)),
    }
}

/// Produce the canonical triangle index stream of `primitive`.
///
/// If the primitive has no index accessor, or its index accessor doesn't exist, indices
/// `0..vertex_count` are used instead.
pub fn canonical_indices(
    model: &Model,
    primitive: &Primitive,
    vertex_count: usize,
) -> Result<Vec<u32>, PrimitiveError> {
    let raw = match primitive.indices {
        Some(index) if index < model.accessors.len() => {
            let _span = tracing::trace_span!("copy indices").entered();
            IndexAccessor::new(model, index)?.widen()
        }
        _ => synthetic(vertex_count),
    };
    triangulate(primitive.mode, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_alternates_winding() {
        assert_eq!(expand_strip(&[0, 1, 2, 3]), vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(
            expand_strip(&[0, 1, 2, 3, 4]),
            vec![0, 1, 2, 1, 3, 2, 2, 3, 4]
        );
        assert!(expand_strip(&[0, 1]).is_empty());
        assert!(expand_strip(&[]).is_empty());
    }

    #[test]
    fn rejects_other_topologies() {
        for mode in [
            Mode::Points,
            Mode::Lines,
            Mode::LineLoop,
            Mode::LineStrip,
            Mode::TriangleFan,
        ] {
            assert_eq!(
                triangulate(mode, vec![0, 1, 2]),
                Err(PrimitiveError::UnsupportedTopology(mode))
            );
        }
    }

    #[test]
    fn drops_incomplete_triangles() {
        assert_eq!(
            triangulate(Mode::Triangles, vec![0, 1, 2, 3, 4]).unwrap(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn widens_every_component_type() {
        let mut model = Model::new();
        for comp in [
            AttributeComponent::I8,
            AttributeComponent::U8,
            AttributeComponent::I16,
            AttributeComponent::U16,
            AttributeComponent::U32,
        ] {
            let acc = model.push_indices(comp, &[2, 0, 1, 100]);
            let indices = IndexAccessor::new(&model, acc).unwrap();
            assert_eq!(indices.widen(), vec![2, 0, 1, 100], "{comp:?}");
        }
        let acc = model.push_indices(AttributeComponent::I8, &[255]);
        assert_eq!(IndexAccessor::new(&model, acc).unwrap().widen(), vec![u32::MAX]);
    }

    #[test]
    fn rejects_float_indices() {
        let mut model = Model::new();
        let acc = model.push_indices(AttributeComponent::F32, &[0, 1, 2]);
        assert_eq!(
            IndexAccessor::new(&model, acc).unwrap_err(),
            PrimitiveError::UnsupportedIndexType(AttributeComponent::F32)
        );
    }

    #[test]
    fn synthesizes_missing_indices() {
        let mut model = Model::new();
        let mut prim = Primitive::new(Mode::Triangles);
        assert_eq!(canonical_indices(&model, &prim, 3).unwrap(), vec![0, 1, 2]);

        // out-of-range accessors are treated as missing
        prim.indices = Some(7);
        assert_eq!(canonical_indices(&model, &prim, 3).unwrap(), vec![0, 1, 2]);

        prim.mode = Mode::TriangleStrip;
        prim.indices = Some(model.push_indices(AttributeComponent::U16, &[0, 1, 2, 3]));
        assert_eq!(
            canonical_indices(&model, &prim, 4).unwrap(),
            vec![0, 1, 2, 1, 3, 2]
        );
    }
}
