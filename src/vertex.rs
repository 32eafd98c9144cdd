//! Flattening of source attributes into one vertex per output slot.

use hedron::Attribute;
use nalgebra::{Point3, Vector2, Vector3};

use crate::accessor::AccessorView;

/// The number of texture coordinate channels stored per vertex.
pub const MAX_TEXCOORDS: usize = 8;

/// Every attribute of one output vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Point3<f32>,
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// RGBA
    pub color: [u8; 4],
    /// Channels not filled by a texture coordinate set stay at (0, 0)
    pub uvs: [Vector2<f32>; MAX_TEXCOORDS],
}

impl Default for Corner {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            tangent: Vector3::zeros(),
            bitangent: Vector3::zeros(),
            normal: Vector3::zeros(),
            color: [0; 4],
            uvs: [Vector2::zeros(); MAX_TEXCOORDS],
        }
    }
}

/// Whether each triangle corner needs its own vertex.
///
/// Flat normals differ between triangles that share a vertex, and tangent generation works
/// per-corner, so either of these forces duplication.
#[inline]
pub fn must_duplicate(has_normals: bool, needs_tangents: bool, has_tangents: bool) -> bool {
    !has_normals || (needs_tangents && !has_tangents)
}

/// The output vertices of a primitive, along with the mapping from each back to its source
/// vertex.
#[derive(Debug, Clone)]
pub struct Corners<'i> {
    indices: &'i [u32],
    duplicated: bool,
    vertices: Vec<Corner>,
}

impl<'i> Corners<'i> {
    /// If `duplicated`, allocate one vertex per entry of `indices`; otherwise, allocate
    /// `vertex_count` vertices.
    pub fn new(indices: &'i [u32], vertex_count: usize, duplicated: bool) -> Self {
        let len = if duplicated {
            indices.len()
        } else {
            vertex_count
        };
        Self {
            indices,
            duplicated,
            vertices: vec![Corner::default(); len],
        }
    }

    #[inline]
    pub fn is_duplicated(&self) -> bool {
        self.duplicated
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The index of the source vertex that output vertex `i` is copied from.
    #[inline]
    pub fn source(&self, i: usize) -> usize {
        source_of(self.indices, self.duplicated, i)
    }

    /// Call `f` with every output vertex and the element of `view` it corresponds to.
    ///
    /// Vertices whose source is out of range of `view` are left untouched. Returns the number of
    /// such vertices.
    pub fn fill<T: Attribute>(
        &mut self,
        view: &AccessorView<'_, T>,
        mut f: impl FnMut(&mut Corner, T),
    ) -> usize {
        let (indices, duplicated) = (self.indices, self.duplicated);
        let mut missing = 0;
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            match view.get(source_of(indices, duplicated, i)) {
                Some(value) => f(vertex, value),
                None => missing += 1,
            }
        }
        missing
    }

    #[inline]
    pub fn as_slice(&self) -> &[Corner] {
        &self.vertices
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Corner] {
        &mut self.vertices
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Corner> {
        self.vertices
    }
}

#[inline]
fn source_of(indices: &[u32], duplicated: bool, i: usize) -> usize {
    if duplicated {
        indices[i] as usize
    } else {
        i
    }
}

/// Reverse the winding of every triangle in `indices`, converting from right-handed to
/// left-handed coordinates without changing which vertices make up each face.
///
/// If `duplicated`, the vertex buffer holds one vertex per corner of `indices`; the result then
/// refers to those vertices directly.
pub fn reverse_winding(indices: &mut [u32], duplicated: bool) {
    for (t, tri) in indices.chunks_exact_mut(3).enumerate() {
        if duplicated {
            let base = 3 * t as u32;
            tri.copy_from_slice(&[base + 2, base + 1, base]);
        } else {
            tri.swap(0, 2);
        }
    }
}

/// The narrowest index format able to address a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    U16,
    U32,
}

impl IndexWidth {
    #[inline]
    pub fn for_vertex_count(count: usize) -> Self {
        if count >= u16::MAX as usize {
            IndexWidth::U32
        } else {
            IndexWidth::U16
        }
    }
}

/// Per-attribute vertex buffers, ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffers {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub tangents: Vec<Vector3<f32>>,
    pub bitangents: Vec<Vector3<f32>>,
    /// RGBA; `None` if the primitive has no usable vertex colors
    pub colors: Option<Vec<[u8; 4]>>,
    /// One buffer per texture coordinate channel
    pub uvs: Vec<Vec<Vector2<f32>>>,
}

impl VertexBuffers {
    /// Split `corners` into separate buffers, keeping `uv_channels` texture coordinate channels
    /// (at least one, and at most [MAX_TEXCOORDS]).
    pub fn from_corners(corners: &[Corner], has_colors: bool, uv_channels: usize) -> Self {
        let uv_channels = uv_channels.clamp(1, MAX_TEXCOORDS);
        Self {
            positions: corners.iter().map(|c| c.position).collect(),
            normals: corners.iter().map(|c| c.normal).collect(),
            tangents: corners.iter().map(|c| c.tangent).collect(),
            bitangents: corners.iter().map(|c| c.bitangent).collect(),
            colors: has_colors.then(|| corners.iter().map(|c| c.color).collect()),
            uvs: (0..uv_channels)
                .map(|ch| corners.iter().map(|c| c.uvs[ch]).collect())
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use hedron::Model;
    use nalgebra::point;

    use super::*;

    #[test]
    fn duplication_rule() {
        assert!(must_duplicate(false, false, false));
        assert!(must_duplicate(false, true, true));
        assert!(must_duplicate(true, true, false));
        assert!(!must_duplicate(true, true, true));
        assert!(!must_duplicate(true, false, false));
    }

    #[test]
    fn fill_follows_layout() {
        let mut model = Model::new();
        let pos = model.push_vec3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let view = AccessorView::<Point3<f32>>::new(&model, pos);
        let indices = [2, 1, 0, 0, 5, 1];

        let mut shared = Corners::new(&indices, 3, false);
        assert_eq!(shared.fill(&view, |c, p| c.position = p), 0);
        assert_eq!(shared.as_slice()[2].position, point![2.0, 0.0, 0.0]);

        let mut dup = Corners::new(&indices, 3, true);
        assert_eq!(dup.len(), 6);
        assert_eq!(dup.fill(&view, |c, p| c.position = p), 1);
        assert_eq!(dup.as_slice()[0].position, point![2.0, 0.0, 0.0]);
        assert_eq!(dup.as_slice()[4].position, Point3::origin());
        assert_eq!(dup.source(5), 1);
    }

    #[test]
    fn winding_reversal() {
        let mut shared = vec![0, 1, 2, 2, 1, 3];
        reverse_winding(&mut shared, false);
        assert_eq!(shared, vec![2, 1, 0, 3, 1, 2]);

        let mut dup = vec![0, 1, 2, 2, 1, 3];
        reverse_winding(&mut dup, true);
        assert_eq!(dup, vec![2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn index_width() {
        assert_eq!(IndexWidth::for_vertex_count(0), IndexWidth::U16);
        assert_eq!(IndexWidth::for_vertex_count(65534), IndexWidth::U16);
        assert_eq!(IndexWidth::for_vertex_count(65535), IndexWidth::U32);
    }

    #[test]
    fn buffers_keep_requested_channels() {
        let corners = vec![Corner::default(); 4];
        let buffers = VertexBuffers::from_corners(&corners, false, 0);
        assert_eq!(buffers.uvs.len(), 1);
        assert!(buffers.colors.is_none());
        let buffers = VertexBuffers::from_corners(&corners, true, 3);
        assert_eq!(buffers.uvs.len(), 3);
        assert_eq!(buffers.colors.as_ref().map(Vec::len), Some(4));
        assert_eq!(buffers.len(), 4);
    }
}
