//! Collision meshes for converted primitives.

use nalgebra::Point3;

/// Builds a physics triangle mesh from converted vertex and index data.
pub trait CollisionCooker: Send + Sync {
    type Mesh: Send + Sync;

    /// Called only with non-empty `positions` and `triangles`. Every index is in range of
    /// `positions`.
    fn cook(&self, positions: &[Point3<f32>], triangles: &[[u32; 3]]) -> Option<Self::Mesh>;
}

/// Never produces a collision mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollision;

impl CollisionCooker for NoCollision {
    type Mesh = ();

    #[inline]
    fn cook(&self, _positions: &[Point3<f32>], _triangles: &[[u32; 3]]) -> Option<()> {
        None
    }
}

/// Cooks [TriMeshes](parry3d::shape::TriMesh) with [parry3d].
#[cfg(feature = "collision")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParryCooker;

#[cfg(feature = "collision")]
impl CollisionCooker for ParryCooker {
    type Mesh = parry3d::shape::TriMesh;

    fn cook(&self, positions: &[Point3<f32>], triangles: &[[u32; 3]]) -> Option<Self::Mesh> {
        Some(parry3d::shape::TriMesh::new(
            positions.to_vec(),
            triangles.to_vec(),
        ))
    }
}

/// Group a triangle list into triangles, ignoring any incomplete trailing triangle.
pub fn triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect()
}
