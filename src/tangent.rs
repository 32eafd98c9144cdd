//! Synthesis of flat normals and tangent-space bases.
//!
//! Both operate on duplicated vertices: every three consecutive [Corners](Corner) form one
//! triangle.

use nalgebra::{Point3, Vector2, Vector3};

use crate::vertex::Corner;

/// Set the normal of each triangle's corners to the normalized cross product of its edges, and
/// clear their tangents and bitangents.
///
/// Degenerate triangles receive a zero normal.
pub fn compute_flat_normals(corners: &mut [Corner]) {
    for tri in corners.chunks_exact_mut(3) {
        let v01 = tri[1].position - tri[0].position;
        let v02 = tri[2].position - tri[0].position;
        let normal = v01
            .cross(&v02)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        for corner in tri {
            corner.tangent = Vector3::zeros();
            corner.bitangent = Vector3::zeros();
            corner.normal = normal;
        }
    }
}

/// Per-corner access to a triangle list, as required by tangent generation algorithms.
pub trait TangentSpace {
    fn face_count(&self) -> usize;

    /// The position, normal, and primary texture coordinate of corner `vert` of face `face`.
    fn corner(&self, face: usize, vert: usize) -> (Point3<f32>, Vector3<f32>, Vector2<f32>);

    /// Store the tangent of a corner, along with the sign of its bitangent relative to
    /// `normal × tangent`.
    fn set_tangent(&mut self, face: usize, vert: usize, tangent: Vector3<f32>, sign: f32);
}

impl TangentSpace for [Corner] {
    #[inline]
    fn face_count(&self) -> usize {
        self.len() / 3
    }

    #[inline]
    fn corner(&self, face: usize, vert: usize) -> (Point3<f32>, Vector3<f32>, Vector2<f32>) {
        let c = &self[face * 3 + vert];
        (c.position, c.normal, c.uvs[0])
    }

    #[inline]
    fn set_tangent(&mut self, face: usize, vert: usize, tangent: Vector3<f32>, sign: f32) {
        let c = &mut self[face * 3 + vert];
        c.tangent = tangent;
        c.bitangent = c.normal.cross(&tangent) * sign;
    }
}

/// An algorithm which computes a tangent for every corner of a [TangentSpace].
pub trait TangentGenerator: Send + Sync {
    /// Returns `false` if tangents could not be generated.
    fn generate<S: TangentSpace + ?Sized>(&self, space: &mut S) -> bool;
}

/// Generates tangents with [MikkTSpace](http://www.mikktspace.com/), the algorithm used by
/// glTF and most bakers.
///
/// The bitangent sign is `+1` when the bitangent preserves orientation, so the bitangent is
/// `sign * (normal × tangent)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MikkTSpace;

/// The non-degenerate `faces` of a [TangentSpace], as seen by mikktspace.
struct MikkGeometry<'s, S: ?Sized> {
    space: &'s mut S,
    faces: Vec<usize>,
}

/// Whether the face has a non-zero area.
fn has_area<S: TangentSpace + ?Sized>(space: &S, face: usize) -> bool {
    let (p0, ..) = space.corner(face, 0);
    let (p1, ..) = space.corner(face, 1);
    let (p2, ..) = space.corner(face, 2);
    (p1 - p0).cross(&(p2 - p0)).norm_squared() > 0.0
}

impl<S: TangentSpace + ?Sized> mikktspace::Geometry for MikkGeometry<'_, S> {
    fn num_faces(&self) -> usize {
        self.faces.len()
    }

    fn num_vertices_of_face(&self, _face: usize) -> usize {
        3
    }

    fn position(&self, face: usize, vert: usize) -> [f32; 3] {
        self.space.corner(self.faces[face], vert).0.into()
    }

    fn normal(&self, face: usize, vert: usize) -> [f32; 3] {
        self.space.corner(self.faces[face], vert).1.into()
    }

    fn tex_coord(&self, face: usize, vert: usize) -> [f32; 2] {
        self.space.corner(self.faces[face], vert).2.into()
    }

    fn set_tangent_encoded(&mut self, tangent: [f32; 4], face: usize, vert: usize) {
        let [x, y, z, w] = tangent;
        self.space
            .set_tangent(self.faces[face], vert, Vector3::new(x, y, z), w);
    }
}

impl TangentGenerator for MikkTSpace {
    /// Degenerate faces keep their existing tangents. Returns `false` if every face is degenerate.
    fn generate<S: TangentSpace + ?Sized>(&self, space: &mut S) -> bool {
        let faces: Vec<usize> = (0..space.face_count())
            .filter(|&face| has_area(&*space, face))
            .collect();
        if faces.is_empty() {
            return false;
        }
        mikktspace::generate_tangents(&mut MikkGeometry { space, faces })
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;

    fn quad() -> Vec<Corner> {
        let positions = [
            point![0.0, 0.0, 0.0],
            point![1.0, 0.0, 0.0],
            point![1.0, 1.0, 0.0],
            point![0.0, 0.0, 0.0],
            point![1.0, 1.0, 0.0],
            point![0.0, 1.0, 0.0],
        ];
        positions
            .into_iter()
            .map(|p| {
                let mut c = Corner {
                    position: p,
                    ..Default::default()
                };
                c.uvs[0] = vector![p.x, p.y];
                c
            })
            .collect()
    }

    #[test]
    fn flat_normals() {
        let mut corners = quad();
        corners[0].tangent = vector![1.0, 0.0, 0.0];
        compute_flat_normals(&mut corners);
        for c in &corners {
            assert_eq!(c.normal, vector![0.0, 0.0, 1.0]);
            assert_eq!(c.tangent, Vector3::zeros());
        }

        let mut degenerate = vec![Corner::default(); 3];
        compute_flat_normals(&mut degenerate);
        assert_eq!(degenerate[0].normal, Vector3::zeros());
    }

    #[test]
    fn corner_protocol() {
        let mut corners = quad();
        compute_flat_normals(&mut corners);
        let space: &mut [Corner] = &mut corners;
        assert_eq!(space.face_count(), 2);
        let (p, n, uv) = space.corner(1, 2);
        assert_eq!(p, point![0.0, 1.0, 0.0]);
        assert_eq!(n, vector![0.0, 0.0, 1.0]);
        assert_eq!(uv, vector![0.0, 1.0]);

        space.set_tangent(0, 1, vector![1.0, 0.0, 0.0], -1.0);
        assert_eq!(corners[1].bitangent, vector![0.0, -1.0, 0.0]);
    }

    #[test]
    fn mikktspace_follows_uvs() {
        let mut corners = quad();
        compute_flat_normals(&mut corners);
        assert!(MikkTSpace.generate(corners.as_mut_slice()));
        for c in &corners {
            assert!((c.tangent - vector![1.0, 0.0, 0.0]).norm() < 1e-5, "{:?}", c.tangent);
            assert!((c.bitangent - vector![0.0, 1.0, 0.0]).norm() < 1e-5, "{:?}", c.bitangent);
        }
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        let mut corners = quad();
        corners.extend([Corner::default(); 3]);
        compute_flat_normals(&mut corners);
        assert!(MikkTSpace.generate(corners.as_mut_slice()));
        assert!((corners[0].tangent - vector![1.0, 0.0, 0.0]).norm() < 1e-5);
        assert!(corners[6..].iter().all(|c| c.tangent == Vector3::zeros()));

        let mut degenerate = vec![Corner::default(); 6];
        degenerate[4].position = point![1.0, 1.0, 1.0];
        compute_flat_normals(&mut degenerate);
        assert!(!MikkTSpace.generate(degenerate.as_mut_slice()));
        assert!(degenerate.iter().all(|c| c.tangent == Vector3::zeros()));
    }
}
