use nalgebra::{Point3, Vector3};

/// Axis-Aligned Bounding Box
///
/// Similar to `parry3d::bounding_volume::Aabb`, except in double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub mins: Point3<f64>,
    pub maxs: Point3<f64>,
}

impl Aabb {
    #[inline]
    pub fn new(mins: Point3<f64>, maxs: Point3<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Construct an [Aabb] from an accessor's declared bounds.
    ///
    /// Returns `None` unless both `min` and `max` have exactly 3 components.
    pub fn from_declared(min: &[f64], max: &[f64]) -> Option<Self> {
        match (min, max) {
            ([ix, iy, iz], [ax, ay, az]) => Some(Self::new(
                nalgebra::point![*ix, *iy, *iz],
                nalgebra::point![*ax, *ay, *az],
            )),
            _ => None,
        }
    }

    /// Construct the smallest [Aabb] containing every point in `points`, or `None` if there are
    /// no points.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f32>>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            let p = p.cast::<f64>();
            Some(match acc {
                None => Self::new(p, p),
                Some(Self { mins, maxs }) => Self::new(mins.inf(&p), maxs.sup(&p)),
            })
        })
    }

    #[inline]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    /// Half of the size of `self` along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vector3<f64> {
        (self.maxs - self.mins) / 2.0
    }
}

/// The bounds of a converted primitive, in the primitive's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub aabb: Aabb,
    /// Distance from `aabb.center()` to the farthest vertex.
    pub sphere_radius: f64,
}

impl BoundingVolume {
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.aabb.center()
    }
}

/// Accumulates the radius of a sphere around a fixed origin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SphereAccumulator {
    origin: Point3<f64>,
    radius: f64,
}

impl SphereAccumulator {
    pub(crate) fn new(origin: Point3<f64>) -> Self {
        Self {
            origin,
            radius: 0.0,
        }
    }

    #[inline]
    pub(crate) fn add(&mut self, p: &Point3<f32>) {
        self.radius = self.radius.max((p.cast::<f64>() - self.origin).norm());
    }

    #[inline]
    pub(crate) fn radius(&self) -> f64 {
        self.radius
    }
}
