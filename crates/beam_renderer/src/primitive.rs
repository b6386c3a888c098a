//! Primitive geometry adapter.
//!
//! A closed set of shape variants behind the uniform capability surface
//! the acceleration structure needs: bounds, centroid, slab clipping and
//! ray intersection. Shapes are plain values; the structure references
//! them by index and never copies geometry.

use beam_math::{Aabb, Axis, Interval, Ray, Vec3};

use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;

/// A renderable primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Plane(Plane),
}

impl Primitive {
    /// Bounding box of the primitive. Unbounded for planes.
    pub fn bounds(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounds(),
            Primitive::Triangle(t) => t.bounds(),
            Primitive::Plane(p) => p.bounds(),
        }
    }

    /// Representative point used for object binning.
    pub fn centroid(&self) -> Vec3 {
        match self {
            Primitive::Sphere(s) => s.centroid(),
            Primitive::Triangle(t) => t.centroid(),
            Primitive::Plane(p) => p.centroid(),
        }
    }

    /// Bounding box of the primitive's geometry inside the slab
    /// `[start, end]` along `axis`. Possibly `EMPTY` if no overlap.
    pub fn clip_to_slab(&self, axis: Axis, start: f32, end: f32) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.clip_to_slab(axis, start, end),
            Primitive::Triangle(t) => t.clip_to_slab(axis, start, end),
            Primitive::Plane(p) => p.clip_to_slab(axis, start, end),
        }
    }

    /// Nearest intersection distance strictly inside `ray_t`, or None.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray, ray_t),
            Primitive::Triangle(t) => t.intersect(ray, ray_t),
            Primitive::Plane(p) => p.intersect(ray, ray_t),
        }
    }

    /// Outward unit normal at a surface point.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Primitive::Sphere(s) => s.normal_at(point),
            Primitive::Triangle(t) => t.normal_at(point),
            Primitive::Plane(p) => p.normal_at(point),
        }
    }

    /// Material index of this primitive.
    pub fn material(&self) -> usize {
        match self {
            Primitive::Sphere(s) => s.material(),
            Primitive::Triangle(t) => t.material(),
            Primitive::Plane(p) => p.material(),
        }
    }

    /// True if the primitive has a finite bounding box and can live in
    /// the tree. Planes are unbounded and are tested linearly instead.
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Primitive::Plane(_))
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_shape() {
        let sphere = Primitive::from(Sphere::new(Vec3::ZERO, 1.0, 3));

        assert!(sphere.is_bounded());
        assert_eq!(sphere.material(), 3);
        assert_eq!(sphere.centroid(), Vec3::ZERO);
        assert_eq!(sphere.bounds().max, Vec3::ONE);
    }

    #[test]
    fn test_plane_is_unbounded() {
        let plane = Primitive::from(Plane::new(Vec3::ZERO, Vec3::Y, 0));

        assert!(!plane.is_bounded());
        assert!(!plane.bounds().is_finite());
    }

    #[test]
    fn test_clip_respects_capability_contract() {
        let tri = Primitive::from(Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            0,
        ));

        let clipped = tri.clip_to_slab(Axis::X, 1.0, 2.0);
        assert_eq!(clipped.min.x, 1.0);
        assert_eq!(clipped.max.x, 2.0);

        let missed = tri.clip_to_slab(Axis::X, 10.0, 11.0);
        assert!(missed.is_empty());
    }
}
