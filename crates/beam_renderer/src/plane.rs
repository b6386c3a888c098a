//! Infinite plane primitive.
//!
//! Planes have unbounded geometry, so the acceleration structure keeps
//! them out of the tree and tests them linearly on every query.

use beam_math::{Aabb, Axis, Interval, Ray, Vec3};

/// An infinite plane through `point` with unit normal `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: usize,
}

impl Plane {
    /// Create a new plane. The normal is normalized on construction.
    pub fn new(point: Vec3, normal: Vec3, material: usize) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            material,
        }
    }

    /// Bounding box of the plane: unbounded on every axis.
    pub fn bounds(&self) -> Aabb {
        Aabb::UNIVERSE
    }

    /// Nominal centroid. Planes never participate in centroid binning,
    /// but the capability surface still needs a point.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        self.point
    }

    /// Material index of this plane.
    #[inline]
    pub fn material(&self) -> usize {
        self.material
    }

    /// The plane restricted to a slab is still unbounded on the other
    /// axes; only the slab axis is limited.
    pub fn clip_to_slab(&self, axis: Axis, start: f32, end: f32) -> Aabb {
        self.bounds().clamped_to_slab(axis, start, end)
    }

    /// Ray-plane intersection. Rays parallel to the plane miss.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(t)
    }

    /// Plane normal (unit length, same for every surface point).
    #[inline]
    pub fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}
