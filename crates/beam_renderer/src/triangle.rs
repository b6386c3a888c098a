//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection and
//! Sutherland-Hodgman polygon clipping for slab clips.

use beam_math::{Aabb, Axis, Interval, Ray, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Material index
    material: usize,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the right-hand rule over `v0, v1, v2`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: usize) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize();

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    /// Bounding box of the triangle.
    ///
    /// Thin dimensions are padded slightly so that axis-aligned triangles
    /// do not produce zero-volume boxes.
    pub fn bounds(&self) -> Aabb {
        let min = self.v0.min(self.v1).min(self.v2);
        let max = self.v0.max(self.v1).max(self.v2);

        let delta = 0.0001;
        Aabb::from_points(min - Vec3::splat(delta), max + Vec3::splat(delta))
    }

    /// Centroid (mean of the vertices).
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Material index of this triangle.
    #[inline]
    pub fn material(&self) -> usize {
        self.material
    }

    /// Bounding box of the part of the triangle inside the slab
    /// `[start, end]` along `axis`.
    ///
    /// Clips the triangle polygon against both slab planes and bounds the
    /// surviving points. Returns `EMPTY` when the triangle lies entirely
    /// outside the slab.
    pub fn clip_to_slab(&self, axis: Axis, start: f32, end: f32) -> Aabb {
        let i = axis.index();

        let below = clip_polygon(&[self.v0, self.v1, self.v2], i, end, true);
        if below.is_empty() {
            return Aabb::EMPTY;
        }
        let inside = clip_polygon(&below, i, start, false);
        if inside.is_empty() {
            return Aabb::EMPTY;
        }

        let mut bounds = Aabb::EMPTY;
        for p in inside {
            bounds.grow(p);
        }
        // Snap float drift from edge interpolation back onto the slab
        bounds.clamped_to_slab(axis, start, end)
    }

    /// Möller-Trumbore ray-triangle intersection.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (also rejects degenerate rays)
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(t)
    }

    /// Face normal (unit length, same for every surface point).
    #[inline]
    pub fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}

/// Clip a convex polygon against the plane `point[axis] = limit`.
///
/// Keeps the side below the limit when `keep_below` is set, otherwise the
/// side above. Crossing edges are split at the plane.
fn clip_polygon(points: &[Vec3], axis: usize, limit: f32, keep_below: bool) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(points.len() + 1);

    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];

        let current_d = current[axis] - limit;
        let next_d = next[axis] - limit;
        let current_in = if keep_below {
            current_d <= 0.0
        } else {
            current_d >= 0.0
        };
        let next_in = if keep_below {
            next_d <= 0.0
        } else {
            next_d >= 0.0
        };

        if current_in {
            out.push(current);
        }
        if current_in != next_in {
            let t = current_d / (current_d - next_d);
            out.push(current + (next - current) * t);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            0,
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();

        // Ray pointing at triangle center
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();

        assert!((t - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = xy_triangle();

        // Ray parallel to the triangle plane
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .is_none());
    }

    #[test]
    fn test_triangle_normal() {
        let tri = xy_triangle();
        // Counter-clockwise in XY means the normal points along +Z
        assert!((tri.normal_at(Vec3::ZERO) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_clip_keeps_whole_triangle() {
        let tri = xy_triangle();
        let clipped = tri.clip_to_slab(Axis::X, -5.0, 5.0);
        let bounds = tri.bounds();

        // Slab covers the triangle: clip matches the tight extent
        assert!((clipped.min.x - (-1.0)).abs() < 1e-6);
        assert!((clipped.max.x - 1.0).abs() < 1e-6);
        assert!(clipped.min.y >= bounds.min.y);
    }

    #[test]
    fn test_clip_half() {
        let tri = xy_triangle();
        let clipped = tri.clip_to_slab(Axis::X, 0.0, 5.0);

        // Right half: x in [0, 1], y still spans the full height because
        // the apex sits at x=0
        assert_eq!(clipped.min.x, 0.0);
        assert!((clipped.max.x - 1.0).abs() < 1e-6);
        assert!((clipped.max.y - 1.0).abs() < 1e-6);
        assert!((clipped.min.y - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_clip_corner() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            0,
        );
        let clipped = tri.clip_to_slab(Axis::X, 1.0, 3.0);

        // The clipped corner reaches y=1 where the hypotenuse crosses x=1
        assert_eq!(clipped.min.x, 1.0);
        assert!((clipped.max.x - 2.0).abs() < 1e-6);
        assert!((clipped.max.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_outside() {
        let tri = xy_triangle();
        assert!(tri.clip_to_slab(Axis::Y, 2.0, 3.0).is_empty());
    }

    #[test]
    fn test_clip_axis_aligned_triangle() {
        let tri = xy_triangle();
        // The triangle has zero extent along Z; clipping across z=-1
        // degenerates to the full (flat) extent
        let clipped = tri.clip_to_slab(Axis::Z, -2.0, 0.0);

        assert!(!clipped.is_empty());
        assert_eq!(clipped.min.z, -1.0);
        assert_eq!(clipped.max.z, -1.0);
    }
}
