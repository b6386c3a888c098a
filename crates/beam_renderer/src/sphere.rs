//! Sphere primitive for ray tracing.

use beam_math::{Aabb, Axis, Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: usize,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Bounding box of the sphere.
    ///
    /// A negative radius yields an inverted box, which the tree builder
    /// rejects.
    pub fn bounds(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::new(self.center - rvec, self.center + rvec)
    }

    /// The sphere's center, which is also its centroid.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        self.center
    }

    /// Material index of this sphere.
    #[inline]
    pub fn material(&self) -> usize {
        self.material
    }

    /// Bounding box of the part of the sphere inside the slab
    /// `[start, end]` along `axis`.
    ///
    /// A slab cutting a cap or strip off the sphere bounds the cross
    /// section exactly: the widest circle inside the slab has radius
    /// `sqrt(r^2 - d^2)` where `d` is the distance from the center to
    /// the nearest slab plane (zero when the center lies inside).
    pub fn clip_to_slab(&self, axis: Axis, start: f32, end: f32) -> Aabb {
        let i = axis.index();
        let c = self.center[i];

        let lo = (c - self.radius).max(start);
        let hi = (c + self.radius).min(end);
        if lo > hi {
            return Aabb::EMPTY;
        }

        // Distance from the center to the slab along the axis
        let d = if c < lo {
            lo - c
        } else if c > hi {
            c - hi
        } else {
            0.0
        };
        let cross = (self.radius * self.radius - d * d).max(0.0).sqrt();

        let mut min = self.center - Vec3::splat(cross);
        let mut max = self.center + Vec3::splat(cross);
        min[i] = lo;
        max[i] = hi;
        Aabb::new(min, max)
    }

    /// Ray-sphere intersection. Returns the nearest root strictly inside
    /// `ray_t`, or None.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            // Degenerate direction never hits
            return None;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        Some(root)
    }

    /// Outward unit normal at a point on the surface.
    #[inline]
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }
}
