use crate::{Axis, Interval, Ray, Vec3};

/// Axis-aligned bounding box for spatial acceleration structures.
///
/// Stored as min/max corner points. The empty box has inverted infinite
/// corners, which makes it the identity for `grow` and `union`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty AABB (contains nothing).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// An AABB that contains everything.
    pub const UNIVERSE: Aabb = Aabb {
        min: Vec3::NEG_INFINITY,
        max: Vec3::INFINITY,
    };

    /// Create a new AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two corner points in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// The overlap of two AABBs, or `EMPTY` if they are disjoint.
    pub fn intersection(box0: &Aabb, box1: &Aabb) -> Self {
        let result = Self {
            min: box0.min.max(box1.min),
            max: box0.max.min(box1.max),
        };
        if result.is_empty() {
            Aabb::EMPTY
        } else {
            result
        }
    }

    /// Grow this AABB to include a point.
    #[inline]
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow this AABB to include another AABB.
    #[inline]
    pub fn grow_aabb(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Returns true if the AABB contains no points (inverted on some axis).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns true if every corner coordinate is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Size along each axis. The empty AABB reports zero extent.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Total surface area of the box. The empty AABB reports zero.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the axis with the longest extent.
    pub fn longest_axis(&self) -> Axis {
        let d = self.extent();
        if d.x > d.y && d.x > d.z {
            Axis::X
        } else if d.y > d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns true if the two AABBs share any point. Touching faces count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns true if the point lies inside or on the boundary of the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }

    /// Clamp the box to the slab `[start, end]` along `axis`.
    ///
    /// Returns `EMPTY` if the box does not reach the slab.
    pub fn clamped_to_slab(&self, axis: Axis, start: f32, end: f32) -> Aabb {
        let i = axis.index();
        let mut result = *self;
        result.min[i] = result.min[i].max(start);
        result.max[i] = result.max[i].min(end);
        if result.is_empty() {
            Aabb::EMPTY
        } else {
            result
        }
    }

    /// Test a ray against this AABB within the given parameter interval.
    ///
    /// Uses the slab method. Returns the clipped `(entry, exit)` distances,
    /// or None when the ray misses the box. Touching a face counts as a hit
    /// so that flat (zero-thickness) boxes still register.
    pub fn intersect(&self, r: &Ray, ray_t: Interval) -> Option<(f32, f32)> {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in Axis::ALL {
            let i = axis.index();
            let adinv = 1.0 / r.direction[i];
            let mut t0 = (self.min[i] - r.origin[i]) * adinv;
            let mut t1 = (self.max[i] - r.origin[i]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Boolean form of `intersect` for callers that only need a yes/no.
    #[inline]
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        self.intersect(r, ray_t).is_some()
    }
}
